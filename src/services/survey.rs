// src/services/survey.rs

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    models::{
        option::QuestionOption,
        question::QuestionWithOptions,
        survey::{NewSurvey, Survey, SurveyDetail, SurveyStatus},
    },
    repository::{
        exam_record as exam_repo, option as option_repo, question as question_repo,
        survey as survey_repo,
    },
};

pub async fn create_survey(
    pool: &SqlitePool,
    owner_id: i64,
    title: String,
    description: Option<String>,
) -> Result<Survey, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let id = survey_repo::insert_survey(
        &mut *tx,
        &NewSurvey {
            user_id: owner_id,
            title,
            description,
            status: SurveyStatus::Draft,
        },
    )
    .await?;
    let survey = survey_repo::get_survey(&mut *tx, id).await?;

    tx.commit().await?;

    tracing::info!(survey_id = id, owner_id, "Survey created");
    Ok(survey)
}

pub async fn get_survey(pool: &SqlitePool, id: i64) -> Result<Survey, AppError> {
    let mut conn = pool.acquire().await?;
    survey_repo::get_survey(&mut *conn, id).await
}

/// Survey with questions ordered by type then position, each with its
/// options in position order.
pub async fn survey_detail(pool: &SqlitePool, id: i64) -> Result<SurveyDetail, AppError> {
    let mut conn = pool.acquire().await?;

    let survey = survey_repo::get_survey(&mut *conn, id).await?;
    let questions = question_repo::list_questions_ordered(&mut *conn, id, None).await?;

    let mut by_question: HashMap<i64, Vec<QuestionOption>> = HashMap::new();
    for option in option_repo::list_options_by_survey(&mut *conn, id).await? {
        by_question.entry(option.question_id).or_default().push(option);
    }

    let questions = questions
        .into_iter()
        .map(|question| {
            let options = by_question.remove(&question.id).unwrap_or_default();
            QuestionWithOptions { question, options }
        })
        .collect();

    Ok(SurveyDetail { survey, questions })
}

/// The owner's surveys; `trashed` selects the soft-deleted ones instead.
pub async fn list_surveys(
    pool: &SqlitePool,
    owner_id: i64,
    trashed: bool,
) -> Result<Vec<Survey>, AppError> {
    let mut conn = pool.acquire().await?;
    survey_repo::list_by_owner(&mut *conn, owner_id, trashed).await
}

pub async fn update_survey(
    pool: &SqlitePool,
    id: i64,
    title: Option<String>,
    description: Option<String>,
) -> Result<Survey, AppError> {
    let mut conn = pool.acquire().await?;
    survey_repo::get_survey(&mut *conn, id).await?;
    survey_repo::update_survey(&mut *conn, id, title, description).await?;
    survey_repo::get_survey(&mut *conn, id).await
}

pub async fn set_star(pool: &SqlitePool, id: i64, is_star: bool) -> Result<Survey, AppError> {
    let mut conn = pool.acquire().await?;
    survey_repo::set_star(&mut *conn, id, is_star).await?;
    survey_repo::get_survey(&mut *conn, id).await
}

/// Changes status without checking publish readiness; that gate belongs to
/// the caller (see `validation::validate_survey`).
pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    status: SurveyStatus,
) -> Result<Survey, AppError> {
    let mut conn = pool.acquire().await?;
    survey_repo::set_status(&mut *conn, id, status).await?;

    tracing::info!(survey_id = id, ?status, "Survey status changed");
    survey_repo::get_survey(&mut *conn, id).await
}

/// Soft delete: the survey leaves the owner's list but keeps its data.
pub async fn trash_survey(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut conn = pool.acquire().await?;
    survey_repo::set_deleted(&mut *conn, id, true).await
}

pub async fn restore_survey(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut conn = pool.acquire().await?;
    survey_repo::set_deleted(&mut *conn, id, false).await
}

/// Permanently deletes a survey and everything under it. Dependents go
/// first so the foreign keys hold at every step; all or nothing commits.
pub async fn delete_survey(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = db::begin_write(pool).await?;

    survey_repo::get_survey(&mut *tx, id).await?;

    let answers = exam_repo::delete_answers_by_survey(&mut *tx, id).await?;
    let scores = exam_repo::delete_scores_by_survey(&mut *tx, id).await?;
    let options = option_repo::delete_options_by_survey(&mut *tx, id).await?;
    let questions = question_repo::delete_questions_by_survey(&mut *tx, id).await?;
    survey_repo::delete_survey(&mut *tx, id).await?;

    tx.commit().await?;

    tracing::info!(
        survey_id = id,
        questions,
        options,
        scores,
        answers,
        "Survey deleted"
    );
    Ok(())
}
