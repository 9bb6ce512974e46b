// src/services/question.rs

use std::collections::HashSet;

use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    db,
    error::AppError,
    models::{
        option::NewOption,
        question::{
            CreateQuestionRequest, NewQuestion, Question, QuestionType, QuestionWithOptions,
            UpdateQuestionRequest,
        },
    },
    repository::{
        Partition, option as option_repo, question as question_repo, survey as survey_repo,
    },
    services::{answer_key::AnswerKey, ordering},
};

/// Labels of the options every new choice question starts with.
pub const DEFAULT_OPTION_LABELS: [&str; 4] = ["Option 1", "Option 2", "Option 3", "Option 4"];

pub(crate) async fn load_with_options(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<QuestionWithOptions, AppError> {
    let question = question_repo::get_question(conn, id).await?;
    let options = option_repo::list_options_ordered(conn, id).await?;
    Ok(QuestionWithOptions { question, options })
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> Result<QuestionWithOptions, AppError> {
    let mut conn = pool.acquire().await?;
    load_with_options(&mut *conn, id).await
}

/// Inserts a question at the requested position of its (survey, type)
/// partition. Choice questions get the four default options.
pub async fn create_question(
    pool: &SqlitePool,
    survey_id: i64,
    req: CreateQuestionRequest,
) -> Result<QuestionWithOptions, AppError> {
    let mut tx = db::begin_write(pool).await?;

    survey_repo::get_survey(&mut *tx, survey_id).await?;

    let partition = Partition::Questions {
        survey_id,
        question_type: req.question_type,
    };
    let order_num = ordering::open_slot(&mut *tx, partition, req.order_num).await?;

    let id = question_repo::insert_question(
        &mut *tx,
        &NewQuestion {
            survey_id,
            question_type: req.question_type,
            content: req.content,
            score: req.score,
            order_num,
            correct_answer: None,
        },
    )
    .await?;

    if req.question_type.is_choice() {
        for (position, label) in DEFAULT_OPTION_LABELS.iter().enumerate() {
            option_repo::insert_option(
                &mut *tx,
                &NewOption {
                    question_id: id,
                    survey_id,
                    content: label.to_string(),
                    order_num: position as i64,
                },
            )
            .await?;
        }
    }

    let created = load_with_options(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!(survey_id, question_id = id, order_num, "Question created");
    Ok(created)
}

/// Updates content, score, type and answer key. A type change re-homes the
/// question at the end of its new partition; its options keep their order.
pub async fn update_question(
    pool: &SqlitePool,
    id: i64,
    req: UpdateQuestionRequest,
) -> Result<QuestionWithOptions, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let current = question_repo::get_question(&mut *tx, id).await?;

    if req.content.is_some() || req.score.is_some() {
        let content = req.content.as_deref().unwrap_or(&current.content);
        let score = req.score.unwrap_or(current.score);
        question_repo::update_question_content(&mut *tx, id, content, score).await?;
    }

    let mut effective_type = current.question_type;
    if let Some(new_type) = req.question_type {
        if new_type != current.question_type {
            change_type(&mut *tx, &current, new_type).await?;
            effective_type = new_type;
        }
    }

    if let Some(ids) = req.correct_answer {
        let key = checked_answer_key(&mut *tx, id, effective_type, ids).await?;
        question_repo::set_correct_answer(&mut *tx, id, key.to_stored().as_deref()).await?;
    }

    let updated = load_with_options(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!(question_id = id, "Question updated");
    Ok(updated)
}

async fn change_type(
    conn: &mut SqliteConnection,
    current: &Question,
    new_type: QuestionType,
) -> Result<(), AppError> {
    ordering::close_gap(conn, Partition::from(current), current.id, current.order_num).await?;

    let target = Partition::Questions {
        survey_id: current.survey_id,
        question_type: new_type,
    };
    let order_num = ordering::open_slot(conn, target, None).await?;
    question_repo::set_type(conn, current.id, new_type, order_num).await?;

    // A key that no longer fits the new type is dropped, leaving the question unqualified
    let key = AnswerKey::parse(current.correct_answer.as_deref())?;
    let key_fits = match new_type {
        QuestionType::Text => key.is_empty(),
        QuestionType::Single => key.ids().len() <= 1,
        QuestionType::Multiple => true,
    };
    if !key_fits {
        question_repo::set_correct_answer(conn, current.id, None).await?;
    }

    Ok(())
}

/// Accepts only distinct ids of options owned by the question, and at most
/// one id for a single-choice question.
async fn checked_answer_key(
    conn: &mut SqliteConnection,
    question_id: i64,
    question_type: QuestionType,
    ids: Vec<i64>,
) -> Result<AnswerKey, AppError> {
    if !question_type.is_choice() {
        return Err(AppError::InvariantViolation(
            "Text questions have no answer key".to_string(),
        ));
    }
    if question_type == QuestionType::Single && ids.len() > 1 {
        return Err(AppError::InvariantViolation(
            "A single choice question has one correct option".to_string(),
        ));
    }

    let owned: HashSet<i64> = option_repo::list_options_ordered(conn, question_id)
        .await?
        .into_iter()
        .map(|o| o.id)
        .collect();

    let mut seen = HashSet::new();
    for id in &ids {
        if !owned.contains(id) {
            return Err(AppError::InvariantViolation(format!(
                "Option {id} does not belong to question {question_id}"
            )));
        }
        if !seen.insert(*id) {
            return Err(AppError::InvariantViolation(format!(
                "Option {id} listed twice in answer key"
            )));
        }
    }

    Ok(AnswerKey::from(ids))
}

pub async fn move_question(
    pool: &SqlitePool,
    id: i64,
    new_order_num: i64,
) -> Result<Question, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let question = question_repo::get_question(&mut *tx, id).await?;
    let moved = ordering::reposition(
        &mut *tx,
        Partition::from(&question),
        id,
        question.order_num,
        new_order_num,
    )
    .await?;

    let question = question_repo::get_question(&mut *tx, id).await?;
    tx.commit().await?;

    if moved {
        tracing::info!(question_id = id, new_order_num, "Question moved");
    }
    Ok(question)
}

/// Deletes a question with its options and closes the gap it leaves.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = db::begin_write(pool).await?;

    let question = question_repo::get_question(&mut *tx, id).await?;
    let removed_options = option_repo::delete_options_by_question(&mut *tx, id).await?;
    ordering::close_gap(&mut *tx, Partition::from(&question), id, question.order_num).await?;
    question_repo::delete_question(&mut *tx, id).await?;

    tx.commit().await?;

    tracing::info!(question_id = id, removed_options, "Question deleted");
    Ok(())
}
