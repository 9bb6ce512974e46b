// src/services/option.rs

use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    models::option::{CreateOptionRequest, NewOption, QuestionOption},
    repository::{Partition, option as option_repo, question as question_repo},
    services::{answer_key::AnswerKey, ordering},
};

/// Adds an option to a choice question at the requested position.
pub async fn create_option(
    pool: &SqlitePool,
    question_id: i64,
    req: CreateOptionRequest,
) -> Result<QuestionOption, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let question = question_repo::get_question(&mut *tx, question_id).await?;
    if !question.question_type.is_choice() {
        return Err(AppError::InvariantViolation(format!(
            "Question {question_id} takes no options"
        )));
    }

    let order_num =
        ordering::open_slot(&mut *tx, Partition::Options { question_id }, req.order_num).await?;

    let id = option_repo::insert_option(
        &mut *tx,
        &NewOption {
            question_id,
            survey_id: question.survey_id,
            content: req.content,
            order_num,
        },
    )
    .await?;

    let option = option_repo::get_option(&mut *tx, id).await?;
    tx.commit().await?;

    tracing::info!(question_id, option_id = id, order_num, "Option created");
    Ok(option)
}

pub async fn update_option(
    pool: &SqlitePool,
    id: i64,
    content: &str,
) -> Result<QuestionOption, AppError> {
    let mut conn = pool.acquire().await?;
    option_repo::update_option_content(&mut *conn, id, content).await?;
    option_repo::get_option(&mut *conn, id).await
}

pub async fn move_option(
    pool: &SqlitePool,
    id: i64,
    new_order_num: i64,
) -> Result<QuestionOption, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let option = option_repo::get_option(&mut *tx, id).await?;
    ordering::reposition(
        &mut *tx,
        Partition::from(&option),
        id,
        option.order_num,
        new_order_num,
    )
    .await?;

    let option = option_repo::get_option(&mut *tx, id).await?;
    tx.commit().await?;

    Ok(option)
}

/// Deletes an option, closes the gap, and drops it from the owning
/// question's answer key so the key never points at a missing option.
pub async fn delete_option(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = db::begin_write(pool).await?;

    let option = option_repo::get_option(&mut *tx, id).await?;
    let question = question_repo::get_question(&mut *tx, option.question_id).await?;

    ordering::close_gap(&mut *tx, Partition::from(&option), id, option.order_num).await?;
    option_repo::delete_option(&mut *tx, id).await?;

    let key = AnswerKey::parse(question.correct_answer.as_deref())?;
    if key.contains(id) {
        let remaining = key.without(id);
        question_repo::set_correct_answer(&mut *tx, question.id, remaining.to_stored().as_deref())
            .await?;
    }

    tx.commit().await?;

    tracing::info!(question_id = option.question_id, option_id = id, "Option deleted");
    Ok(())
}
