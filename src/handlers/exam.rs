// src/handlers/exam.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{error::AppError, models::exam_record::SubmitExamRequest, services::grading};

/// Submits an exam attempt and returns the graded score record.
///
/// * Grades every answer against the stored answer key.
/// * Stores the score and the graded answers in one transaction.
pub async fn submit_exam(
    State(pool): State<SqlitePool>,
    Json(payload): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let score_id = grading::submit_exam(&pool, payload.answers, payload.duration).await?;
    let detail = grading::score_detail(&pool, score_id).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Result review for one attempt.
pub async fn get_score(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let detail = grading::score_detail(&pool, id).await?;
    Ok(Json(detail))
}
