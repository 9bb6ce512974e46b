// src/handlers/question.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        option::CreateOptionRequest,
        question::{CreateQuestionRequest, MoveRequest, UpdateQuestionRequest},
    },
    services::{option, question},
};

/// Adds a question to a survey. Choice questions come with four default options.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Path(survey_id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = question::create_question(&pool, survey_id, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let found = question::get_question(&pool, id).await?;
    Ok(Json(found))
}

/// Updates a question. `correct_answer` takes option ids of this question.
pub async fn update_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = question::update_question(&pool, id, payload).await?;
    Ok(Json(updated))
}

pub async fn move_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<MoveRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let moved = question::move_question(&pool, id, payload.order_num).await?;
    Ok(Json(moved))
}

pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    question::delete_question(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_option(
    State(pool): State<SqlitePool>,
    Path(question_id): Path<i64>,
    Json(payload): Json<CreateOptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = option::create_option(&pool, question_id, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
