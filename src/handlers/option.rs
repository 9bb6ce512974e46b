// src/handlers/option.rs

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
    models::{option::UpdateOptionRequest, question::MoveRequest},
    services::option,
};

pub async fn update_option(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = option::update_option(&pool, id, &payload.content).await?;
    Ok(Json(updated))
}

pub async fn move_option(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<MoveRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let moved = option::move_option(&pool, id, payload.order_num).await?;
    Ok(Json(moved))
}

/// Deletes an option; it is also dropped from the question's answer key.
pub async fn delete_option(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    option::delete_option(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
