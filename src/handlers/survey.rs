// src/handlers/survey.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        exam_record::RankingParams,
        survey::{
            CopySurveyRequest, CreateSurveyRequest, SetStarRequest, SurveyListParams,
            SurveyStatus, UpdateSurveyRequest,
        },
    },
    services::{copy, grading, survey, validation},
};

/// Creates a draft survey for the given owner.
pub async fn create_survey(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateSurveyRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created =
        survey::create_survey(&pool, payload.user_id, payload.title, payload.description).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Lists the owner's surveys, starred first.
pub async fn list_surveys(
    State(pool): State<SqlitePool>,
    Query(params): Query<SurveyListParams>,
) -> Result<impl IntoResponse, AppError> {
    let surveys = survey::list_surveys(&pool, params.user_id, false).await?;
    Ok(Json(surveys))
}

/// Lists the owner's soft-deleted surveys.
pub async fn list_trash(
    State(pool): State<SqlitePool>,
    Query(params): Query<SurveyListParams>,
) -> Result<impl IntoResponse, AppError> {
    let surveys = survey::list_surveys(&pool, params.user_id, true).await?;
    Ok(Json(surveys))
}

/// Survey with its ordered questions and options.
pub async fn get_survey(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let detail = survey::survey_detail(&pool, id).await?;
    Ok(Json(detail))
}

pub async fn update_survey(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSurveyRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = survey::update_survey(&pool, id, payload.title, payload.description).await?;
    Ok(Json(updated))
}

pub async fn set_star(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<SetStarRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = survey::set_star(&pool, id, payload.is_star).await?;
    Ok(Json(updated))
}

/// Publishes a survey. Refused while any question or option is unqualified.
pub async fn publish_survey(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let report = validation::validate_survey(&pool, id).await?;
    if !report.valid {
        return Err(AppError::InvariantViolation(format!(
            "Survey {id} is not ready: {} unqualified questions, {} unqualified options",
            report.unqualified_questions, report.unqualified_options
        )));
    }

    let updated = survey::set_status(&pool, id, SurveyStatus::Published).await?;
    Ok(Json(updated))
}

pub async fn stop_survey(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let updated = survey::set_status(&pool, id, SurveyStatus::Stopped).await?;
    Ok(Json(updated))
}

pub async fn validate_survey(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let report = validation::validate_survey(&pool, id).await?;
    Ok(Json(report))
}

/// Deep-copies a survey. The copy belongs to `user_id` when given,
/// otherwise to the source's owner.
pub async fn copy_survey(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    payload: Option<Json<CopySurveyRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let requested_owner = payload.and_then(|Json(payload)| payload.user_id);

    let owner_id = match requested_owner {
        Some(user_id) => user_id,
        None => survey::get_survey(&pool, id).await?.user_id,
    };

    let new_id = copy::copy_survey(&pool, id, owner_id).await?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": new_id }))))
}

/// Moves a survey to the trash.
pub async fn trash_survey(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    survey::trash_survey(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restore_survey(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    survey::restore_survey(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Permanently deletes a survey with its questions, options and results.
pub async fn delete_survey(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    survey::delete_survey(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_ranking(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Query(params): Query<RankingParams>,
) -> Result<impl IntoResponse, AppError> {
    let ranking = grading::ranking(&pool, id, params.limit).await?;
    Ok(Json(ranking))
}
