// src/services/validation.rs

//! Publish-readiness checks. Pure queries: nothing here changes a survey's
//! status, callers decide what to do with the report.

use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    error::AppError,
    models::survey::ValidationReport,
    repository::{option as option_repo, question as question_repo, survey as survey_repo},
};

/// Choice questions with an empty or missing answer key.
pub async fn count_unqualified_questions(
    pool: &SqlitePool,
    survey_id: i64,
) -> Result<i64, AppError> {
    let mut conn = pool.acquire().await?;
    question_repo::count_unqualified(&mut *conn, survey_id).await
}

/// Choice questions offering fewer than two options.
pub async fn count_unqualified_options(
    pool: &SqlitePool,
    survey_id: i64,
) -> Result<i64, AppError> {
    let mut conn = pool.acquire().await?;
    option_repo::count_unqualified(&mut *conn, survey_id).await
}

async fn report(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<ValidationReport, AppError> {
    survey_repo::get_survey(conn, survey_id).await?;

    let unqualified_questions = question_repo::count_unqualified(conn, survey_id).await?;
    let unqualified_options = option_repo::count_unqualified(conn, survey_id).await?;

    Ok(ValidationReport {
        unqualified_questions,
        unqualified_options,
        valid: unqualified_questions == 0 && unqualified_options == 0,
    })
}

/// Valid only when both unqualified counts are zero.
pub async fn validate_survey(pool: &SqlitePool, survey_id: i64) -> Result<ValidationReport, AppError> {
    let mut conn = pool.acquire().await?;
    let report = report(&mut *conn, survey_id).await?;

    tracing::debug!(survey_id, ?report, "Survey validated");
    Ok(report)
}
