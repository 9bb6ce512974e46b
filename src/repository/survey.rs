// src/repository/survey.rs

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    error::AppError,
    models::survey::{NewSurvey, Survey, SurveyStatus},
};

const COLUMNS: &str = "id, user_id, title, description, status, is_star, is_deleted, answer_total, created_at, updated_at";

pub async fn get_survey(conn: &mut SqliteConnection, id: i64) -> Result<Survey, AppError> {
    sqlx::query_as::<_, Survey>(&format!("SELECT {COLUMNS} FROM surveys WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Survey {id} not found")))
}

/// Surveys of one owner, starred first, newest first.
pub async fn list_by_owner(
    conn: &mut SqliteConnection,
    user_id: i64,
    is_deleted: bool,
) -> Result<Vec<Survey>, AppError> {
    let surveys = sqlx::query_as::<_, Survey>(&format!(
        "SELECT {COLUMNS} FROM surveys
         WHERE user_id = ? AND is_deleted = ?
         ORDER BY is_star DESC, id DESC"
    ))
    .bind(user_id)
    .bind(is_deleted)
    .fetch_all(&mut *conn)
    .await?;

    Ok(surveys)
}

pub async fn insert_survey(conn: &mut SqliteConnection, survey: &NewSurvey) -> Result<i64, AppError> {
    let now = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO surveys (user_id, title, description, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(survey.user_id)
    .bind(&survey.title)
    .bind(&survey.description)
    .bind(survey.status)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Updates title and/or description. Nothing to update is a no-op.
pub async fn update_survey(
    conn: &mut SqliteConnection,
    id: i64,
    title: Option<String>,
    description: Option<String>,
) -> Result<(), AppError> {
    if title.is_none() && description.is_none() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE surveys SET ");
    let mut separated = builder.separated(", ");

    if let Some(title) = title {
        separated.push("title = ");
        separated.push_bind_unseparated(title);
    }

    if let Some(description) = description {
        separated.push("description = ");
        separated.push_bind_unseparated(description);
    }

    separated.push("updated_at = ");
    separated.push_bind_unseparated(Utc::now());

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Survey {id} not found")));
    }

    Ok(())
}

async fn set_column<T>(
    conn: &mut SqliteConnection,
    id: i64,
    column: &str,
    value: T,
) -> Result<(), AppError>
where
    T: for<'q> sqlx::Encode<'q, Sqlite> + sqlx::Type<Sqlite> + Send + 'static,
{
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE surveys SET ");
    builder
        .push(column)
        .push(" = ")
        .push_bind(value)
        .push(", updated_at = ")
        .push_bind(Utc::now())
        .push(" WHERE id = ")
        .push_bind(id);

    let result = builder.build().execute(&mut *conn).await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Survey {id} not found")));
    }

    Ok(())
}

pub async fn set_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: SurveyStatus,
) -> Result<(), AppError> {
    set_column(conn, id, "status", status).await
}

pub async fn set_star(conn: &mut SqliteConnection, id: i64, is_star: bool) -> Result<(), AppError> {
    set_column(conn, id, "is_star", is_star).await
}

pub async fn set_deleted(
    conn: &mut SqliteConnection,
    id: i64,
    is_deleted: bool,
) -> Result<(), AppError> {
    set_column(conn, id, "is_deleted", is_deleted).await
}

/// Atomic in-store increment; never read-modify-write.
pub async fn increment_answer_total(conn: &mut SqliteConnection, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE surveys SET answer_total = answer_total + 1 WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Survey {id} not found")));
    }

    Ok(())
}

pub async fn delete_survey(conn: &mut SqliteConnection, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM surveys WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Survey {id} not found")));
    }

    Ok(())
}
