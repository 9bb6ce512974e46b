// src/repository/option.rs

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::{
    error::AppError,
    models::{
        option::{NewOption, QuestionOption},
        question::QuestionType,
    },
};

const COLUMNS: &str = "id, question_id, survey_id, content, order_num, created_at";

pub async fn get_option(conn: &mut SqliteConnection, id: i64) -> Result<QuestionOption, AppError> {
    sqlx::query_as::<_, QuestionOption>(&format!("SELECT {COLUMNS} FROM options WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Option {id} not found")))
}

pub async fn list_options_ordered(
    conn: &mut SqliteConnection,
    question_id: i64,
) -> Result<Vec<QuestionOption>, AppError> {
    let options = sqlx::query_as::<_, QuestionOption>(&format!(
        "SELECT {COLUMNS} FROM options WHERE question_id = ? ORDER BY order_num ASC"
    ))
    .bind(question_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(options)
}

/// All options of a survey, grouped by question and ordered within each.
pub async fn list_options_by_survey(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<Vec<QuestionOption>, AppError> {
    let options = sqlx::query_as::<_, QuestionOption>(&format!(
        "SELECT {COLUMNS} FROM options WHERE survey_id = ? ORDER BY question_id ASC, order_num ASC"
    ))
    .bind(survey_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(options)
}

pub async fn insert_option(conn: &mut SqliteConnection, option: &NewOption) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO options (question_id, survey_id, content, order_num, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(option.question_id)
    .bind(option.survey_id)
    .bind(&option.content)
    .bind(option.order_num)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

pub async fn update_option_content(
    conn: &mut SqliteConnection,
    id: i64,
    content: &str,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE options SET content = ? WHERE id = ?")
        .bind(content)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Option {id} not found")));
    }

    Ok(())
}

pub async fn set_order_num(
    conn: &mut SqliteConnection,
    id: i64,
    order_num: i64,
) -> Result<(), AppError> {
    sqlx::query("UPDATE options SET order_num = ? WHERE id = ?")
        .bind(order_num)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn delete_option(conn: &mut SqliteConnection, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM options WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Option {id} not found")));
    }

    Ok(())
}

pub async fn delete_options_by_question(
    conn: &mut SqliteConnection,
    question_id: i64,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM options WHERE question_id = ?")
        .bind(question_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_options_by_survey(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM options WHERE survey_id = ?")
        .bind(survey_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Choice questions owning fewer than two options.
pub async fn count_unqualified(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM questions q
        WHERE q.survey_id = ?
          AND q.question_type IN (?, ?)
          AND (SELECT COUNT(*) FROM options o WHERE o.question_id = q.id) < 2
        "#,
    )
    .bind(survey_id)
    .bind(QuestionType::Single)
    .bind(QuestionType::Multiple)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}
