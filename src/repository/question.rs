// src/repository/question.rs

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::{
    error::AppError,
    models::question::{NewQuestion, Question, QuestionType},
};

const COLUMNS: &str =
    "id, survey_id, question_type, content, score, order_num, correct_answer, created_at, updated_at";

pub async fn get_question(conn: &mut SqliteConnection, id: i64) -> Result<Question, AppError> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question {id} not found")))
}

/// Questions of a survey ordered by type, then `order_num`. Restricting to one
/// type yields exactly one partition.
pub async fn list_questions_ordered(
    conn: &mut SqliteConnection,
    survey_id: i64,
    question_type: Option<QuestionType>,
) -> Result<Vec<Question>, AppError> {
    let questions = match question_type {
        Some(question_type) => {
            sqlx::query_as::<_, Question>(&format!(
                "SELECT {COLUMNS} FROM questions
                 WHERE survey_id = ? AND question_type = ?
                 ORDER BY order_num ASC"
            ))
            .bind(survey_id)
            .bind(question_type)
            .fetch_all(&mut *conn)
            .await?
        }
        None => {
            sqlx::query_as::<_, Question>(&format!(
                "SELECT {COLUMNS} FROM questions
                 WHERE survey_id = ?
                 ORDER BY question_type ASC, order_num ASC"
            ))
            .bind(survey_id)
            .fetch_all(&mut *conn)
            .await?
        }
    };

    Ok(questions)
}

pub async fn insert_question(
    conn: &mut SqliteConnection,
    question: &NewQuestion,
) -> Result<i64, AppError> {
    let now = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO questions
        (survey_id, question_type, content, score, order_num, correct_answer, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(question.survey_id)
    .bind(question.question_type)
    .bind(&question.content)
    .bind(question.score)
    .bind(question.order_num)
    .bind(&question.correct_answer)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

pub async fn update_question_content(
    conn: &mut SqliteConnection,
    id: i64,
    content: &str,
    score: i64,
) -> Result<(), AppError> {
    sqlx::query("UPDATE questions SET content = ?, score = ?, updated_at = ? WHERE id = ?")
        .bind(content)
        .bind(score)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn set_correct_answer(
    conn: &mut SqliteConnection,
    id: i64,
    correct_answer: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query("UPDATE questions SET correct_answer = ?, updated_at = ? WHERE id = ?")
        .bind(correct_answer)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn set_order_num(
    conn: &mut SqliteConnection,
    id: i64,
    order_num: i64,
) -> Result<(), AppError> {
    sqlx::query("UPDATE questions SET order_num = ?, updated_at = ? WHERE id = ?")
        .bind(order_num)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Moves a question into another type partition at `order_num`.
pub async fn set_type(
    conn: &mut SqliteConnection,
    id: i64,
    question_type: QuestionType,
    order_num: i64,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE questions SET question_type = ?, order_num = ?, updated_at = ? WHERE id = ?",
    )
    .bind(question_type)
    .bind(order_num)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn delete_question(conn: &mut SqliteConnection, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Question {id} not found")));
    }

    Ok(())
}

pub async fn delete_questions_by_survey(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE survey_id = ?")
        .bind(survey_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Choice questions without an answer key.
pub async fn count_unqualified(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM questions
        WHERE survey_id = ?
          AND question_type IN (?, ?)
          AND (correct_answer IS NULL OR correct_answer = '')
        "#,
    )
    .bind(survey_id)
    .bind(QuestionType::Single)
    .bind(QuestionType::Multiple)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}
