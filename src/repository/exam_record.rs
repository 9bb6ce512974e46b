// src/repository/exam_record.rs

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    error::AppError,
    models::exam_record::{NewUserAnswer, ScoreTotals, UserAnswer, UserScore},
};

const SCORE_COLUMNS: &str = "id, survey_id, name, score, total_score, question_count, correct_count, duration, created_at";
const ANSWER_COLUMNS: &str = "id, survey_id, question_id, score_id, answer, answer_valid, created_at";

/// Name stored until a "Name" question overrides it.
pub const ANONYMOUS: &str = "anonymous";

/// Inserts an empty score row; its id is referenced by the answers that follow.
pub async fn insert_score(conn: &mut SqliteConnection, duration: i64) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO user_scores (name, duration, created_at)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(ANONYMOUS)
    .bind(duration)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

pub async fn update_score_totals(
    conn: &mut SqliteConnection,
    id: i64,
    totals: &ScoreTotals,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE user_scores
        SET survey_id = ?, name = ?, score = ?, total_score = ?,
            question_count = ?, correct_count = ?
        WHERE id = ?
        "#,
    )
    .bind(totals.survey_id)
    .bind(&totals.name)
    .bind(totals.score)
    .bind(totals.total_score)
    .bind(totals.question_count)
    .bind(totals.correct_count)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Score {id} not found")));
    }

    Ok(())
}

pub async fn get_score(conn: &mut SqliteConnection, id: i64) -> Result<UserScore, AppError> {
    sqlx::query_as::<_, UserScore>(&format!(
        "SELECT {SCORE_COLUMNS} FROM user_scores WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Score {id} not found")))
}

/// Highest score first; equal scores rank the faster attempt first.
pub async fn list_ranking(
    conn: &mut SqliteConnection,
    survey_id: i64,
    limit: i64,
) -> Result<Vec<UserScore>, AppError> {
    let scores = sqlx::query_as::<_, UserScore>(&format!(
        "SELECT {SCORE_COLUMNS} FROM user_scores
         WHERE survey_id = ?
         ORDER BY score DESC, duration ASC, id ASC
         LIMIT ?"
    ))
    .bind(survey_id)
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;

    Ok(scores)
}

/// Bulk insert in one statement. An empty slice writes nothing.
pub async fn insert_answers(
    conn: &mut SqliteConnection,
    answers: &[NewUserAnswer],
) -> Result<(), AppError> {
    if answers.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "INSERT INTO user_answers (survey_id, question_id, score_id, answer, answer_valid, created_at) ",
    );
    builder.push_values(answers, |mut row, answer| {
        row.push_bind(answer.survey_id)
            .push_bind(answer.question_id)
            .push_bind(answer.score_id)
            .push_bind(answer.answer.clone())
            .push_bind(answer.answer_valid)
            .push_bind(now);
    });

    builder.build().execute(&mut *conn).await?;

    Ok(())
}

pub async fn list_answers_by_score(
    conn: &mut SqliteConnection,
    score_id: i64,
) -> Result<Vec<UserAnswer>, AppError> {
    let answers = sqlx::query_as::<_, UserAnswer>(&format!(
        "SELECT {ANSWER_COLUMNS} FROM user_answers WHERE score_id = ? ORDER BY id ASC"
    ))
    .bind(score_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(answers)
}

pub async fn delete_answers_by_survey(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM user_answers WHERE survey_id = ?")
        .bind(survey_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_scores_by_survey(
    conn: &mut SqliteConnection,
    survey_id: i64,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM user_scores WHERE survey_id = ?")
        .bind(survey_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
