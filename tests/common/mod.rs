// tests/common/mod.rs

#![allow(dead_code)]

use std::path::PathBuf;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use survey_backend::{
    db,
    models::{
        question::{CreateQuestionRequest, QuestionType, QuestionWithOptions, UpdateQuestionRequest},
        survey::Survey,
    },
    repository::{self, Partition},
    services::{question, survey},
};

/// Fresh in-memory database with the schema applied.
///
/// A single connection that never expires keeps the in-memory database
/// alive for the whole test.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    db::migrate(&pool).await.expect("Failed to migrate database");

    pool
}

/// Migrated database in a fresh temp file, for tests that need several
/// connections. Returns the file path so the caller can remove it.
pub async fn file_pool(max_connections: u32) -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("survey-{}.db", uuid::Uuid::new_v4()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .expect("Failed to open database file");

    db::migrate(&pool).await.expect("Failed to migrate database");

    (pool, path)
}

pub async fn new_survey(pool: &SqlitePool, title: &str) -> Survey {
    survey::create_survey(pool, 1, title.to_string(), None)
        .await
        .expect("Failed to create survey")
}

pub async fn add_question(
    pool: &SqlitePool,
    survey_id: i64,
    question_type: QuestionType,
    content: &str,
    score: i64,
) -> QuestionWithOptions {
    question::create_question(
        pool,
        survey_id,
        CreateQuestionRequest {
            question_type,
            content: content.to_string(),
            score,
            order_num: None,
        },
    )
    .await
    .expect("Failed to create question")
}

/// Sets the answer key of a choice question to the options at `positions`.
pub async fn set_key(pool: &SqlitePool, created: &QuestionWithOptions, positions: &[usize]) -> String {
    let ids: Vec<i64> = positions.iter().map(|p| created.options[*p].id).collect();
    let updated = question::update_question(
        pool,
        created.question.id,
        UpdateQuestionRequest {
            correct_answer: Some(ids),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to set answer key");

    updated
        .question
        .correct_answer
        .expect("Answer key should be stored")
}

pub async fn order_nums(pool: &SqlitePool, partition: Partition) -> Vec<i64> {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    repository::partition_order_nums(&mut *conn, partition)
        .await
        .expect("Failed to read partition")
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}

pub fn contiguous(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}
