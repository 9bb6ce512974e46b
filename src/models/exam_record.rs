// src/models/exam_record.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'user_scores' table in the database.
/// One row summarises one graded exam attempt.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserScore {
    pub id: i64,

    /// Filled in by the same transaction that created the row.
    pub survey_id: Option<i64>,

    /// Respondent display name, "anonymous" unless a "Name" question was answered.
    pub name: String,

    /// Awarded points.
    pub score: i64,

    /// Possible points.
    pub total_score: i64,

    pub question_count: i64,
    pub correct_count: i64,

    /// Elapsed seconds.
    pub duration: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Represents the 'user_answers' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserAnswer {
    pub id: i64,
    pub survey_id: i64,
    pub question_id: i64,
    pub score_id: i64,

    /// One option id, comma-joined option ids, or free text.
    pub answer: String,

    pub answer_valid: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// An answer graded in memory, waiting for the bulk insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAnswer {
    pub survey_id: i64,
    pub question_id: i64,
    pub score_id: i64,
    pub answer: String,
    pub answer_valid: bool,
}

/// Totals written back onto the score row at the end of grading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTotals {
    pub survey_id: i64,
    pub name: String,
    pub score: i64,
    pub total_score: i64,
    pub question_count: i64,
    pub correct_count: i64,
}

/// Score plus its graded answers, for result review.
#[derive(Debug, Serialize)]
pub struct ScoreDetail {
    #[serde(flatten)]
    pub score: UserScore,
    pub answers: Vec<UserAnswer>,
}

/// One submitted answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    #[serde(default)]
    pub answer: String,
}

/// DTO for submitting an exam attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitExamRequest {
    #[validate(length(min = 1))]
    pub answers: Vec<SubmittedAnswer>,

    /// Seconds the respondent spent on the exam.
    #[validate(range(min = 0))]
    pub duration: i64,
}

#[derive(Debug, Deserialize)]
pub struct RankingParams {
    pub limit: Option<i64>,
}
