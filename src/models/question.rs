// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::models::option::QuestionOption;

/// Kind of question. Text questions carry respondent metadata and are never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum QuestionType {
    Text = 0,
    Single = 1,
    Multiple = 2,
}

impl QuestionType {
    /// Single and multiple choice questions own options and are scored.
    pub fn is_choice(self) -> bool {
        !matches!(self, QuestionType::Text)
    }
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub survey_id: i64,
    pub question_type: QuestionType,
    pub content: String,

    /// Points awarded for a correct answer.
    pub score: i64,

    /// Zero-based position within the (survey, question type) partition.
    pub order_num: i64,

    /// Comma-joined option ids for choice questions. Unused for text questions.
    pub correct_answer: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct QuestionWithOptions {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<QuestionOption>,
}

/// Values for a question row about to be inserted.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub survey_id: i64,
    pub question_type: QuestionType,
    pub content: String,
    pub score: i64,
    pub order_num: i64,
    pub correct_answer: Option<String>,
}

/// DTO for creating a question. `order_num` omitted appends to the partition.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub question_type: QuestionType,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub score: i64,
    #[validate(range(min = 0))]
    pub order_num: Option<i64>,
}

/// DTO for updating a question. Fields are optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    pub question_type: Option<QuestionType>,
    #[validate(length(min = 1, max = 1000))]
    pub content: Option<String>,
    #[validate(range(min = 0))]
    pub score: Option<i64>,
    /// Option ids forming the answer key; must belong to this question.
    pub correct_answer: Option<Vec<i64>>,
}

/// DTO for moving a question or an option within its partition.
#[derive(Debug, Deserialize, Validate)]
pub struct MoveRequest {
    #[validate(range(min = 0))]
    pub order_num: i64,
}
