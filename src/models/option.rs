// src/models/option.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'options' table in the database.
/// Named `QuestionOption` to stay clear of `std::option::Option`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: i64,
    pub question_id: i64,

    /// Denormalized so whole-survey deletes need no join.
    pub survey_id: i64,

    pub content: String,

    /// Zero-based position within the owning question.
    pub order_num: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOption {
    pub question_id: i64,
    pub survey_id: i64,
    pub content: String,
    pub order_num: i64,
}

/// DTO for adding an option. `order_num` omitted appends.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOptionRequest {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
    #[validate(range(min = 0))]
    pub order_num: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOptionRequest {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
}
