// src/models/survey.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::question::QuestionWithOptions;

/// Publication state of a survey. Stored as an integer column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum SurveyStatus {
    Draft = 0,
    Stopped = 1,
    Published = 2,
}

/// Represents the 'surveys' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Survey {
    pub id: i64,

    /// Owning author.
    pub user_id: i64,

    pub title: String,
    pub description: Option<String>,
    pub status: SurveyStatus,
    pub is_star: bool,

    /// Soft delete flag; trashed surveys are hidden from the owner's list.
    pub is_deleted: bool,

    /// Number of graded submissions. Only ever changed by an atomic increment.
    pub answer_total: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSurvey {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: SurveyStatus,
}

/// Survey with its full question/option graph, as shown in the editor.
#[derive(Debug, Serialize)]
pub struct SurveyDetail {
    #[serde(flatten)]
    pub survey: Survey,
    pub questions: Vec<QuestionWithOptions>,
}

/// DTO for creating a survey. The owner is passed explicitly.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSurveyRequest {
    pub user_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// DTO for updating a survey. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSurveyRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStarRequest {
    pub is_star: bool,
}

/// DTO for copying a survey. Defaults to the source owner.
#[derive(Debug, Deserialize)]
pub struct CopySurveyRequest {
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SurveyListParams {
    pub user_id: i64,
}

/// Publish-readiness summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub unqualified_questions: i64,
    pub unqualified_options: i64,
    pub valid: bool,
}
