// src/services/grading.rs

//! Exam submission grading.
//!
//! A submission creates one score row, grades every answer against its
//! question's stored answer key, writes the totals back and bulk-inserts the
//! graded answers, all in one transaction.

use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    models::{
        exam_record::{NewUserAnswer, ScoreDetail, ScoreTotals, SubmittedAnswer, UserScore},
        question::Question,
    },
    repository::{
        exam_record::{self as exam_repo, ANONYMOUS},
        question as question_repo, survey as survey_repo,
    },
};

/// Content of the text question whose answer becomes the respondent's name.
pub const NAME_LABEL: &str = "Name";

pub const DEFAULT_RANKING_LIMIT: i64 = 10;
pub const MAX_RANKING_LIMIT: i64 = 100;

/// Running totals for one submission.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreTally {
    pub name: Option<String>,
    pub score: i64,
    pub total_score: i64,
    pub question_count: i64,
    pub correct_count: i64,
}

impl ScoreTally {
    /// Accounts for one answer and returns whether it is correct.
    ///
    /// Correctness is whole-string equality with the stored key, so a
    /// multiple choice answer listing the right options in another order
    /// does not count.
    pub fn record(&mut self, question: &Question, answer: &str) -> bool {
        if !question.question_type.is_choice() {
            if question.content == NAME_LABEL && !answer.is_empty() {
                self.name = Some(answer.to_string());
            }
            return false;
        }

        self.question_count += 1;
        self.total_score += question.score;

        let correct = matches!(
            question.correct_answer.as_deref(),
            Some(key) if !key.is_empty() && key == answer
        );
        if correct {
            self.score += question.score;
            self.correct_count += 1;
        }
        correct
    }

    pub fn into_totals(self, survey_id: i64) -> ScoreTotals {
        ScoreTotals {
            survey_id,
            name: self.name.unwrap_or_else(|| ANONYMOUS.to_string()),
            score: self.score,
            total_score: self.total_score,
            question_count: self.question_count,
            correct_count: self.correct_count,
        }
    }
}

/// Grades and stores one exam attempt. Returns the new score id.
pub async fn submit_exam(
    pool: &SqlitePool,
    answers: Vec<SubmittedAnswer>,
    duration: i64,
) -> Result<i64, AppError> {
    if answers.is_empty() {
        return Err(AppError::InvariantViolation("No answers submitted".to_string()));
    }
    if duration < 0 {
        return Err(AppError::InvariantViolation(format!(
            "Negative duration {duration}"
        )));
    }

    let mut tx = db::begin_write(pool).await?;

    let score_id = exam_repo::insert_score(&mut *tx, duration).await?;

    let mut tally = ScoreTally::default();
    let mut survey_id: Option<i64> = None;
    let mut graded = Vec::with_capacity(answers.len());

    for submitted in answers {
        let question = question_repo::get_question(&mut *tx, submitted.question_id).await?;

        match survey_id {
            None => survey_id = Some(question.survey_id),
            Some(expected) if expected != question.survey_id => {
                return Err(AppError::InvariantViolation(format!(
                    "Question {} belongs to survey {}, not {expected}",
                    question.id, question.survey_id
                )));
            }
            Some(_) => {}
        }

        let answer_valid = tally.record(&question, &submitted.answer);
        graded.push(NewUserAnswer {
            survey_id: question.survey_id,
            question_id: question.id,
            score_id,
            answer: submitted.answer,
            answer_valid,
        });
    }

    let survey_id = survey_id
        .ok_or_else(|| AppError::InvariantViolation("No answers submitted".to_string()))?;
    let totals = tally.into_totals(survey_id);

    exam_repo::update_score_totals(&mut *tx, score_id, &totals).await?;
    exam_repo::insert_answers(&mut *tx, &graded).await?;
    survey_repo::increment_answer_total(&mut *tx, survey_id).await?;

    tx.commit().await?;

    tracing::info!(
        survey_id,
        score_id,
        score = totals.score,
        total_score = totals.total_score,
        correct_count = totals.correct_count,
        "Exam graded"
    );
    Ok(score_id)
}

/// Top attempts of a survey: score descending, shorter duration first on ties.
pub async fn ranking(
    pool: &SqlitePool,
    survey_id: i64,
    limit: Option<i64>,
) -> Result<Vec<UserScore>, AppError> {
    let limit = limit
        .unwrap_or(DEFAULT_RANKING_LIMIT)
        .clamp(1, MAX_RANKING_LIMIT);

    let mut conn = pool.acquire().await?;
    survey_repo::get_survey(&mut *conn, survey_id).await?;
    exam_repo::list_ranking(&mut *conn, survey_id, limit).await
}

/// Score row with its graded answers.
pub async fn score_detail(pool: &SqlitePool, score_id: i64) -> Result<ScoreDetail, AppError> {
    let mut conn = pool.acquire().await?;
    let score = exam_repo::get_score(&mut *conn, score_id).await?;
    let answers = exam_repo::list_answers_by_score(&mut *conn, score_id).await?;
    Ok(ScoreDetail { score, answers })
}
