// src/services/copy.rs

//! Deep copy of a survey graph.
//!
//! Every question and option gets a fresh id, so each cloned choice question's
//! answer key is rebuilt from the ids of the cloned options.

use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    db,
    error::AppError,
    models::{
        option::NewOption,
        question::{NewQuestion, Question},
        survey::{NewSurvey, SurveyStatus},
    },
    repository::{option as option_repo, question as question_repo, survey as survey_repo},
    services::answer_key::AnswerKey,
};

/// Suffix appended to the title of a copy.
pub const COPY_MARKER: &str = " (copy)";

/// Copies survey `source_id` for `owner_id` in one transaction and returns
/// the new survey's id. The copy always starts as a draft.
pub async fn copy_survey(pool: &SqlitePool, source_id: i64, owner_id: i64) -> Result<i64, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let source = survey_repo::get_survey(&mut *tx, source_id).await?;
    let questions = question_repo::list_questions_ordered(&mut *tx, source_id, None).await?;
    if questions.is_empty() {
        return Err(AppError::InvariantViolation(format!(
            "Survey {source_id} has no questions to copy"
        )));
    }

    let new_survey_id = survey_repo::insert_survey(
        &mut *tx,
        &NewSurvey {
            user_id: owner_id,
            title: format!("{}{}", source.title, COPY_MARKER),
            description: source.description,
            status: SurveyStatus::Draft,
        },
    )
    .await?;

    let mut copied_options = 0usize;
    for question in &questions {
        if question.question_type.is_choice() {
            copied_options += copy_choice_question(&mut *tx, question, new_survey_id).await?;
        } else {
            question_repo::insert_question(&mut *tx, &cloned(question, new_survey_id)).await?;
        }
    }

    tx.commit().await?;

    tracing::info!(
        source_id,
        new_survey_id,
        questions = questions.len(),
        options = copied_options,
        "Survey copied"
    );
    Ok(new_survey_id)
}

/// Raw clone of the question row. Never creates default options.
fn cloned(question: &Question, survey_id: i64) -> NewQuestion {
    NewQuestion {
        survey_id,
        question_type: question.question_type,
        content: question.content.clone(),
        score: question.score,
        order_num: question.order_num,
        correct_answer: None,
    }
}

/// Clones one choice question with its options and remaps its answer key.
/// Returns the number of options copied.
async fn copy_choice_question(
    conn: &mut SqliteConnection,
    question: &Question,
    survey_id: i64,
) -> Result<usize, AppError> {
    let source_key = AnswerKey::parse(question.correct_answer.as_deref())?;

    let new_question_id = question_repo::insert_question(conn, &cloned(question, survey_id)).await?;

    let options = option_repo::list_options_ordered(conn, question.id).await?;
    let mut new_key = AnswerKey::default();
    for option in &options {
        let new_option_id = option_repo::insert_option(
            conn,
            &NewOption {
                question_id: new_question_id,
                survey_id,
                content: option.content.clone(),
                order_num: option.order_num,
            },
        )
        .await?;

        // Accumulates in option order, not in the source key's order
        if source_key.contains(option.id) {
            new_key.push(new_option_id);
        }
    }

    question_repo::set_correct_answer(conn, new_question_id, new_key.to_stored().as_deref())
        .await?;

    Ok(options.len())
}
