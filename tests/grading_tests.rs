// tests/grading_tests.rs

mod common;

use common::{add_question, count_rows, new_survey, set_key, test_pool};
use sqlx::SqlitePool;
use survey_backend::{
    error::AppError,
    models::{exam_record::SubmittedAnswer, question::QuestionType},
    services::{grading, survey},
};

fn answer(question_id: i64, text: &str) -> SubmittedAnswer {
    SubmittedAnswer {
        question_id,
        answer: text.to_string(),
    }
}

/// Name (text), Q2 single worth 5, Q3 multiple worth 3.
/// Returns (survey id, question ids, Q2 key, Q3 key).
async fn exam_fixture(pool: &SqlitePool) -> (i64, [i64; 3], String, String) {
    let s = new_survey(pool, "Exam").await;
    let q1 = add_question(pool, s.id, QuestionType::Text, "Name", 0).await;
    let q2 = add_question(pool, s.id, QuestionType::Single, "Q2", 5).await;
    let q3 = add_question(pool, s.id, QuestionType::Multiple, "Q3", 3).await;
    let key2 = set_key(pool, &q2, &[0]).await;
    let key3 = set_key(pool, &q3, &[0, 1]).await;

    (s.id, [q1.question.id, q2.question.id, q3.question.id], key2, key3)
}

#[tokio::test]
async fn full_marks_submission() {
    let pool = test_pool().await;
    let (survey_id, [q1, q2, q3], key2, key3) = exam_fixture(&pool).await;

    let score_id = grading::submit_exam(
        &pool,
        vec![answer(q1, "Alice"), answer(q2, &key2), answer(q3, &key3)],
        60,
    )
    .await
    .unwrap();

    let detail = grading::score_detail(&pool, score_id).await.unwrap();
    assert_eq!(detail.score.survey_id, Some(survey_id));
    assert_eq!(detail.score.name, "Alice");
    assert_eq!(detail.score.score, 8);
    assert_eq!(detail.score.total_score, 8);
    assert_eq!(detail.score.correct_count, 2);
    assert_eq!(detail.score.question_count, 2);
    assert_eq!(detail.score.duration, 60);

    assert_eq!(detail.answers.len(), 3);
    let valid: Vec<bool> = detail.answers.iter().map(|a| a.answer_valid).collect();
    assert_eq!(valid, vec![false, true, true]);
    assert!(detail.answers.iter().all(|a| a.score_id == score_id));
    assert!(detail.answers.iter().all(|a| a.survey_id == survey_id));

    let s = survey::get_survey(&pool, survey_id).await.unwrap();
    assert_eq!(s.answer_total, 1);
}

#[tokio::test]
async fn reordered_multiple_choice_is_wrong() {
    let pool = test_pool().await;
    let (_, [_, q2, q3], key2, key3) = exam_fixture(&pool).await;

    let reversed: Vec<&str> = key3.split(',').rev().collect();
    let reversed = reversed.join(",");
    assert_ne!(reversed, key3);

    let score_id = grading::submit_exam(
        &pool,
        vec![answer(q2, &key2), answer(q3, &reversed)],
        10,
    )
    .await
    .unwrap();

    let detail = grading::score_detail(&pool, score_id).await.unwrap();
    assert_eq!(detail.score.score, 5);
    assert_eq!(detail.score.total_score, 8);
    assert_eq!(detail.score.correct_count, 1);
    assert!(!detail.answers[1].answer_valid);
}

#[tokio::test]
async fn name_defaults_to_anonymous() {
    let pool = test_pool().await;
    let (_, [q1, q2, _], _, _) = exam_fixture(&pool).await;

    let score_id = grading::submit_exam(&pool, vec![answer(q1, ""), answer(q2, "nope")], 5)
        .await
        .unwrap();

    let detail = grading::score_detail(&pool, score_id).await.unwrap();
    assert_eq!(detail.score.name, "anonymous");
    assert_eq!(detail.score.score, 0);
    assert_eq!(detail.score.total_score, 5);
}

#[tokio::test]
async fn empty_submission_is_rejected() {
    let pool = test_pool().await;

    let result = grading::submit_exam(&pool, Vec::new(), 10).await;

    assert!(matches!(result, Err(AppError::InvariantViolation(_))));
    assert_eq!(count_rows(&pool, "user_scores").await, 0);
}

#[tokio::test]
async fn unknown_question_rolls_back_everything() {
    let pool = test_pool().await;
    let (survey_id, [q1, q2, _], key2, _) = exam_fixture(&pool).await;

    let result = grading::submit_exam(
        &pool,
        vec![answer(q1, "Bob"), answer(q2, &key2), answer(9999, "1")],
        10,
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(count_rows(&pool, "user_scores").await, 0);
    assert_eq!(count_rows(&pool, "user_answers").await, 0);
    assert_eq!(
        survey::get_survey(&pool, survey_id).await.unwrap().answer_total,
        0
    );
}

#[tokio::test]
async fn answers_must_belong_to_one_survey() {
    let pool = test_pool().await;
    let (_, [q1, _, _], _, _) = exam_fixture(&pool).await;
    let other = new_survey(&pool, "Other").await;
    let foreign = add_question(&pool, other.id, QuestionType::Single, "X", 1).await;

    let result = grading::submit_exam(
        &pool,
        vec![answer(q1, "Carol"), answer(foreign.question.id, "1")],
        10,
    )
    .await;

    assert!(matches!(result, Err(AppError::InvariantViolation(_))));
    assert_eq!(count_rows(&pool, "user_scores").await, 0);
}

#[tokio::test]
async fn ranking_prefers_higher_score_then_shorter_duration() {
    let pool = test_pool().await;
    let (survey_id, [q1, q2, q3], key2, key3) = exam_fixture(&pool).await;

    let slow = grading::submit_exam(
        &pool,
        vec![answer(q1, "Slow"), answer(q2, &key2), answer(q3, &key3)],
        60,
    )
    .await
    .unwrap();
    let weak = grading::submit_exam(&pool, vec![answer(q1, "Weak"), answer(q2, "x")], 5)
        .await
        .unwrap();
    let fast = grading::submit_exam(
        &pool,
        vec![answer(q1, "Fast"), answer(q2, &key2), answer(q3, &key3)],
        50,
    )
    .await
    .unwrap();

    let ranking = grading::ranking(&pool, survey_id, None).await.unwrap();
    let ids: Vec<i64> = ranking.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![fast, slow, weak]);

    let top = grading::ranking(&pool, survey_id, Some(1)).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "Fast");

    assert_eq!(
        survey::get_survey(&pool, survey_id).await.unwrap().answer_total,
        3
    );
}

#[tokio::test]
async fn missing_score_is_not_found() {
    let pool = test_pool().await;

    assert!(matches!(
        grading::score_detail(&pool, 1).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        grading::ranking(&pool, 1, None).await,
        Err(AppError::NotFound(_))
    ));
}
