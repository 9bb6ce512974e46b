// tests/survey_tests.rs

mod common;

use common::{add_question, count_rows, new_survey, set_key, test_pool};
use survey_backend::{
    error::AppError,
    models::{exam_record::SubmittedAnswer, question::QuestionType, survey::SurveyStatus},
    services::{grading, option, survey, validation},
};

#[tokio::test]
async fn validation_counts_unqualified_records() {
    let pool = test_pool().await;
    let s = new_survey(&pool, "Readiness").await;

    add_question(&pool, s.id, QuestionType::Text, "Name", 0).await;
    let single = add_question(&pool, s.id, QuestionType::Single, "S", 1).await;
    let multiple = add_question(&pool, s.id, QuestionType::Multiple, "M", 1).await;

    let report = validation::validate_survey(&pool, s.id).await.unwrap();
    assert_eq!(report.unqualified_questions, 2);
    assert_eq!(report.unqualified_options, 0);
    assert!(!report.valid);

    set_key(&pool, &single, &[0]).await;
    set_key(&pool, &multiple, &[1, 2]).await;
    assert!(validation::validate_survey(&pool, s.id).await.unwrap().valid);

    // Strip the multiple choice question down to one option
    for o in &multiple.options[..3] {
        option::delete_option(&pool, o.id).await.unwrap();
    }
    assert_eq!(
        validation::count_unqualified_options(&pool, s.id).await.unwrap(),
        1
    );
    // Its key lost both options along the way
    assert_eq!(
        validation::count_unqualified_questions(&pool, s.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn validation_of_missing_survey_is_not_found() {
    let pool = test_pool().await;

    assert!(matches!(
        validation::validate_survey(&pool, 12).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn status_change_is_not_gated_by_validation() {
    let pool = test_pool().await;
    let s = new_survey(&pool, "Ungated").await;
    add_question(&pool, s.id, QuestionType::Single, "S", 1).await;

    let published = survey::set_status(&pool, s.id, SurveyStatus::Published)
        .await
        .unwrap();
    assert_eq!(published.status, SurveyStatus::Published);

    let stopped = survey::set_status(&pool, s.id, SurveyStatus::Stopped)
        .await
        .unwrap();
    assert_eq!(stopped.status, SurveyStatus::Stopped);
}

#[tokio::test]
async fn list_trash_and_restore() {
    let pool = test_pool().await;
    let a = new_survey(&pool, "A").await;
    let b = new_survey(&pool, "B").await;
    survey::set_star(&pool, a.id, true).await.unwrap();

    let listed: Vec<i64> = survey::list_surveys(&pool, 1, false)
        .await
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(listed, vec![a.id, b.id]);

    survey::trash_survey(&pool, a.id).await.unwrap();
    let listed = survey::list_surveys(&pool, 1, false).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, b.id);
    let trashed = survey::list_surveys(&pool, 1, true).await.unwrap();
    assert_eq!(trashed[0].id, a.id);

    survey::restore_survey(&pool, a.id).await.unwrap();
    assert_eq!(survey::list_surveys(&pool, 1, false).await.unwrap().len(), 2);
    assert!(survey::list_surveys(&pool, 2, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_survey_fields() {
    let pool = test_pool().await;
    let s = new_survey(&pool, "Before").await;

    let updated = survey::update_survey(&pool, s.id, Some("After".to_string()), None)
        .await
        .unwrap();
    assert_eq!(updated.title, "After");
    assert_eq!(updated.description, None);

    let updated = survey::update_survey(&pool, s.id, None, Some("Details".to_string()))
        .await
        .unwrap();
    assert_eq!(updated.title, "After");
    assert_eq!(updated.description.as_deref(), Some("Details"));

    assert!(matches!(
        survey::update_survey(&pool, 77, Some("x".to_string()), None).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_survey_removes_whole_graph() {
    let pool = test_pool().await;
    let keep = new_survey(&pool, "Keep").await;
    add_question(&pool, keep.id, QuestionType::Single, "K", 1).await;

    let s = new_survey(&pool, "Doomed").await;
    let name = add_question(&pool, s.id, QuestionType::Text, "Name", 0).await;
    let q = add_question(&pool, s.id, QuestionType::Single, "Q", 2).await;
    let key = set_key(&pool, &q, &[2]).await;
    grading::submit_exam(
        &pool,
        vec![
            SubmittedAnswer {
                question_id: name.question.id,
                answer: "Dana".to_string(),
            },
            SubmittedAnswer {
                question_id: q.question.id,
                answer: key,
            },
        ],
        12,
    )
    .await
    .unwrap();

    survey::delete_survey(&pool, s.id).await.unwrap();

    assert!(matches!(
        survey::get_survey(&pool, s.id).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(count_rows(&pool, "surveys").await, 1);
    assert_eq!(count_rows(&pool, "questions").await, 1);
    assert_eq!(count_rows(&pool, "options").await, 4);
    assert_eq!(count_rows(&pool, "user_scores").await, 0);
    assert_eq!(count_rows(&pool, "user_answers").await, 0);

    assert!(matches!(
        survey::delete_survey(&pool, s.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn survey_detail_orders_questions_and_options() {
    let pool = test_pool().await;
    let s = new_survey(&pool, "Detail").await;
    add_question(&pool, s.id, QuestionType::Multiple, "M0", 1).await;
    add_question(&pool, s.id, QuestionType::Text, "Name", 0).await;
    add_question(&pool, s.id, QuestionType::Single, "S0", 1).await;
    add_question(&pool, s.id, QuestionType::Single, "S1", 1).await;

    let detail = survey::survey_detail(&pool, s.id).await.unwrap();

    let contents: Vec<&str> = detail
        .questions
        .iter()
        .map(|q| q.question.content.as_str())
        .collect();
    assert_eq!(contents, vec!["Name", "S0", "S1", "M0"]);
    for q in &detail.questions {
        let positions: Vec<i64> = q.options.iter().map(|o| o.order_num).collect();
        assert_eq!(positions, (0..q.options.len() as i64).collect::<Vec<_>>());
    }
}
