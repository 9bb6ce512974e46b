// tests/concurrency_tests.rs

mod common;

use common::{add_question, contiguous, file_pool, new_survey, order_nums};
use survey_backend::{
    models::{
        option::CreateOptionRequest,
        question::{CreateQuestionRequest, QuestionType},
    },
    repository::Partition,
    services::{option, question},
};

const WRITERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_at_head_are_serialized() {
    let (pool, path) = file_pool(5).await;
    let survey_id = new_survey(&pool, "Busy").await.id;

    let mut handles = Vec::new();
    for i in 0..WRITERS {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            question::create_question(
                &pool,
                survey_id,
                CreateQuestionRequest {
                    question_type: QuestionType::Text,
                    content: format!("q{i}"),
                    score: 0,
                    order_num: Some(0),
                },
            )
            .await
        }));
    }

    let mut failures = Vec::new();
    for handle in handles {
        if let Err(e) = handle.await.expect("Task panicked") {
            failures.push(e.to_string());
        }
    }

    assert!(failures.is_empty(), "failed writers: {failures:?}");
    assert_eq!(
        order_nums(
            &pool,
            Partition::Questions {
                survey_id,
                question_type: QuestionType::Text,
            }
        )
        .await,
        contiguous(WRITERS)
    );

    pool.close().await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_option_edits_keep_partition_contiguous() {
    let (pool, path) = file_pool(5).await;
    let survey = new_survey(&pool, "Busy options").await;
    let q = add_question(&pool, survey.id, QuestionType::Multiple, "M", 1).await;
    let question_id = q.question.id;

    let mut handles = Vec::new();
    for i in 0..WRITERS {
        let pool = pool.clone();
        let moved = q.options[i % q.options.len()].id;
        handles.push(tokio::spawn(async move {
            option::create_option(
                &pool,
                question_id,
                CreateOptionRequest {
                    content: format!("extra {i}"),
                    order_num: Some(1),
                },
            )
            .await?;
            option::move_option(&pool, moved, 0).await.map(|_| ())
        }));
    }

    for handle in handles {
        handle
            .await
            .expect("Task panicked")
            .expect("Concurrent option edit failed");
    }

    assert_eq!(
        order_nums(&pool, Partition::Options { question_id }).await,
        contiguous(q.options.len() + WRITERS)
    );

    pool.close().await;
    let _ = std::fs::remove_file(&path);
}
