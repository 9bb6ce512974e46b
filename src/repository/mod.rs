// src/repository/mod.rs

//! Narrow persistence interface used by the engines.
//!
//! Every function takes a `&mut SqliteConnection` so callers decide the
//! transaction scope: pass `&mut *tx` inside a multi-step operation, or a
//! pooled connection for plain reads.

pub mod exam_record;
pub mod option;
pub mod question;
pub mod survey;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    error::AppError,
    models::{
        option::QuestionOption,
        question::{Question, QuestionType},
    },
};

/// Upper bound used when a shift must reach the end of a partition.
pub const ORDER_NUM_CEILING: i64 = i64::MAX;

/// Scope inside which `order_num` is contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Questions {
        survey_id: i64,
        question_type: QuestionType,
    },
    Options {
        question_id: i64,
    },
}

impl From<&Question> for Partition {
    fn from(question: &Question) -> Self {
        Partition::Questions {
            survey_id: question.survey_id,
            question_type: question.question_type,
        }
    }
}

impl From<&QuestionOption> for Partition {
    fn from(option: &QuestionOption) -> Self {
        Partition::Options {
            question_id: option.question_id,
        }
    }
}

impl Partition {
    fn table(&self) -> &'static str {
        match self {
            Partition::Questions { .. } => "questions",
            Partition::Options { .. } => "options",
        }
    }

    fn push_predicate(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        match *self {
            Partition::Questions {
                survey_id,
                question_type,
            } => {
                builder
                    .push(" WHERE survey_id = ")
                    .push_bind(survey_id)
                    .push(" AND question_type = ")
                    .push_bind(question_type);
            }
            Partition::Options { question_id } => {
                builder.push(" WHERE question_id = ").push_bind(question_id);
            }
        }
    }
}

/// Adds `increment` to every `order_num` in `[range_start, range_end]` of the
/// partition, skipping `exclude_id`. One statement, so the shift is atomic.
pub async fn shift_order_num(
    conn: &mut SqliteConnection,
    partition: Partition,
    exclude_id: Option<i64>,
    range_start: i64,
    range_end: i64,
    increment: i64,
) -> Result<u64, AppError> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE ");
    builder
        .push(partition.table())
        .push(" SET order_num = order_num + ")
        .push_bind(increment);
    partition.push_predicate(&mut builder);
    builder
        .push(" AND order_num BETWEEN ")
        .push_bind(range_start)
        .push(" AND ")
        .push_bind(range_end);
    if let Some(id) = exclude_id {
        builder.push(" AND id <> ").push_bind(id);
    }

    let result = builder.build().execute(&mut *conn).await?;

    tracing::debug!(
        ?partition,
        range_start,
        range_end,
        increment,
        rows = result.rows_affected(),
        "Shifted order_num range"
    );

    Ok(result.rows_affected())
}

/// Number of rows currently in the partition.
pub async fn partition_len(
    conn: &mut SqliteConnection,
    partition: Partition,
) -> Result<i64, AppError> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM ");
    builder.push(partition.table());
    partition.push_predicate(&mut builder);

    let count: i64 = builder
        .build_query_scalar()
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

/// `order_num` values of the partition in ascending order.
pub async fn partition_order_nums(
    conn: &mut SqliteConnection,
    partition: Partition,
) -> Result<Vec<i64>, AppError> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT order_num FROM ");
    builder.push(partition.table());
    partition.push_predicate(&mut builder);
    builder.push(" ORDER BY order_num ASC");

    let order_nums: Vec<i64> = builder
        .build_query_scalar()
        .fetch_all(&mut *conn)
        .await?;

    Ok(order_nums)
}
