// src/services/ordering.rs

//! Keeps `order_num` contiguous inside a partition.
//!
//! Each helper runs on a connection owned by the caller's transaction, so a
//! failed shift rolls back together with the insert/delete/move it belongs to.

use sqlx::SqliteConnection;

use crate::{
    error::AppError,
    repository::{
        self, ORDER_NUM_CEILING, Partition, option as option_repo, question as question_repo,
    },
};

/// Range shift that accompanies a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub start: i64,
    pub end: i64,
    pub increment: i64,
}

/// Computes the shift for moving a row from `old` to `new`.
/// Returns `None` when the row stays where it is.
pub fn plan_move(old: i64, new: i64) -> Option<Shift> {
    if old == new {
        return None;
    }

    Some(Shift {
        start: old.min(new),
        end: old.max(new),
        increment: if new < old { 1 } else { -1 },
    })
}

/// Makes room at `requested` (or at the end when `None`) and returns the
/// position the new row must take.
pub async fn open_slot(
    conn: &mut SqliteConnection,
    partition: Partition,
    requested: Option<i64>,
) -> Result<i64, AppError> {
    let len = repository::partition_len(conn, partition).await?;
    let at = requested.unwrap_or(len);

    if at < 0 || at > len {
        return Err(AppError::InvariantViolation(format!(
            "Insert position {at} outside 0..={len}"
        )));
    }

    if at < len {
        repository::shift_order_num(conn, partition, None, at, ORDER_NUM_CEILING, 1).await?;
    }

    Ok(at)
}

/// Pulls every row after `removed_order_num` one step forward. The removed row
/// itself is excluded so it can be deleted or re-homed afterwards.
pub async fn close_gap(
    conn: &mut SqliteConnection,
    partition: Partition,
    removed_id: i64,
    removed_order_num: i64,
) -> Result<(), AppError> {
    repository::shift_order_num(
        conn,
        partition,
        Some(removed_id),
        removed_order_num,
        ORDER_NUM_CEILING,
        -1,
    )
    .await?;

    Ok(())
}

/// Moves row `id` from `old` to `new` in one shift plus one update.
/// Returns `false` for a same-position move, which touches nothing.
pub async fn reposition(
    conn: &mut SqliteConnection,
    partition: Partition,
    id: i64,
    old: i64,
    new: i64,
) -> Result<bool, AppError> {
    let len = repository::partition_len(conn, partition).await?;
    if new < 0 || new >= len {
        return Err(AppError::InvariantViolation(format!(
            "Move target {new} outside 0..{len}"
        )));
    }

    let Some(shift) = plan_move(old, new) else {
        return Ok(false);
    };

    repository::shift_order_num(
        conn,
        partition,
        Some(id),
        shift.start,
        shift.end,
        shift.increment,
    )
    .await?;

    match partition {
        Partition::Questions { .. } => question_repo::set_order_num(conn, id, new).await?,
        Partition::Options { .. } => option_repo::set_order_num(conn, id, new).await?,
    }

    Ok(true)
}
