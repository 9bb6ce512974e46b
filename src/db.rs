// src/db.rs

use std::time::Duration;

use sqlx::{Sqlite, SqlitePool, Transaction, sqlite::SqlitePoolOptions};

use crate::{config::Config, error::AppError};

const CONNECT_RETRIES: u32 = 5;

/// Opens the pool, retrying while the database file or volume is not ready.
pub async fn connect(config: &Config) -> Result<SqlitePool, AppError> {
    let mut retry_count = 0;
    loop {
        match SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                retry_count += 1;
                if retry_count > CONNECT_RETRIES {
                    return Err(AppError::TransactionFailure(format!(
                        "Failed to connect to database after {CONNECT_RETRIES} retries: {e}"
                    )));
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

/// Applies the embedded schema migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Opens a write transaction holding the database write lock from the start.
///
/// A deferred `BEGIN` that reads before writing fails with `SQLITE_BUSY` when
/// another writer got there first; `BEGIN IMMEDIATE` waits on the busy timeout.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, AppError> {
    let tx = pool.begin_with("BEGIN IMMEDIATE").await?;
    Ok(tx)
}
