//! Persistent request cache (§6), grounded in `python_server/database.py`:
//! a SQLite-backed `requests` table guarded by a single async mutex. Per
//! the concurrency model (§5), the lock is only ever held across a single
//! read or write — never across a solve's execution.

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use crate::dto::RequestStatus;

pub struct StoredRequest {
    pub id: i64,
    pub timestamp: String,
    pub status: RequestStatus,
    pub content: Vec<u8>,
}

pub struct RequestCache {
    pool: SqlitePool,
    lock: Mutex<()>,
}

impl RequestCache {
    pub async fn connect(database_url: &str) -> Result<RequestCache> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .with_context(|| format!("could not connect to {database_url}"))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS requests (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                hash      TEXT NOT NULL UNIQUE,
                content   BLOB NOT NULL,
                timestamp TEXT NOT NULL,
                status    TEXT NOT NULL CHECK (status IN ('PENDING', 'COMPLETED'))
            )",
        )
        .execute(&pool)
        .await
        .context("could not create requests table")?;

        Ok(RequestCache { pool, lock: Mutex::new(()) })
    }

    pub async fn find_by_hash(&self, hash: &str) -> Result<Option<StoredRequest>> {
        let _guard = self.lock.lock().await;
        let row = sqlx::query("SELECT id, timestamp, status, content FROM requests WHERE hash = ?")
            .bind(hash)
            .fetch_optional(&self.pool)
            .await
            .context("could not query request by hash")?;
        row.map(row_to_stored).transpose()
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<StoredRequest>> {
        let _guard = self.lock.lock().await;
        let row = sqlx::query("SELECT id, timestamp, status, content FROM requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("could not query request by id")?;
        row.map(row_to_stored).transpose()
    }

    pub async fn list(&self) -> Result<Vec<crate::dto::RequestSummaryDto>> {
        let _guard = self.lock.lock().await;
        let rows = sqlx::query("SELECT id, timestamp, status FROM requests ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("could not list requests")?;
        Ok(rows
            .into_iter()
            .map(|row| crate::dto::RequestSummaryDto {
                id: row.get::<i64, _>("id"),
                timestamp: row.get::<String, _>("timestamp"),
                status: RequestStatus::from_db_str(&row.get::<String, _>("status")),
            })
            .collect())
    }

    /// Inserts a new `PENDING` row and returns its id. The timestamp is
    /// supplied by the caller (adapter boundary, not core logic) so the
    /// cache itself stays free of wall-clock reads.
    pub async fn insert_pending(&self, hash: &str, timestamp: &str) -> Result<i64> {
        let _guard = self.lock.lock().await;
        let result = sqlx::query("INSERT INTO requests (hash, content, timestamp, status) VALUES (?, ?, ?, ?)")
            .bind(hash)
            .bind(Vec::<u8>::new())
            .bind(timestamp)
            .bind(RequestStatus::Pending.as_db_str())
            .execute(&self.pool)
            .await
            .context("could not insert pending request")?;
        Ok(result.last_insert_rowid())
    }

    pub async fn complete(&self, id: i64, content: &[u8]) -> Result<()> {
        let _guard = self.lock.lock().await;
        sqlx::query("UPDATE requests SET content = ?, status = ? WHERE id = ?")
            .bind(content)
            .bind(RequestStatus::Completed.as_db_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("could not mark request completed")?;
        Ok(())
    }
}

fn row_to_stored(row: sqlx::sqlite::SqliteRow) -> Result<StoredRequest> {
    Ok(StoredRequest {
        id: row.get::<i64, _>("id"),
        timestamp: row.get::<String, _>("timestamp"),
        status: RequestStatus::from_db_str(&row.get::<String, _>("status")),
        content: row.get::<Vec<u8>, _>("content"),
    })
}
