//! SQLite turn store implementation.
//!
//! Implements `TurnStore` from `doula-core`. The log is append-only; `seq` is
//! the AUTOINCREMENT rowid and breaks ties between turns that share a
//! `created_at`.

use chrono::{DateTime, Utc};
use doula_core::chat::repository::TurnStore;
use doula_types::error::RepositoryError;
use doula_types::llm::MessageRole;
use doula_types::turn::{NewTurn, Turn};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `TurnStore`.
pub struct SqliteTurnStore {
    pool: DatabasePool,
}

impl SqliteTurnStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping between SQLite rows and domain types.
struct TurnRow {
    seq: i64,
    session_id: String,
    role: String,
    text: String,
    author_id: String,
    created_at: String,
    model: Option<String>,
    stop_reason: Option<String>,
    response_ms: Option<i64>,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            seq: row.try_get("seq")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            text: row.try_get("text")?,
            author_id: row.try_get("author_id")?,
            created_at: row.try_get("created_at")?,
            model: row.try_get("model")?,
            stop_reason: row.try_get("stop_reason")?,
            response_ms: row.try_get("response_ms")?,
        })
    }

    fn into_turn(self) -> Result<Turn, RepositoryError> {
        let role: MessageRole = self.role.parse().map_err(RepositoryError::Query)?;

        Ok(Turn {
            seq: self.seq,
            session_id: self.session_id,
            role,
            text: self.text,
            author_id: self.author_id,
            created_at: parse_datetime(&self.created_at)?,
            model: self.model,
            stop_reason: self.stop_reason,
            response_ms: self.response_ms.and_then(|ms| u64::try_from(ms).ok()),
        })
    }
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Turn>, RepositoryError> {
    rows.iter()
        .map(|r| {
            TurnRow::from_row(r)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_turn()
        })
        .collect()
}

const SELECT_COLUMNS: &str =
    "seq, session_id, role, text, author_id, created_at, model, stop_reason, response_ms";

impl TurnStore for SqliteTurnStore {
    async fn append_turn(&self, session_id: &str, turn: &NewTurn) -> Result<Turn, RepositoryError> {
        // Holding the writer connection for the whole transaction keeps
        // created_at non-decreasing even if the wall clock steps backwards.
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let last: Option<String> = sqlx::query_scalar("SELECT MAX(created_at) FROM turns")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let now = Utc::now();
        let created_at = match last.as_deref().map(parse_datetime).transpose()? {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        let created_at: DateTime<Utc> = parse_datetime(&format_datetime(&created_at))?;
        let response_ms = turn.response_ms.map(|ms| i64::try_from(ms).unwrap_or(i64::MAX));

        let result = sqlx::query(
            r#"INSERT INTO turns (session_id, role, text, author_id, created_at, model, stop_reason, response_ms)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(session_id)
        .bind(turn.role.to_string())
        .bind(&turn.text)
        .bind(&turn.author_id)
        .bind(format_datetime(&created_at))
        .bind(&turn.model)
        .bind(&turn.stop_reason)
        .bind(response_ms)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Turn {
            seq: result.last_insert_rowid(),
            session_id: session_id.to_string(),
            role: turn.role,
            text: turn.text.clone(),
            author_id: turn.author_id.clone(),
            created_at,
            model: turn.model.clone(),
            stop_reason: turn.stop_reason.clone(),
            response_ms: turn.response_ms,
        })
    }

    async fn query_recent_turns(
        &self,
        session_id: &str,
        limit: u32,
    ) -> Result<Vec<Turn>, RepositoryError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM turns WHERE session_id = ? ORDER BY created_at DESC, seq DESC LIMIT ?"
        );
        let rows = sqlx::query(&sql)
            .bind(session_id)
            .bind(i64::from(limit))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_rows(&rows)
    }

    async fn list_turns(
        &self,
        session_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Turn>, RepositoryError> {
        // SQLite needs a LIMIT for OFFSET; -1 means unbounded.
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM turns WHERE session_id = ? ORDER BY created_at ASC, seq ASC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query(&sql)
            .bind(session_id)
            .bind(limit.map_or(-1, |l| l.max(0)))
            .bind(offset.unwrap_or(0).max(0))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_rows(&rows)
    }
}
