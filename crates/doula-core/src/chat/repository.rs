//! TurnStore trait definition.
//!
//! The session log is append-only: there are no update or delete operations.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use doula_types::error::RepositoryError;
use doula_types::turn::{NewTurn, Turn};

/// Repository trait for per-session turn logs.
///
/// Implementations must assign `created_at` and `seq` at write time, with
/// `seq` strictly increasing so that `(created_at, seq)` is a total order.
///
/// Implementations live in doula-infra (e.g., `SqliteTurnStore`).
pub trait TurnStore: Send + Sync {
    /// Append a turn to a session's log and return it as stored.
    fn append_turn(
        &self,
        session_id: &str,
        turn: &NewTurn,
    ) -> impl std::future::Future<Output = Result<Turn, RepositoryError>> + Send;

    /// Get up to `limit` most recent turns, newest first.
    fn query_recent_turns(
        &self,
        session_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, RepositoryError>> + Send;

    /// Get a page of a session's log, oldest first.
    fn list_turns(
        &self,
        session_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, RepositoryError>> + Send;
}
