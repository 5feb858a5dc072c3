use thiserror::Error;

use crate::llm::LlmError;

/// Errors surfaced by the chat core.
///
/// `CompletionUnavailable` is retryable by the caller; nothing is retried
/// internally.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("session store unavailable: {0}")]
    StoreUnavailable(#[source] RepositoryError),

    #[error("completion service unavailable: {0}")]
    CompletionUnavailable(#[source] LlmError),
}

/// Errors related to patient record operations.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid record: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from repository operations (used by trait definitions in doula-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::InvalidRequest("message must not be empty".to_string());
        assert_eq!(err.to_string(), "invalid request: message must not be empty");

        let err = ChatError::CompletionUnavailable(LlmError::AuthenticationFailed);
        assert_eq!(
            err.to_string(),
            "completion service unavailable: authentication failed"
        );
    }

    #[test]
    fn test_chat_error_source_chain() {
        use std::error::Error as _;
        let err = ChatError::StoreUnavailable(RepositoryError::Connection);
        let source = err.source().expect("store error should carry a source");
        assert_eq!(source.to_string(), "database connection error");
    }

    #[test]
    fn test_record_error_from_repository() {
        let err: RecordError = RepositoryError::Query("disk I/O error".to_string()).into();
        assert_eq!(err.to_string(), "storage error: query error: disk I/O error");
    }
}
