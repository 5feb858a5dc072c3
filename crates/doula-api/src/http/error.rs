//! Application error type mapping to HTTP status codes.
//!
//! Error bodies have the shape `{"errors": [{"code", "message"}]}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use doula_types::error::{ChatError, RecordError, RepositoryError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Chat(ChatError),
    Record(RecordError),
    /// Store failure outside the chat path (e.g. session log browsing).
    Repository(RepositoryError),
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<RecordError> for AppError {
    fn from(e: RecordError) -> Self {
        AppError::Record(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::InvalidRequest(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::CompletionUnavailable(_)) => (
                StatusCode::TOO_MANY_REQUESTS,
                "COMPLETION_UNAVAILABLE",
                "AI quota exceeded or rate limited".to_string(),
            ),
            AppError::Chat(ChatError::StoreUnavailable(_)) | AppError::Repository(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "Conversation store unavailable".to_string(),
            ),
            AppError::Record(RecordError::Validation(msg)) | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Record(RecordError::Storage(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "Record store unavailable".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(error = ?self, status = status.as_u16(), "Request failed");
        }

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doula_types::llm::LlmError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn completion_failure_is_429_with_fixed_message() {
        let err = AppError::from(ChatError::CompletionUnavailable(LlmError::Provider {
            message: "connection reset".to_string(),
        }));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["code"], "COMPLETION_UNAVAILABLE");
        assert_eq!(
            body["errors"][0]["message"],
            "AI quota exceeded or rate limited"
        );
    }

    #[tokio::test]
    async fn invalid_request_is_400() {
        let err = AppError::from(ChatError::InvalidRequest("message must not be empty".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["message"], "message must not be empty");
    }

    #[test]
    fn store_failures_are_503() {
        let chat = AppError::from(ChatError::StoreUnavailable(RepositoryError::Connection));
        assert_eq!(chat.parts().0, StatusCode::SERVICE_UNAVAILABLE);

        let record = AppError::from(RecordError::Storage(RepositoryError::Connection));
        assert_eq!(record.parts().0, StatusCode::SERVICE_UNAVAILABLE);
    }
}
