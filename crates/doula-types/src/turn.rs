//! Conversation turn types for Doula.
//!
//! A session is an opaque string id owning an append-only log of turns.
//! Turns are immutable once written; the store assigns the timestamp and a
//! strictly increasing sequence number at write time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::Message;

// Re-export MessageRole from llm module (turn roles and prompt roles are the same set).
pub use crate::llm::MessageRole;

/// A turn as stored in a session log.
///
/// Ordering key is `(created_at, seq)`: `seq` breaks ties between turns that
/// share a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub seq: i64,
    pub session_id: String,
    pub role: MessageRole,
    pub text: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    /// Model that produced this turn (assistant turns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Why the provider stopped generating (assistant turns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    /// Completion latency in milliseconds (assistant turns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_ms: Option<u64>,
}

impl Turn {
    /// The role/text pair this turn contributes to a prompt.
    pub fn to_message(&self) -> Message {
        Message {
            role: self.role,
            content: self.text.clone(),
        }
    }
}

/// A turn about to be appended. The store fills in `seq` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTurn {
    pub role: MessageRole,
    pub text: String,
    pub author_id: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub response_ms: Option<u64>,
}

impl NewTurn {
    pub fn user(author_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            author_id: author_id.into(),
            model: None,
            stop_reason: None,
            response_ms: None,
        }
    }

    pub fn assistant(author_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
            author_id: author_id.into(),
            model: None,
            stop_reason: None,
            response_ms: None,
        }
    }
}

/// Inbound chat submission: one new user message for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub user_id: String,
    pub message: String,
}

/// What the caller gets back from a successful chat submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}
