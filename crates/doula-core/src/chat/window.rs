//! History window: the recent-turn slice of a session that goes into a prompt.
//!
//! The store answers "most recent N" newest-first; [`chronological_restore`]
//! turns that back into conversation order before the prompt is assembled.

use std::sync::Arc;

use doula_types::error::ChatError;
use doula_types::llm::Message;
use doula_types::turn::Turn;
use tracing::debug;

use crate::chat::repository::TurnStore;

/// Default number of stored turns loaded per request.
pub const DEFAULT_WINDOW_SIZE: usize = 6;

/// Prompt context for one request: system preamble, history, then the new
/// user message once [`ConversationContext::push_user`] has been called.
///
/// The system message is synthesized from config and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationContext {
    session_id: String,
    system: Message,
    history: Vec<Message>,
    user: Option<Message>,
}

impl ConversationContext {
    /// Build a context from a system instruction and turns in chronological order.
    pub fn new(session_id: impl Into<String>, system_prompt: &str, history: &[Turn]) -> Self {
        Self {
            session_id: session_id.into(),
            system: Message::system(system_prompt),
            history: history.iter().map(Turn::to_message).collect(),
            user: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn system(&self) -> &Message {
        &self.system
    }

    /// Historical turns, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The pushed user message, if any.
    pub fn user(&self) -> Option<&Message> {
        self.user.as_ref()
    }

    /// Append the caller's new message; it becomes the last entry of the prompt.
    ///
    /// Pushing twice replaces the earlier message.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.user = Some(Message::user(text));
    }

    /// The full role-tagged sequence sent to the completion service.
    pub fn to_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(self.system.clone());
        messages.extend(self.history.iter().cloned());
        if let Some(user) = &self.user {
            messages.push(user.clone());
        }
        messages
    }
}

/// Restore conversation order from a newest-first store read.
pub fn chronological_restore(mut newest_first: Vec<Turn>) -> Vec<Turn> {
    newest_first.reverse();
    newest_first
}

/// Loads the most recent turns of a session and wraps them in a prompt context.
///
/// Read-only: never writes to the store and never retries a failed read.
pub struct HistoryWindow<S: TurnStore> {
    store: Arc<S>,
    system_prompt: String,
}

impl<S: TurnStore> HistoryWindow<S> {
    pub fn new(store: Arc<S>, system_prompt: impl Into<String>) -> Self {
        Self {
            store,
            system_prompt: system_prompt.into(),
        }
    }

    /// Load up to `window_size` most recent turns of `session_id`, oldest first,
    /// preceded by the system message.
    pub async fn load(
        &self,
        session_id: &str,
        window_size: usize,
    ) -> Result<ConversationContext, ChatError> {
        if session_id.trim().is_empty() {
            return Err(ChatError::InvalidRequest(
                "session_id must not be empty".to_string(),
            ));
        }
        if window_size == 0 {
            return Err(ChatError::InvalidRequest(
                "window size must be positive".to_string(),
            ));
        }

        let limit = u32::try_from(window_size).unwrap_or(u32::MAX);
        let newest_first = self
            .store
            .query_recent_turns(session_id, limit)
            .await
            .map_err(ChatError::StoreUnavailable)?;

        let history = chronological_restore(newest_first);
        debug!(
            session_id = %session_id,
            window_size,
            loaded = history.len(),
            "Loaded history window"
        );

        Ok(ConversationContext::new(
            session_id,
            &self.system_prompt,
            &history,
        ))
    }
}
