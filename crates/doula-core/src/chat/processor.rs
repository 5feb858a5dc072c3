//! Chat turn processor: one completion round-trip plus the reply write-back.
//!
//! Steps, in order: push the user message onto the context, call the
//! completion service once, annotate a length-truncated reply, then append
//! the assistant turn to the session log on a best-effort basis.

use std::sync::Arc;
use std::time::{Duration, Instant};

use doula_types::error::ChatError;
use doula_types::llm::{CompletionRequest, CompletionResponse, LlmError};
use doula_types::turn::{NewTurn, Turn};
use tracing::{Instrument, info, info_span, warn};

use crate::chat::repository::TurnStore;
use crate::chat::window::ConversationContext;
use crate::llm::box_provider::BoxLlmProvider;

/// Appended to a reply the provider cut off at the output length bound.
pub const TRUNCATION_NOTICE: &str = "\n\n(Note: reply was cut short due to length limit.)";

/// Author id stamped on every persisted assistant turn.
pub const ASSISTANT_AUTHOR_ID: &str = "assistant";

/// Fixed parameters for every completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.2,
        }
    }
}

/// Reply text after post-processing, plus whether the provider truncated it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    pub reply_text: String,
    pub truncated: bool,
}

impl CompletionResult {
    /// Apply the truncation policy to a raw provider response.
    ///
    /// Fails with [`LlmError::EmptyResponse`] when an untruncated reply is
    /// blank, so an unusable answer is never passed off as a successful one.
    pub fn from_response(response: &CompletionResponse) -> Result<Self, LlmError> {
        let text = response.content.trim();
        let truncated = response.is_truncated();

        if truncated {
            return Ok(Self {
                reply_text: format!("{text}{TRUNCATION_NOTICE}"),
                truncated,
            });
        }
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(Self {
            reply_text: text.to_string(),
            truncated,
        })
    }
}

/// Result of a successful [`ChatTurnProcessor::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub reply: String,
    pub truncated: bool,
    /// The stored assistant turn; `None` if the write failed or timed out.
    pub persisted: Option<Turn>,
}

/// Runs one completion for a prepared context and writes the reply back.
pub struct ChatTurnProcessor<S: TurnStore> {
    store: Arc<S>,
    provider: Arc<BoxLlmProvider>,
    settings: CompletionSettings,
    persist_timeout: Duration,
    record_user_turns: bool,
}

impl<S: TurnStore> ChatTurnProcessor<S> {
    pub fn new(
        store: Arc<S>,
        provider: Arc<BoxLlmProvider>,
        settings: CompletionSettings,
        persist_timeout: Duration,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
            persist_timeout,
            record_user_turns: false,
        }
    }

    /// Also persist the user's message (authored by `user_id`) before the reply.
    pub fn with_user_turns(mut self, enabled: bool) -> Self {
        self.record_user_turns = enabled;
        self
    }

    /// Complete `user_message` against `context` and persist the reply.
    ///
    /// Errors: `InvalidRequest` for a blank message (before any I/O) and
    /// `CompletionUnavailable` for any provider failure, in which case nothing
    /// is written. Persistence failures are logged and never fail the call.
    pub async fn run(
        &self,
        mut context: ConversationContext,
        user_id: &str,
        user_message: &str,
    ) -> Result<TurnOutcome, ChatError> {
        if user_message.trim().is_empty() {
            return Err(ChatError::InvalidRequest(
                "message must not be empty".to_string(),
            ));
        }

        context.push_user(user_message);
        let request = self.build_request(&context);
        let session_id = context.session_id();

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            session_id = %session_id,
        );

        let started = Instant::now();
        let response = self
            .provider
            .complete(&request)
            .instrument(span)
            .await
            .map_err(|e| {
                warn!(session_id = %session_id, error = %e, "Completion call failed");
                ChatError::CompletionUnavailable(e)
            })?;
        let response_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let result = CompletionResult::from_response(&response).map_err(|e| {
            warn!(session_id = %session_id, error = %e, "Completion returned an unusable reply");
            ChatError::CompletionUnavailable(e)
        })?;

        info!(
            session_id = %session_id,
            model = %response.model,
            stop_reason = %response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            response_ms,
            truncated = result.truncated,
            "Completion finished"
        );

        if self.record_user_turns {
            self.persist_best_effort(session_id, &NewTurn::user(user_id, user_message))
                .await;
        }

        let assistant_turn = NewTurn {
            model: Some(response.model.clone()),
            stop_reason: Some(response.stop_reason.to_string()),
            response_ms: Some(response_ms),
            ..NewTurn::assistant(ASSISTANT_AUTHOR_ID, result.reply_text.clone())
        };
        let persisted = self.persist_best_effort(session_id, &assistant_turn).await;

        Ok(TurnOutcome {
            reply: result.reply_text,
            truncated: result.truncated,
            persisted,
        })
    }

    fn build_request(&self, context: &ConversationContext) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: context.to_messages(),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        }
    }

    /// Append a turn under the persist timeout. Failure is logged, not returned.
    async fn persist_best_effort(&self, session_id: &str, turn: &NewTurn) -> Option<Turn> {
        match tokio::time::timeout(self.persist_timeout, self.store.append_turn(session_id, turn))
            .await
        {
            Ok(Ok(stored)) => Some(stored),
            Ok(Err(e)) => {
                warn!(
                    session_id = %session_id,
                    role = %turn.role,
                    error = %e,
                    "Failed to persist turn; reply is still returned"
                );
                None
            }
            Err(_) => {
                warn!(
                    session_id = %session_id,
                    role = %turn.role,
                    timeout_ms = u64::try_from(self.persist_timeout.as_millis()).unwrap_or(u64::MAX),
                    "Timed out persisting turn; reply is still returned"
                );
                None
            }
        }
    }
}
