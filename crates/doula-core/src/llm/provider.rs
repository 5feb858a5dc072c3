//! LlmProvider trait definition.
//!
//! This is the core abstraction that completion backends implement.
//! Uses RPITIT for `complete`; see `BoxLlmProvider` for runtime selection.

use doula_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion service backends (OpenAI, Gemini, Mistral, ...).
///
/// A call blocks for the full duration of the remote request. Implementations
/// must not retry or impose their own timeout; that policy belongs to callers.
///
/// Implementations live in doula-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai", "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
