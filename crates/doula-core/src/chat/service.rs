//! Chat service: the single "submit a message" operation the serving layer calls.
//!
//! ChatService validates a [`ChatRequest`], loads the history window, and
//! hands the context to the [`ChatTurnProcessor`]. A failed history read
//! aborts before the completion service is contacted.

use std::sync::Arc;
use std::time::Duration;

use doula_types::config::ChatConfig;
use doula_types::error::{ChatError, RepositoryError};
use doula_types::turn::{ChatReply, ChatRequest, NewTurn, Turn};
use tracing::info;

use crate::chat::processor::{ChatTurnProcessor, CompletionSettings};
use crate::chat::repository::TurnStore;
use crate::chat::window::HistoryWindow;
use crate::llm::box_provider::BoxLlmProvider;

/// Composes [`HistoryWindow`] and [`ChatTurnProcessor`] over one store.
///
/// Generic over `TurnStore` to maintain clean architecture (doula-core
/// never depends on doula-infra).
pub struct ChatService<S: TurnStore> {
    store: Arc<S>,
    window: HistoryWindow<S>,
    processor: ChatTurnProcessor<S>,
    window_size: usize,
}

impl<S: TurnStore> ChatService<S> {
    /// Wire a chat service from the store, provider, chat config and model name.
    pub fn new(store: Arc<S>, provider: Arc<BoxLlmProvider>, config: &ChatConfig, model: &str) -> Self {
        let settings = CompletionSettings {
            model: model.to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };
        let processor = ChatTurnProcessor::new(
            Arc::clone(&store),
            provider,
            settings,
            Duration::from_millis(config.persist_timeout_ms),
        )
        .with_user_turns(config.record_user_turns);

        Self {
            window: HistoryWindow::new(Arc::clone(&store), config.system_prompt.clone()),
            store,
            processor,
            window_size: config.window_size,
        }
    }

    /// Submit one user message and return the assistant's reply.
    pub async fn submit(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        validate(request)?;

        let context = self
            .window
            .load(&request.session_id, self.window_size)
            .await?;
        let history_len = context.history().len();

        let outcome = self
            .processor
            .run(context, &request.user_id, &request.message)
            .await?;

        info!(
            session_id = %request.session_id,
            user_id = %request.user_id,
            history_len,
            persisted = outcome.persisted.is_some(),
            "Chat turn completed"
        );

        Ok(ChatReply {
            reply: outcome.reply,
        })
    }

    /// Page through a session's stored log, oldest first.
    pub async fn history(
        &self,
        session_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Turn>, RepositoryError> {
        self.store.list_turns(session_id, limit, offset).await
    }

    /// Append a client-authored user turn to a session.
    pub async fn record_user_turn(
        &self,
        session_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<Turn, ChatError> {
        if session_id.trim().is_empty() {
            return Err(ChatError::InvalidRequest("session_id must not be empty".into()));
        }
        if user_id.trim().is_empty() {
            return Err(ChatError::InvalidRequest("user_id must not be empty".into()));
        }
        if text.trim().is_empty() {
            return Err(ChatError::InvalidRequest("text must not be empty".into()));
        }

        self.store
            .append_turn(session_id, &NewTurn::user(user_id, text))
            .await
            .map_err(ChatError::StoreUnavailable)
    }
}

fn validate(request: &ChatRequest) -> Result<(), ChatError> {
    if request.session_id.trim().is_empty() {
        return Err(ChatError::InvalidRequest("session_id must not be empty".into()));
    }
    if request.user_id.trim().is_empty() {
        return Err(ChatError::InvalidRequest("user_id must not be empty".into()));
    }
    if request.message.trim().is_empty() {
        return Err(ChatError::InvalidRequest("message must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::processor::TRUNCATION_NOTICE;
    use crate::chat::testing::{MemoryTurnStore, Script, ScriptedProvider};
    use doula_types::llm::{MessageRole, StopReason};
    use std::sync::atomic::Ordering;

    fn service(
        store: MemoryTurnStore,
        provider: ScriptedProvider,
    ) -> (ChatService<MemoryTurnStore>, Arc<MemoryTurnStore>, Arc<ScriptedProvider>) {
        let store = Arc::new(store);
        let provider = Arc::new(provider);
        let service = ChatService::new(
            Arc::clone(&store),
            Arc::new(BoxLlmProvider::new(Arc::clone(&provider))),
            &ChatConfig::default(),
            "gpt-4o-mini",
        );
        (service, store, provider)
    }

    fn request(session_id: &str, message: &str) -> ChatRequest {
        ChatRequest {
            session_id: session_id.to_string(),
            user_id: "u-1".to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_session_hello() {
        let (service, store, provider) = service(
            MemoryTurnStore::new(),
            ScriptedProvider::reply("Hi there", StopReason::EndTurn),
        );

        let reply = service.submit(&request("s1", "Hello")).await.unwrap();
        assert_eq!(reply, ChatReply { reply: "Hi there".to_string() });

        let sent = provider.requests.lock().unwrap()[0].messages.clone();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].role, MessageRole::System);
        assert_eq!(sent[1].content, "Hello");

        let stored = store.all("s1");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].role, MessageRole::Assistant);
        assert_eq!(stored[0].text, "Hi there");
    }

    #[tokio::test]
    async fn test_window_ignores_oldest_turns() {
        let store = MemoryTurnStore::new();
        store.seed("s1", 8);
        let (service, _store, provider) =
            service(store, ScriptedProvider::reply("ok", StopReason::EndTurn));

        service.submit(&request("s1", "next")).await.unwrap();

        let sent = provider.requests.lock().unwrap()[0].messages.clone();
        let history: Vec<&str> = sent[1..sent.len() - 1]
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(history.len(), 6);
        assert!(!history.contains(&"message 0"));
        assert!(!history.contains(&"message 1"));
        assert_eq!(history.first(), Some(&"message 2"));
    }

    #[tokio::test]
    async fn test_truncated_reply_end_to_end() {
        let (service, store, _) = service(
            MemoryTurnStore::new(),
            ScriptedProvider::reply("partial answer", StopReason::MaxTokens),
        );

        let reply = service.submit(&request("s1", "Explain")).await.unwrap();
        assert_eq!(
            reply.reply,
            "partial answer\n\n(Note: reply was cut short due to length limit.)"
        );
        assert!(store.all("s1")[0].text.ends_with(TRUNCATION_NOTICE));
    }

    #[tokio::test]
    async fn test_completion_failure_end_to_end() {
        let store = MemoryTurnStore::new();
        store.seed("s1", 2);
        let (service, store, _) = service(store, ScriptedProvider::new(Script::Fail));

        let err = service.submit(&request("s1", "Hello")).await.unwrap_err();
        assert!(matches!(err, ChatError::CompletionUnavailable(_)));
        assert_eq!(store.all("s1").len(), 2);
    }

    #[tokio::test]
    async fn test_store_read_failure_skips_provider() {
        let (service, store, provider) = service(
            MemoryTurnStore::new(),
            ScriptedProvider::reply("unused", StopReason::EndTurn),
        );
        store.fail_reads.store(true, Ordering::SeqCst);

        let err = service.submit(&request("s1", "Hello")).await.unwrap_err();
        assert!(matches!(err, ChatError::StoreUnavailable(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_validation_happens_before_io() {
        let (service, store, provider) = service(
            MemoryTurnStore::new(),
            ScriptedProvider::reply("unused", StopReason::EndTurn),
        );

        let mut bad = request("s1", "Hello");
        bad.user_id = String::new();
        assert!(matches!(
            service.submit(&bad).await,
            Err(ChatError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.submit(&request("", "Hello")).await,
            Err(ChatError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.submit(&request("s1", "")).await,
            Err(ChatError::InvalidRequest(_))
        ));
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_record_user_turn_and_history() {
        let (service, _, _) = service(
            MemoryTurnStore::new(),
            ScriptedProvider::reply("unused", StopReason::EndTurn),
        );

        service.record_user_turn("s1", "u-1", "first").await.unwrap();
        service.record_user_turn("s1", "u-1", "second").await.unwrap();
        assert!(matches!(
            service.record_user_turn("s1", "u-1", " ").await,
            Err(ChatError::InvalidRequest(_))
        ));

        let log = service.history("s1", None, None).await.unwrap();
        let texts: Vec<&str> = log.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);

        let page = service.history("s1", Some(1), Some(1)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].text, "second");
    }
}
