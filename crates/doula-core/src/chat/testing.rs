//! In-memory test doubles shared by the chat module tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use doula_types::error::RepositoryError;
use doula_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, Usage,
};
use doula_types::turn::{NewTurn, Turn};

use crate::chat::repository::TurnStore;
use crate::llm::provider::LlmProvider;

/// Append-only in-memory session log.
#[derive(Default)]
pub struct MemoryTurnStore {
    turns: Mutex<Vec<Turn>>,
    /// When set, every write is stamped with this instant (forces ties).
    pub fixed_clock: Option<DateTime<Utc>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub hang_writes: AtomicBool,
    pub reads: AtomicUsize,
}

impl MemoryTurnStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed_clock(at: DateTime<Utc>) -> Self {
        Self {
            fixed_clock: Some(at),
            ..Self::default()
        }
    }

    /// Synchronously seed `count` alternating user/assistant turns.
    pub fn seed(&self, session_id: &str, count: usize) {
        let mut turns = self.turns.lock().unwrap();
        for i in 0..count {
            let new = if i % 2 == 0 {
                NewTurn::user("u-1", format!("message {i}"))
            } else {
                NewTurn::assistant("assistant", format!("message {i}"))
            };
            let turn = Self::stamp(&turns, session_id, &new, self.fixed_clock);
            turns.push(turn);
        }
    }

    pub fn all(&self, session_id: &str) -> Vec<Turn> {
        self.turns
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.session_id == session_id)
            .cloned()
            .collect()
    }

    fn stamp(
        existing: &[Turn],
        session_id: &str,
        new: &NewTurn,
        fixed_clock: Option<DateTime<Utc>>,
    ) -> Turn {
        let seq = existing.len() as i64 + 1;
        let created_at = fixed_clock
            .unwrap_or_else(|| Utc::now() + chrono::Duration::milliseconds(seq));
        Turn {
            seq,
            session_id: session_id.to_string(),
            role: new.role,
            text: new.text.clone(),
            author_id: new.author_id.clone(),
            created_at,
            model: new.model.clone(),
            stop_reason: new.stop_reason.clone(),
            response_ms: new.response_ms,
        }
    }

    fn sorted(&self, session_id: &str) -> Vec<Turn> {
        let mut turns = self.all(session_id);
        turns.sort_by(|a, b| (a.created_at, a.seq).cmp(&(b.created_at, b.seq)));
        turns
    }
}

impl TurnStore for MemoryTurnStore {
    async fn append_turn(&self, session_id: &str, turn: &NewTurn) -> Result<Turn, RepositoryError> {
        if self.hang_writes.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let mut turns = self.turns.lock().unwrap();
        let stored = Self::stamp(&turns, session_id, turn, self.fixed_clock);
        turns.push(stored.clone());
        Ok(stored)
    }

    async fn query_recent_turns(
        &self,
        session_id: &str,
        limit: u32,
    ) -> Result<Vec<Turn>, RepositoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let mut turns = self.sorted(session_id);
        turns.reverse();
        turns.truncate(limit as usize);
        Ok(turns)
    }

    async fn list_turns(
        &self,
        session_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Turn>, RepositoryError> {
        let turns = self.sorted(session_id);
        let offset = offset.unwrap_or(0).max(0) as usize;
        let limit = limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(turns.into_iter().skip(offset).take(limit).collect())
    }
}

/// What a [`ScriptedProvider`] answers with.
#[derive(Clone)]
pub enum Script {
    Reply { text: String, stop_reason: StopReason },
    Fail,
    RateLimited,
}

/// Provider that returns a fixed answer and records every request it sees.
pub struct ScriptedProvider {
    script: Script,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn reply(text: &str, stop_reason: StopReason) -> Self {
        Self::new(Script::Reply {
            text: text.to_string(),
            stop_reason,
        })
    }

    pub fn new(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.script.clone() {
            Script::Reply { text, stop_reason } => Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: text,
                model: request.model.clone(),
                stop_reason,
                usage: Usage {
                    input_tokens: 42,
                    output_tokens: 7,
                },
            }),
            Script::Fail => Err(LlmError::Provider {
                message: "connection reset by peer".to_string(),
            }),
            Script::RateLimited => Err(LlmError::RateLimited {
                retry_after_ms: None,
            }),
        }
    }
}

/// Lets tests keep an `Arc` to a scripted provider while the processor owns a box.
impl LlmProvider for std::sync::Arc<ScriptedProvider> {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        LlmProvider::complete(&**self, request).await
    }
}
