//! Conversation context management for Doula.
//!
//! - `TurnStore`: append-only session log port implemented by doula-infra
//! - `HistoryWindow`: loads the recent-history window and builds the prompt context
//! - `ChatTurnProcessor`: runs one completion and persists the reply
//! - `ChatService`: validates a submission and composes the two

pub mod processor;
pub mod repository;
pub mod service;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;
