//! Shared domain types for Doula.
//!
//! This crate contains the types used across the assistant backend:
//! conversation turns, LLM request/response shapes, patient records,
//! global configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod record;
pub mod turn;
