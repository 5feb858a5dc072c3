//! Business logic and repository trait definitions for Doula.
//!
//! This crate defines the "ports" (store and provider traits) that the
//! infrastructure layer implements, plus the conversation context manager
//! built on top of them. It depends only on `doula-types` -- never on
//! `doula-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod record;
