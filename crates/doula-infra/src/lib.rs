//! Infrastructure layer for Doula.
//!
//! Contains implementations of the ports defined in `doula-core`: SQLite
//! storage for turns and patient records, the OpenAI-compatible completion
//! provider, and configuration/credential loading.

pub mod config;
pub mod llm;
pub mod secret;
pub mod sqlite;
