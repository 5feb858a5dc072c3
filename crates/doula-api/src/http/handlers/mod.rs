//! HTTP request handlers, one module per resource.

pub mod chat;
pub mod record;
pub mod session;
