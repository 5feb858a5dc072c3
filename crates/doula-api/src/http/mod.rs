//! HTTP/REST API layer for Doula.
//!
//! Axum-based API: chat at `/api/chat`, session logs under `/api/sessions`,
//! patient records at `/patient/record` and `/doctor/patient/{id}/bp`.

pub mod error;
pub mod handlers;
pub mod router;
