//! Patient record abstractions for Doula.
//!
//! This module defines the `PatientRecordRepository` trait that the
//! infrastructure layer implements, and the `RecordService` that validates
//! submissions before they reach storage.

pub mod repository;
pub mod service;
