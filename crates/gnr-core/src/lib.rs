//! gnr-core
//!
//! Pure domain types and artifact key conventions. No model or HTTP
//! dependency; this is the shared vocabulary of the prediction service.

pub mod artifact_keys;
pub mod error;
pub mod models;
