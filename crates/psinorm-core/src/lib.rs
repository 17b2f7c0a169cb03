//! psinorm-core
//!
//! Pure domain types shared by the scoring engine and its consumers.
//! No scoring logic lives here; this is the vocabulary of requests,
//! results, and classification labels.

pub mod error;
pub mod models;
