//! psinorm-cli
//!
//! Command-line consumer of the normalization engine. The binary lives in
//! `main.rs`; configuration, logging setup and edit replay are exposed here
//! so they can be tested without spawning a process.

pub mod config;
pub mod logging;
pub mod replay;
