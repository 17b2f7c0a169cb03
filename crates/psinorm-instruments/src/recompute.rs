//! Last-sequence-wins bookkeeping for consumers that rescore on every edit.
//!
//! Each edit to a subject's raw responses triggers one full scoring call.
//! Calls may finish out of order; the controller keeps only the outcome of
//! the highest sequence number per (instrument, subject) and reports older
//! arrivals as stale so the caller can drop them. Scoring is cheap, so there
//! is no cancellation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use psinorm_core::models::request::ScoringRequest;
use psinorm_core::models::result::ScoringResult;
use uuid::Uuid;

use crate::error::ScoringError;
use crate::registry::Registry;

pub type Outcome = Result<ScoringResult, ScoringError>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecomputeKey {
    pub instrument_code: String,
    pub subject_id: Uuid,
}

impl RecomputeKey {
    pub fn new(instrument_code: impl Into<String>, subject_id: Uuid) -> Self {
        Self {
            instrument_code: instrument_code.into(),
            subject_id,
        }
    }
}

/// Handed out before a scoring call starts; presented when it finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub key: RecomputeKey,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome is now the current one for its key.
    Applied,
    /// A call with sequence `current` already landed; the outcome was dropped.
    Stale { current: u64 },
}

#[derive(Debug, Default)]
pub struct RecomputeController {
    next_seq: AtomicU64,
    latest: Mutex<HashMap<RecomputeKey, (u64, Outcome)>>,
}

impl RecomputeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next sequence number for `key`. Numbers are strictly
    /// increasing across all keys.
    pub fn issue(&self, key: RecomputeKey) -> Ticket {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        Ticket { key, seq }
    }

    pub fn complete(&self, ticket: Ticket, outcome: Outcome) -> Completion {
        self.submit(ticket.key, ticket.seq, outcome)
    }

    /// Record an outcome numbered by the caller's own sequence (for example
    /// an editor's revision counter). Ties go to the outcome already held.
    pub fn submit(&self, key: RecomputeKey, seq: u64, outcome: Outcome) -> Completion {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((current, _)) = latest.get(&key)
            && *current >= seq
        {
            let current = *current;
            tracing::debug!(seq, current, "discarding stale scoring outcome");
            return Completion::Stale { current };
        }
        latest.insert(key, (seq, outcome));
        Completion::Applied
    }

    /// The surviving outcome for `key` and the sequence that produced it.
    pub fn latest(&self, key: &RecomputeKey) -> Option<(u64, Outcome)> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Drop the outcome held for `key`, e.g. once its subject's session
    /// closes. Anything completed for the key afterwards applies as if the
    /// key were new, so only forget keys with no calls in flight.
    pub fn forget(&self, key: &RecomputeKey) -> Option<(u64, Outcome)> {
        let removed = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        if let Some((seq, _)) = &removed {
            tracing::debug!(seq, instrument = %key.instrument_code, "forgot scoring outcome");
        }
        removed
    }

    /// Every surviving outcome.
    pub fn snapshot(&self) -> Vec<(RecomputeKey, u64, Outcome)> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(key, (seq, outcome))| (key.clone(), *seq, outcome.clone()))
            .collect()
    }

    /// Issue a ticket, score `request`, and complete the ticket.
    pub fn run(
        &self,
        registry: &Registry,
        subject_id: Uuid,
        request: &ScoringRequest,
    ) -> (Ticket, Completion) {
        let ticket = self.issue(RecomputeKey::new(&request.instrument_code, subject_id));
        let outcome = registry.score_request(request);
        let completion = self.complete(ticket.clone(), outcome);
        (ticket, completion)
    }
}
