//! Batch replay of scoring edits.
//!
//! Reads newline-delimited [`ScoringEdit`]s in arrival order and pushes
//! each through a [`RecomputeController`], so a late line carrying an older
//! `seq` never overwrites a newer result for the same subject and
//! instrument.

use std::io::BufRead;

use eyre::WrapErr;
use psinorm_core::models::request::ScoringEdit;
use psinorm_core::models::result::ScoringResult;
use psinorm_instruments::Registry;
use psinorm_instruments::error::ScoringError;
use psinorm_instruments::recompute::{Completion, Outcome, RecomputeController, RecomputeKey};
use serde::Serialize;
use uuid::Uuid;

/// Parse one edit per non-blank line.
pub fn parse_edits(reader: impl BufRead) -> eyre::Result<Vec<ScoringEdit>> {
    let mut edits = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.wrap_err_with(|| format!("failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let edit = ScoringEdit::from_json(&line)
            .wrap_err_with(|| format!("line {} is not a scoring edit", index + 1))?;
        edits.push(edit);
    }
    Ok(edits)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub applied: usize,
    pub stale: usize,
    /// The surviving outcome per (subject, instrument), ordered by subject
    /// then instrument.
    pub survivors: Vec<Survivor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Survivor {
    pub subject_id: Uuid,
    pub instrument_code: String,
    pub seq: u64,
    #[serde(flatten)]
    pub outcome: SurvivorOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SurvivorOutcome {
    Scored { result: ScoringResult },
    Refused { error: ScoringError },
}

impl From<Outcome> for SurvivorOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Ok(result) => SurvivorOutcome::Scored { result },
            Err(error) => SurvivorOutcome::Refused { error },
        }
    }
}

/// Score every edit and keep the highest-`seq` outcome per key.
pub fn replay(registry: &Registry, edits: &[ScoringEdit]) -> ReplayReport {
    let controller = RecomputeController::new();
    let (mut applied, mut stale) = (0, 0);

    for edit in edits {
        let key = RecomputeKey::new(&edit.request.instrument_code, edit.subject_id);
        let outcome = registry.score_request(&edit.request);
        match controller.submit(key, edit.seq, outcome) {
            Completion::Applied => applied += 1,
            Completion::Stale { .. } => stale += 1,
        }
    }

    let mut survivors: Vec<Survivor> = controller
        .snapshot()
        .into_iter()
        .map(|(key, seq, outcome)| Survivor {
            subject_id: key.subject_id,
            instrument_code: key.instrument_code,
            seq,
            outcome: outcome.into(),
        })
        .collect();
    survivors.sort_by(|a, b| {
        a.subject_id
            .cmp(&b.subject_id)
            .then_with(|| a.instrument_code.cmp(&b.instrument_code))
    });

    tracing::info!(
        edits = edits.len(),
        applied,
        stale,
        survivors = survivors.len(),
        "replay finished"
    );
    ReplayReport {
        applied,
        stale,
        survivors,
    }
}
