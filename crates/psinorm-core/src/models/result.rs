use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::classification::ClassificationLabel;
use super::lookup::Lookup;
use crate::error::CoreError;

/// The full outcome of scoring one instrument for one subject.
///
/// Produced whole by a single scoring call. A changed input produces a new
/// result; results are never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringResult {
    pub instrument_code: String,
    pub subject_age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stratifier: Option<String>,
    pub derived_scores: BTreeMap<String, f64>,
    pub normative_scores: BTreeMap<String, Lookup<f64>>,
    pub classifications: BTreeMap<String, Lookup<ClassificationLabel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ScoringResult {
    pub fn derived(&self, variable: &str) -> Option<f64> {
        self.derived_scores.get(variable).copied()
    }

    pub fn normative(&self, variable: &str) -> Option<Lookup<f64>> {
        self.normative_scores.get(variable).copied()
    }

    pub fn classification(&self, variable: &str) -> Option<Lookup<ClassificationLabel>> {
        self.classifications.get(variable).copied()
    }

    /// Variables for which no published norm applied.
    pub fn unavailable_variables(&self) -> Vec<&str> {
        self.normative_scores
            .iter()
            .filter(|(_, lookup)| !lookup.is_available())
            .map(|(variable, _)| variable.as_str())
            .collect()
    }

    pub fn is_fully_normed(&self) -> bool {
        self.normative_scores.values().all(Lookup::is_available)
    }

    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
