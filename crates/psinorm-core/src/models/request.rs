use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::raw::RawResponseSet;
use crate::error::CoreError;

/// Body of a single scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringRequest {
    pub instrument_code: String,
    /// Completed years at the date of administration.
    pub age: u32,
    /// Secondary norm key (schooling level, school type) for instruments that need one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stratifier: Option<String>,
    pub raw: RawResponseSet,
    /// Free text carried through to the result untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ScoringRequest {
    pub fn new(instrument_code: impl Into<String>, age: u32, raw: RawResponseSet) -> Self {
        Self {
            instrument_code: instrument_code.into(),
            age,
            stratifier: None,
            raw,
            notes: None,
        }
    }

    pub fn with_stratifier(mut self, stratifier: impl Into<String>) -> Self {
        self.stratifier = Some(stratifier.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One edit of a subject's raw responses, numbered by the editor that
/// produced it. Higher `seq` supersedes lower for the same
/// (instrument, subject), regardless of arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringEdit {
    pub seq: u64,
    pub subject_id: Uuid,
    pub request: ScoringRequest,
}

impl ScoringEdit {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}
