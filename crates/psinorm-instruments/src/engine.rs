//! The scoring entry point.

use std::collections::BTreeMap;

use psinorm_core::models::raw::RawResponseSet;
use psinorm_core::models::request::ScoringRequest;
use psinorm_core::models::result::ScoringResult;

use crate::classify::classify_lookup;
use crate::error::ScoringError;
use crate::registry::Registry;

impl Registry {
    /// Score one instrument for one subject.
    ///
    /// Pure and deterministic: no I/O, no shared mutable state, and the same
    /// arguments always yield the same result. Refusals (unknown
    /// instrument, age outside the instrument's range, missing stratifier,
    /// bad raw input) are errors; a score that no norm covers is not, and
    /// shows up as `NotAvailable` for that variable only.
    ///
    /// A stratifier passed to an instrument that takes none is ignored and
    /// not echoed in the result.
    pub fn score(
        &self,
        instrument_code: &str,
        age: u32,
        raw: &RawResponseSet,
        stratifier: Option<&str>,
    ) -> Result<ScoringResult, ScoringError> {
        let definition =
            self.instrument(instrument_code)
                .ok_or_else(|| ScoringError::UnknownInstrument {
                    code: instrument_code.to_string(),
                })?;

        if !definition.applies_to_age(age) {
            return Err(ScoringError::AgeOutOfRange {
                code: definition.code.clone(),
                age,
                min_age: definition.min_age,
                max_age: definition.max_age,
            });
        }

        let stratifier = match &definition.stratifier {
            Some(required) => Some(
                stratifier
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| ScoringError::MissingStratifier {
                        code: definition.code.clone(),
                        stratifier: required.id.clone(),
                    })?,
            ),
            None => None,
        };

        let inputs = definition.validate_inputs(raw)?;
        let derived = definition.derive_scores(&inputs, age);

        let mut derived_scores = BTreeMap::new();
        let mut normative_scores = BTreeMap::new();
        let mut classifications = BTreeMap::new();
        for variable in &definition.scored_variables {
            let Some(&score) = derived.get(&variable.id) else {
                continue;
            };
            let normative =
                self.norms()
                    .lookup(&definition.code, &variable.id, age, score, stratifier);
            derived_scores.insert(variable.id.clone(), score);
            normative_scores.insert(variable.id.clone(), normative);
            classifications.insert(
                variable.id.clone(),
                classify_lookup(definition.banding_scheme, normative),
            );
        }

        let result = ScoringResult {
            instrument_code: definition.code.clone(),
            subject_age: age,
            stratifier: stratifier.map(str::to_string),
            derived_scores,
            normative_scores,
            classifications,
            notes: None,
        };

        tracing::debug!(
            instrument = %result.instrument_code,
            age,
            unavailable = ?result.unavailable_variables(),
            "scored"
        );
        Ok(result)
    }

    /// [`Registry::score`] over a request body, carrying its notes through.
    pub fn score_request(&self, request: &ScoringRequest) -> Result<ScoringResult, ScoringError> {
        let mut result = self.score(
            &request.instrument_code,
            request.age,
            &request.raw,
            request.stratifier.as_deref(),
        )?;
        result.notes = request.notes.clone();
        Ok(result)
    }
}
