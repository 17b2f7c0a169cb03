use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use psinorm_core::models::classification::BandingScheme;
use psinorm_core::models::raw::RawResponseSet;
use serde::Serialize;
use ts_rs::TS;

use crate::error::{InputProblem, ScoringError};

/// Defines the valid range for a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl ScoreRange {
    /// Whole numbers in `[min, max]`.
    pub const fn integers(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: Some(1.0),
        }
    }

    /// Values in `[min, max]` at two-decimal resolution (derived ratios).
    pub const fn hundredths(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: Some(0.01),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        if let Some(step) = self.step {
            let offset = value - self.min;
            let remainder = offset % step;
            // Allow floating point tolerance
            remainder < 1e-9 || (step - remainder) < 1e-9
        } else {
            true
        }
    }
}

/// One raw field an examiner records for an instrument.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct RawField {
    pub id: String,
    pub name: String,
    pub range: ScoreRange,
}

impl RawField {
    /// A non-negative whole-number count capped at `max`.
    pub fn count(id: &str, name: &str, max: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            range: ScoreRange::integers(0.0, max),
        }
    }
}

/// A score an instrument derives and looks up in its normative tables.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ScoredVariable {
    pub id: String,
    pub name: String,
    /// Every value the derivation can produce from in-range raw fields.
    /// When present, normative tables for this variable must cover it
    /// without gaps at `domain.step`.
    pub domain: Option<ScoreRange>,
    pub description: Option<String>,
}

impl ScoredVariable {
    pub fn new(id: &str, name: &str, domain: ScoreRange) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            domain: Some(domain),
            description: None,
        }
    }

    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Secondary norm key some instruments need alongside age.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct Stratifier {
    pub id: String,
    pub name: String,
    /// Codes that normative bands may be keyed by.
    pub values: Vec<String>,
}

impl Stratifier {
    pub fn accepts(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Ceiling on the sum of several raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SumBound {
    /// A fixed count, e.g. the items on a form.
    Constant(f64),
    /// The value recorded in another raw field.
    Field(String),
}

/// Raw fields that count disjoint parts of the same items, so together they
/// cannot exceed `bound`. A breach is reported against the last field.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SumLimit {
    pub fields: Vec<String>,
    pub bound: SumBound,
}

impl SumLimit {
    pub fn at_most(fields: &[&str], max: f64) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            bound: SumBound::Constant(max),
        }
    }

    pub fn within_field(fields: &[&str], bound: &str) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            bound: SumBound::Field(bound.to_string()),
        }
    }

    /// Every raw field id the limit mentions.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        let bound = match &self.bound {
            SumBound::Field(field) => Some(field.as_str()),
            SumBound::Constant(_) => None,
        };
        self.fields.iter().map(String::as_str).chain(bound)
    }
}

/// Computes every scored variable from validated raw fields and age.
pub type DeriveFn = fn(&Inputs, u32) -> BTreeMap<String, f64>;

/// Immutable description of one supported instrument.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct InstrumentDefinition {
    pub code: String,
    pub name: String,
    pub min_age: u32,
    pub max_age: u32,
    pub raw_fields: Vec<RawField>,
    /// Cross-field limits, checked after each field passes on its own.
    pub limits: Vec<SumLimit>,
    pub scored_variables: Vec<ScoredVariable>,
    pub banding_scheme: BandingScheme,
    pub stratifier: Option<Stratifier>,
    #[serde(skip)]
    #[ts(skip)]
    pub derive: DeriveFn,
}

impl InstrumentDefinition {
    pub fn requires_stratifier(&self) -> bool {
        self.stratifier.is_some()
    }

    pub fn applies_to_age(&self, age: u32) -> bool {
        (self.min_age..=self.max_age).contains(&age)
    }

    pub fn variable(&self, id: &str) -> Option<&ScoredVariable> {
        self.scored_variables.iter().find(|v| v.id == id)
    }

    /// Check every declared field is present, finite, non-negative and in
    /// range, that nothing undeclared was supplied, and that the fields
    /// respect the instrument's sum limits.
    pub fn validate_inputs(&self, raw: &RawResponseSet) -> Result<Inputs, ScoringError> {
        let invalid = |field: &str, value: Option<f64>, reason: InputProblem| {
            ScoringError::InvalidInput {
                code: self.code.clone(),
                field: field.to_string(),
                value,
                reason,
            }
        };

        let mut values = BTreeMap::new();
        for field in &self.raw_fields {
            let value = raw
                .get(&field.id)
                .ok_or_else(|| invalid(&field.id, None, InputProblem::Missing))?;
            if !value.is_finite() {
                return Err(invalid(&field.id, Some(value), InputProblem::NonFinite));
            }
            if value < 0.0 {
                return Err(invalid(&field.id, Some(value), InputProblem::Negative));
            }
            if !field.range.contains(value) {
                return Err(invalid(&field.id, Some(value), InputProblem::OutOfRange));
            }
            values.insert(field.id.clone(), value);
        }

        if let Some((name, value)) = raw
            .fields()
            .find(|(name, _)| !self.raw_fields.iter().any(|f| f.id == *name))
        {
            return Err(invalid(name, Some(value), InputProblem::Unrecognized));
        }

        for limit in &self.limits {
            let bound = match &limit.bound {
                SumBound::Constant(max) => *max,
                SumBound::Field(field) => values.get(field).copied().unwrap_or(0.0),
            };
            let total: f64 = limit
                .fields
                .iter()
                .map(|f| values.get(f).copied().unwrap_or(0.0))
                .sum();
            if total > bound
                && let Some(last) = limit.fields.last()
            {
                return Err(invalid(
                    last,
                    values.get(last).copied(),
                    InputProblem::OutOfRange,
                ));
            }
        }

        Ok(Inputs::new(values))
    }

    /// Run the derivation over validated inputs.
    pub fn derive_scores(&self, inputs: &Inputs, age: u32) -> BTreeMap<String, f64> {
        (self.derive)(inputs, age)
    }
}

/// Raw fields that passed validation. Derivations read from here and never
/// re-check their inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    values: BTreeMap<String, f64>,
    /// Ids read by a derivation that the instrument never declared.
    undeclared_reads: RefCell<BTreeSet<String>>,
}

impl Inputs {
    fn new(values: BTreeMap<String, f64>) -> Self {
        Self {
            values,
            undeclared_reads: RefCell::default(),
        }
    }

    /// Every declared field set to zero. Used to exercise a derivation
    /// before the instrument is admitted to a registry.
    pub(crate) fn zeroed(definition: &InstrumentDefinition) -> Self {
        Self::new(
            definition
                .raw_fields
                .iter()
                .map(|f| (f.id.clone(), 0.0))
                .collect(),
        )
    }

    /// The validated value of `field`. An id the instrument does not declare
    /// reads as 0 and is remembered, so registry construction can reject the
    /// derivation that asked for it.
    pub fn get(&self, field: &str) -> f64 {
        match self.values.get(field) {
            Some(&value) => value,
            None => {
                self.undeclared_reads.borrow_mut().insert(field.to_string());
                0.0
            }
        }
    }

    pub(crate) fn undeclared_reads(&self) -> BTreeSet<String> {
        self.undeclared_reads.borrow().clone()
    }

    pub fn sum(&self, fields: &[&str]) -> f64 {
        fields.iter().map(|f| self.get(f)).sum()
    }
}
