use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Why a scoring call was refused. Every variant is a hard stop: no partial
/// result accompanies it.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringError {
    #[error("unknown instrument: {code}")]
    UnknownInstrument { code: String },

    #[error("{code} is not applicable at age {age} (normed for ages {min_age}-{max_age})")]
    AgeOutOfRange {
        code: String,
        age: u32,
        min_age: u32,
        max_age: u32,
    },

    #[error("{code} requires a {stratifier} value")]
    MissingStratifier { code: String, stratifier: String },

    #[error("{code}: field '{field}' is {reason}")]
    InvalidInput {
        code: String,
        field: String,
        value: Option<f64>,
        reason: InputProblem,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputProblem {
    Missing,
    NonFinite,
    Negative,
    OutOfRange,
    Unrecognized,
}

impl fmt::Display for InputProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputProblem::Missing => "missing",
            InputProblem::NonFinite => "not a finite number",
            InputProblem::Negative => "negative",
            InputProblem::OutOfRange => "outside its valid range",
            InputProblem::Unrecognized => "not a field of this instrument",
        })
    }
}

/// Locates one age band inside the normative data, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandRef {
    pub instrument: String,
    pub variable: String,
    pub stratifier: Option<String>,
    pub min_age: u32,
    pub max_age: u32,
}

impl fmt::Display for BandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ages {}-{}",
            self.instrument, self.variable, self.min_age, self.max_age
        )?;
        if let Some(stratifier) = &self.stratifier {
            write!(f, " ({stratifier})")?;
        }
        Ok(())
    }
}

/// Reference data that would make scoring unsound. Raised only while a
/// registry is being built, never from a scoring call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableIntegrityError {
    #[error("instrument {code} is registered twice")]
    DuplicateInstrument { code: String },

    #[error("normative table references unknown instrument {instrument}")]
    UnknownInstrument { instrument: String },

    #[error("instrument {instrument} has no scored variable {variable}")]
    UnknownVariable { instrument: String, variable: String },

    #[error("{instrument}/{variable} has more than one normative table")]
    DuplicateTable { instrument: String, variable: String },

    #[error("{band}: minimum age is above maximum age")]
    InvertedAgeBand { band: BandRef },

    #[error("{band}: band has no score rows")]
    EmptyBand { band: BandRef },

    #[error("{band}: {detail}")]
    StratifierMismatch { band: BandRef, detail: String },

    #[error("{band} overlaps ages {other_min_age}-{other_max_age}")]
    OverlappingAgeBands {
        band: BandRef,
        other_min_age: u32,
        other_max_age: u32,
    },

    #[error("{band}: row [{min}, {max}] is inverted or not finite")]
    InvertedRow { band: BandRef, min: f64, max: f64 },

    #[error("{band}: rows overlap at raw score {at}")]
    OverlappingRows { band: BandRef, at: f64 },

    #[error("{band}: no row covers raw scores {from} to {to}")]
    CoverageGap { band: BandRef, from: f64, to: f64 },

    #[error("{band}: value {value} is outside the {scheme} scale")]
    ValueOutOfScale {
        band: BandRef,
        value: f64,
        scheme: &'static str,
    },

    #[error("{band}: value drops from {previous} to {value} at raw score {at}")]
    NonMonotonic {
        band: BandRef,
        at: f64,
        previous: f64,
        value: f64,
    },

    #[error("{instrument}: {field} is not a declared raw field")]
    UndeclaredField { instrument: String, field: String },

    #[error("{instrument}: derivation {detail}")]
    DerivationMismatch { instrument: String, detail: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog_version {found} is newer than this build supports ({supported})")]
    UnsupportedVersion { found: u64, supported: u32 },

    #[error("catalog is malformed: {0}")]
    Malformed(String),

    #[error(transparent)]
    Integrity(#[from] TableIntegrityError),
}
