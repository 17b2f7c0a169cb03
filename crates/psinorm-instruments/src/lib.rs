//! psinorm-instruments
//!
//! Psychometric normalization engine. Takes an examinee's raw responses to
//! a standardized neuropsychological test, derives its composite scores,
//! maps them through age- (and sometimes schooling-) stratified normative
//! tables, and classifies the result into an ordinal band.
//!
//! Pure computation: no I/O beyond optionally reading a catalog file, and
//! no shared mutable state. A [`Registry`] is built once and scored against
//! from any number of threads.

pub mod catalog;
pub mod classify;
pub mod derive;
pub mod engine;
pub mod error;
pub mod instruments;
pub mod norms;
pub mod recompute;
pub mod registry;
pub mod scoring;

pub use catalog::Catalog;
pub use error::{CatalogError, ScoringError, TableIntegrityError};
pub use registry::Registry;
pub use scoring::InstrumentDefinition;

/// Return all built-in instruments.
pub fn all_instruments() -> Vec<InstrumentDefinition> {
    vec![
        instruments::bpa::definition(),
        instruments::tin::definition(),
        instruments::bnt::definition(),
        instruments::ravlt::definition(),
        instruments::corsi::definition(),
        instruments::fv::definition(),
        instruments::pcfo::definition(),
        instruments::d2::definition(),
    ]
}

/// Look up a built-in instrument by code.
pub fn get_instrument(code: &str) -> Option<InstrumentDefinition> {
    all_instruments().into_iter().find(|i| i.code == code)
}
