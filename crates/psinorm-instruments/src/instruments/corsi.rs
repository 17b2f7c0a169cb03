use std::collections::BTreeMap;

use psinorm_core::models::classification::BandingScheme;

use crate::scoring::{Inputs, InstrumentDefinition, RawField, ScoreRange, ScoredVariable};

pub const CODE: &str = "corsi";

const MAX_SPAN: f64 = 9.0;
const MAX_SEQUENCES: f64 = 16.0;

/// Corsi block-tapping test, forward (ordem direta) and backward (ordem
/// inversa). Span is the longest sequence reproduced; total score is span ×
/// correctly reproduced sequences. Percentile norms by age.
pub fn definition() -> InstrumentDefinition {
    let span = ScoreRange::integers(0.0, MAX_SPAN);
    let total = ScoreRange::integers(0.0, MAX_SPAN * MAX_SEQUENCES);

    InstrumentDefinition {
        code: CODE.to_string(),
        name: "Corsi Block-Tapping Test".to_string(),
        min_age: 5,
        max_age: 90,
        raw_fields: vec![
            RawField::count("direta_span", "Forward span", MAX_SPAN),
            RawField::count("direta_acertos", "Forward sequences correct", MAX_SEQUENCES),
            RawField::count("inversa_span", "Backward span", MAX_SPAN),
            RawField::count("inversa_acertos", "Backward sequences correct", MAX_SEQUENCES),
        ],
        limits: Vec::new(),
        scored_variables: vec![
            ScoredVariable::new("OD_SPAN", "Forward span", span),
            ScoredVariable::new("OD_TOTAL", "Forward total score", total)
                .described("Forward span x sequences correct"),
            ScoredVariable::new("OI_SPAN", "Backward span", span),
            ScoredVariable::new("OI_TOTAL", "Backward total score", total)
                .described("Backward span x sequences correct"),
        ],
        banding_scheme: BandingScheme::Percentile5,
        stratifier: None,
        derive,
    }
}

fn derive(inputs: &Inputs, _age: u32) -> BTreeMap<String, f64> {
    let forward = inputs.get("direta_span");
    let backward = inputs.get("inversa_span");
    BTreeMap::from([
        ("OD_SPAN".to_string(), forward),
        (
            "OD_TOTAL".to_string(),
            forward * inputs.get("direta_acertos"),
        ),
        ("OI_SPAN".to_string(), backward),
        (
            "OI_TOTAL".to_string(),
            backward * inputs.get("inversa_acertos"),
        ),
    ])
}
