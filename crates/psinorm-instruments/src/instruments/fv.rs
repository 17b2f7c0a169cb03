use std::collections::BTreeMap;

use psinorm_core::models::classification::BandingScheme;

use super::schooling;
use crate::scoring::{Inputs, InstrumentDefinition, RawField, ScoreRange, ScoredVariable};

pub const CODE: &str = "fv";

const MAX_WORDS: f64 = 60.0;
const PHONEMIC_LETTERS: [&str; 3] = ["f", "a", "s"];

/// Verbal fluency: one minute per letter F, A, S (phonemic) and one minute
/// of animals (semantic). Percentile norms by age and schooling.
pub fn definition() -> InstrumentDefinition {
    let mut raw_fields: Vec<RawField> = PHONEMIC_LETTERS
        .iter()
        .map(|letter| {
            RawField::count(
                letter,
                &format!("Words starting with {}", letter.to_uppercase()),
                MAX_WORDS,
            )
        })
        .collect();
    raw_fields.push(RawField::count("animais", "Animals named", MAX_WORDS));

    InstrumentDefinition {
        code: CODE.to_string(),
        name: "Fluência Verbal (FAS / animais)".to_string(),
        min_age: 18,
        max_age: 90,
        raw_fields,
        limits: Vec::new(),
        scored_variables: vec![
            ScoredVariable::new(
                "FAS",
                "Phonemic fluency",
                ScoreRange::integers(0.0, 3.0 * MAX_WORDS),
            ),
            ScoredVariable::new(
                "SEM",
                "Semantic fluency",
                ScoreRange::integers(0.0, MAX_WORDS),
            ),
        ],
        banding_scheme: BandingScheme::Percentile5,
        stratifier: Some(schooling()),
        derive,
    }
}

fn derive(inputs: &Inputs, _age: u32) -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("FAS".to_string(), inputs.sum(&PHONEMIC_LETTERS)),
        ("SEM".to_string(), inputs.get("animais")),
    ])
}
