use std::collections::BTreeMap;

use psinorm_core::models::classification::BandingScheme;

use crate::derive::ratio;
use crate::scoring::{Inputs, InstrumentDefinition, RawField, ScoreRange, ScoredVariable};

pub const CODE: &str = "ravlt";

const LIST_WORDS: f64 = 15.0;
const RECOGNITION_DISTRACTORS: f64 = 35.0;
const LEARNING_TRIALS: [&str; 5] = ["a1", "a2", "a3", "a4", "a5"];

/// RAVLT: Rey Auditory Verbal Learning Test.
///
/// Five learning trials of list A, an immediate recall after the
/// interference list (A6), a delayed recall (A7), and a recognition list of
/// the 15 targets among 35 distractors.
///
/// - `TOTAL`: A1 + A2 + A3 + A4 + A5
/// - `ALT`: learning over trials, TOTAL − 5 × A1
/// - `RI`: retroactive interference, A6 ÷ A5
/// - `VE`: forgetting speed, A7 ÷ A6
/// - `REC`: recognition hits − false positives
///
/// Ratios are 0 when the denominator is 0. Recognition is normed for adults
/// only.
pub fn definition() -> InstrumentDefinition {
    let recall = ScoreRange::integers(0.0, LIST_WORDS);
    let ratio_domain = ScoreRange::hundredths(0.0, LIST_WORDS);

    let mut raw_fields: Vec<RawField> = LEARNING_TRIALS
        .iter()
        .enumerate()
        .map(|(i, id)| RawField::count(id, &format!("Trial A{}", i + 1), LIST_WORDS))
        .collect();
    raw_fields.extend([
        RawField::count("a6", "Recall after interference (A6)", LIST_WORDS),
        RawField::count("a7", "Delayed recall (A7)", LIST_WORDS),
        RawField::count("rec_acertos", "Recognition hits", LIST_WORDS),
        RawField::count(
            "rec_falsos",
            "Recognition false positives",
            RECOGNITION_DISTRACTORS,
        ),
    ]);

    InstrumentDefinition {
        code: CODE.to_string(),
        name: "RAVLT - Rey Auditory Verbal Learning Test".to_string(),
        min_age: 6,
        max_age: 90,
        raw_fields,
        limits: Vec::new(),
        scored_variables: vec![
            ScoredVariable::new(
                "TOTAL",
                "Total learning",
                ScoreRange::integers(0.0, 5.0 * LIST_WORDS),
            ),
            ScoredVariable::new(
                "ALT",
                "Learning over trials",
                ScoreRange::integers(-4.0 * LIST_WORDS, 4.0 * LIST_WORDS),
            ),
            ScoredVariable::new("A6", "Recall after interference", recall),
            ScoredVariable::new("A7", "Delayed recall", recall),
            ScoredVariable::new("RI", "Retroactive interference", ratio_domain),
            ScoredVariable::new("VE", "Forgetting speed", ratio_domain),
            ScoredVariable::new(
                "REC",
                "Recognition",
                ScoreRange::integers(-RECOGNITION_DISTRACTORS, LIST_WORDS),
            ),
        ],
        banding_scheme: BandingScheme::Percentile5,
        stratifier: None,
        derive,
    }
}

fn derive(inputs: &Inputs, _age: u32) -> BTreeMap<String, f64> {
    let total = inputs.sum(&LEARNING_TRIALS);
    let a1 = inputs.get("a1");
    let a5 = inputs.get("a5");
    let a6 = inputs.get("a6");
    let a7 = inputs.get("a7");

    BTreeMap::from([
        ("TOTAL".to_string(), total),
        ("ALT".to_string(), total - 5.0 * a1),
        ("A6".to_string(), a6),
        ("A7".to_string(), a7),
        ("RI".to_string(), ratio(a6, a5)),
        ("VE".to_string(), ratio(a7, a6)),
        (
            "REC".to_string(),
            inputs.get("rec_acertos") - inputs.get("rec_falsos"),
        ),
    ])
}
