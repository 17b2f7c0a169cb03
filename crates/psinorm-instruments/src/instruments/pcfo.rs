use std::collections::BTreeMap;

use psinorm_core::models::classification::BandingScheme;

use super::school_type;
use crate::scoring::{Inputs, InstrumentDefinition, RawField, ScoreRange, ScoredVariable};

pub const CODE: &str = "pcfo";

const ITEMS_PER_SUBTEST: f64 = 4.0;

const SYLLABIC: [(&str, &str); 4] = [
    ("sintese_silabica", "Syllabic synthesis"),
    ("segmentacao_silabica", "Syllabic segmentation"),
    ("manipulacao_silabica", "Syllabic manipulation"),
    ("transposicao_silabica", "Syllabic transposition"),
];

const PHONEMIC: [(&str, &str); 4] = [
    ("sintese_fonemica", "Phonemic synthesis"),
    ("segmentacao_fonemica", "Phonemic segmentation"),
    ("manipulacao_fonemica", "Phonemic manipulation"),
    ("transposicao_fonemica", "Phonemic transposition"),
];

const JUDGEMENT: [(&str, &str); 2] = [
    ("julgamento_rima", "Rhyme judgement"),
    ("julgamento_aliteracao", "Alliteration judgement"),
];

/// PCFO: Prova de Consciência Fonológica por produção Oral.
/// Ten subtests of four items. Syllabic and phonemic composites plus the
/// total, as standard scores by age and school type.
pub fn definition() -> InstrumentDefinition {
    let raw_fields = SYLLABIC
        .iter()
        .chain(&PHONEMIC)
        .chain(&JUDGEMENT)
        .map(|(id, name)| RawField::count(id, name, ITEMS_PER_SUBTEST))
        .collect();

    let level = ScoreRange::integers(0.0, 4.0 * ITEMS_PER_SUBTEST);
    InstrumentDefinition {
        code: CODE.to_string(),
        name: "PCFO - Prova de Consciência Fonológica por produção Oral".to_string(),
        min_age: 5,
        max_age: 11,
        raw_fields,
        limits: Vec::new(),
        scored_variables: vec![
            ScoredVariable::new("SIL", "Syllabic level", level),
            ScoredVariable::new("FON", "Phonemic level", level),
            ScoredVariable::new(
                "TOTAL",
                "Phonological awareness",
                ScoreRange::integers(0.0, 10.0 * ITEMS_PER_SUBTEST),
            ),
        ],
        banding_scheme: BandingScheme::StandardScore5,
        stratifier: Some(school_type()),
        derive,
    }
}

fn derive(inputs: &Inputs, _age: u32) -> BTreeMap<String, f64> {
    let syllabic = subtotal(inputs, &SYLLABIC);
    let phonemic = subtotal(inputs, &PHONEMIC);
    BTreeMap::from([
        ("SIL".to_string(), syllabic),
        ("FON".to_string(), phonemic),
        (
            "TOTAL".to_string(),
            syllabic + phonemic + subtotal(inputs, &JUDGEMENT),
        ),
    ])
}

fn subtotal(inputs: &Inputs, subtests: &[(&str, &str)]) -> f64 {
    subtests.iter().map(|(id, _)| inputs.get(id)).sum()
}
