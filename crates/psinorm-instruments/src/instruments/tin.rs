use std::collections::BTreeMap;

use psinorm_core::models::classification::BandingScheme;

use crate::scoring::{Inputs, InstrumentDefinition, RawField, ScoreRange, ScoredVariable};

pub const CODE: &str = "tin";

/// TIN: Teste Infantil de Nomeação.
/// 60 line drawings named aloud; standard scores (mean 100, SD 15) by age.
pub fn definition() -> InstrumentDefinition {
    InstrumentDefinition {
        code: CODE.to_string(),
        name: "TIN - Teste Infantil de Nomeação".to_string(),
        min_age: 3,
        max_age: 14,
        raw_fields: vec![RawField::count("acertos", "Pictures named correctly", 60.0)],
        limits: Vec::new(),
        scored_variables: vec![ScoredVariable::new(
            "NOM",
            "Naming",
            ScoreRange::integers(0.0, 60.0),
        )],
        banding_scheme: BandingScheme::StandardScore5,
        stratifier: None,
        derive,
    }
}

fn derive(inputs: &Inputs, _age: u32) -> BTreeMap<String, f64> {
    BTreeMap::from([("NOM".to_string(), inputs.get("acertos"))])
}
