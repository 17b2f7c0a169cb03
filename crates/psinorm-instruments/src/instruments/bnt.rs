use std::collections::BTreeMap;

use psinorm_core::models::classification::BandingScheme;

use super::schooling;
use crate::scoring::{
    Inputs, InstrumentDefinition, RawField, ScoreRange, ScoredVariable, SumLimit,
};

pub const CODE: &str = "bnt";

const FORM_ITEMS: f64 = 60.0;

/// BNT: Boston Naming Test, adult form.
/// 60 items. Spontaneous namings, plus namings after a semantic cue for the
/// total; an item named spontaneously is never cued, so the two together
/// stay within the form. Percentile norms by age and schooling.
pub fn definition() -> InstrumentDefinition {
    InstrumentDefinition {
        code: CODE.to_string(),
        name: "Boston Naming Test".to_string(),
        min_age: 18,
        max_age: 90,
        raw_fields: vec![
            RawField::count("espontaneas", "Correct without cue", FORM_ITEMS),
            RawField::count("pista_semantica", "Correct after semantic cue", FORM_ITEMS),
        ],
        limits: vec![SumLimit::at_most(&["espontaneas", "pista_semantica"], FORM_ITEMS)],
        scored_variables: vec![
            ScoredVariable::new("ESP", "Spontaneous naming", ScoreRange::integers(0.0, FORM_ITEMS)),
            ScoredVariable::new("TOTAL", "Total naming", ScoreRange::integers(0.0, FORM_ITEMS))
                .described("Spontaneous + semantic cue"),
        ],
        banding_scheme: BandingScheme::Percentile5,
        stratifier: Some(schooling()),
        derive,
    }
}

fn derive(inputs: &Inputs, _age: u32) -> BTreeMap<String, f64> {
    let spontaneous = inputs.get("espontaneas");
    BTreeMap::from([
        ("ESP".to_string(), spontaneous),
        (
            "TOTAL".to_string(),
            spontaneous + inputs.get("pista_semantica"),
        ),
    ])
}
