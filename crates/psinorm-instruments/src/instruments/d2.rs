use std::collections::BTreeMap;

use psinorm_core::models::classification::BandingScheme;

use crate::derive::net_score;
use crate::scoring::{
    Inputs, InstrumentDefinition, RawField, ScoreRange, ScoredVariable, SumLimit,
};

pub const CODE: &str = "d2";

const SHEET_ITEMS: f64 = 658.0;
const SHEET_TARGETS: f64 = 299.0;

/// d2 Test of Attention.
///
/// - `TN`: total items processed
/// - `TN_E`: TN − (omissions E1 + commissions E2)
/// - `CP`: concentration performance, targets marked − E2
///
/// Targets marked, omissions and commissions are disjoint outcomes among the
/// items processed, so their sum cannot exceed TN.
pub fn definition() -> InstrumentDefinition {
    InstrumentDefinition {
        code: CODE.to_string(),
        name: "Teste d2 de Atenção Concentrada".to_string(),
        min_age: 9,
        max_age: 60,
        raw_fields: vec![
            RawField::count("tn", "Items processed", SHEET_ITEMS),
            RawField::count("acertos", "Targets marked", SHEET_TARGETS),
            RawField::count("e1", "Omissions", SHEET_ITEMS),
            RawField::count("e2", "Commissions", SHEET_ITEMS),
        ],
        limits: vec![SumLimit::within_field(&["acertos", "e1", "e2"], "tn")],
        scored_variables: vec![
            ScoredVariable::new("TN", "Total processed", ScoreRange::integers(0.0, SHEET_ITEMS)),
            ScoredVariable::new(
                "TN_E",
                "Total minus errors",
                ScoreRange::integers(0.0, SHEET_ITEMS),
            ),
            ScoredVariable::new(
                "CP",
                "Concentration performance",
                ScoreRange::integers(-SHEET_ITEMS, SHEET_TARGETS),
            ),
        ],
        banding_scheme: BandingScheme::Percentile5,
        stratifier: None,
        derive,
    }
}

fn derive(inputs: &Inputs, _age: u32) -> BTreeMap<String, f64> {
    let processed = inputs.get("tn");
    let commissions = inputs.get("e2");
    BTreeMap::from([
        ("TN".to_string(), processed),
        (
            "TN_E".to_string(),
            net_score(processed, inputs.get("e1"), commissions),
        ),
        ("CP".to_string(), inputs.get("acertos") - commissions),
    ])
}
