use std::collections::BTreeMap;

use psinorm_core::models::classification::BandingScheme;

use crate::derive::net_score;
use crate::scoring::{
    Inputs, InstrumentDefinition, RawField, ScoreRange, ScoredVariable, SumLimit,
};

pub const CODE: &str = "bpa";

/// Targets per subtask sheet; also caps errors and omissions. A target is
/// either hit or omitted, so hits plus omissions stay within the sheet.
const SHEET_ITEMS: f64 = 120.0;

const SUBTASKS: [(&str, &str, &str); 3] = [
    ("ac", "AC", "Concentrated attention"),
    ("ad", "AD", "Divided attention"),
    ("aa", "AA", "Alternating attention"),
];

/// BPA: Bateria Psicológica para Avaliação da Atenção.
/// Concentrated, divided and alternating attention subtasks, each scored as
/// hits minus (errors + omissions). General attention (AG) is their sum.
/// Percentile norms by age.
pub fn definition() -> InstrumentDefinition {
    let subtask_domain = ScoreRange::integers(-2.0 * SHEET_ITEMS, SHEET_ITEMS);

    let mut raw_fields = Vec::new();
    let mut limits = Vec::new();
    let mut scored_variables = Vec::new();
    for (prefix, variable, name) in SUBTASKS {
        raw_fields.push(RawField::count(
            &format!("{prefix}_acertos"),
            &format!("{name}: hits"),
            SHEET_ITEMS,
        ));
        raw_fields.push(RawField::count(
            &format!("{prefix}_erros"),
            &format!("{name}: errors"),
            SHEET_ITEMS,
        ));
        raw_fields.push(RawField::count(
            &format!("{prefix}_omissoes"),
            &format!("{name}: omissions"),
            SHEET_ITEMS,
        ));
        limits.push(SumLimit::at_most(
            &[&format!("{prefix}_acertos"), &format!("{prefix}_omissoes")],
            SHEET_ITEMS,
        ));
        scored_variables.push(ScoredVariable::new(variable, name, subtask_domain));
    }
    scored_variables.push(
        ScoredVariable::new(
            "AG",
            "General attention",
            ScoreRange::integers(-6.0 * SHEET_ITEMS, 3.0 * SHEET_ITEMS),
        )
        .described("AC + AD + AA"),
    );

    InstrumentDefinition {
        code: CODE.to_string(),
        name: "BPA - Bateria Psicológica para Avaliação da Atenção".to_string(),
        min_age: 6,
        max_age: 82,
        raw_fields,
        limits,
        scored_variables,
        banding_scheme: BandingScheme::Percentile5,
        stratifier: None,
        derive,
    }
}

fn derive(inputs: &Inputs, _age: u32) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();
    let mut general = 0.0;
    for (prefix, variable, _) in SUBTASKS {
        let score = net_score(
            inputs.get(&format!("{prefix}_acertos")),
            inputs.get(&format!("{prefix}_erros")),
            inputs.get(&format!("{prefix}_omissoes")),
        );
        general += score;
        scores.insert(variable.to_string(), score);
    }
    scores.insert("AG".to_string(), general);
    scores
}
