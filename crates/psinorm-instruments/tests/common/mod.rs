#![allow(dead_code)]

use std::collections::BTreeMap;

use psinorm_core::models::classification::BandingScheme;
use psinorm_core::models::raw::RawResponseSet;
use psinorm_instruments::derive::net_score;
use psinorm_instruments::norms::{AgeBand, NormativeTable, ScoreRow};
use psinorm_instruments::scoring::{Inputs, InstrumentDefinition, RawField, ScoredVariable};
use psinorm_instruments::Registry;

pub const ATTENTION: &str = "atencao";

/// A two-subtask attention test normed by age only.
pub fn attention_definition() -> InstrumentDefinition {
    InstrumentDefinition {
        code: ATTENTION.to_string(),
        name: "Attention fixture".to_string(),
        min_age: 6,
        max_age: 99,
        raw_fields: vec![
            RawField::count("acertos", "Hits", 100.0),
            RawField::count("erros", "Errors", 100.0),
            RawField::count("omissoes", "Omissions", 100.0),
            RawField::count("ad_acertos", "Divided hits", 100.0),
        ],
        limits: Vec::new(),
        scored_variables: vec![free_variable("AC"), free_variable("AD")],
        banding_scheme: BandingScheme::Percentile5,
        stratifier: None,
        derive: attention_derive,
    }
}

fn attention_derive(inputs: &Inputs, _age: u32) -> BTreeMap<String, f64> {
    BTreeMap::from([
        (
            "AC".to_string(),
            net_score(
                inputs.get("acertos"),
                inputs.get("erros"),
                inputs.get("omissoes"),
            ),
        ),
        ("AD".to_string(), inputs.get("ad_acertos")),
    ])
}

/// A variable with no declared domain, so tables need not cover it fully.
pub fn free_variable(id: &str) -> ScoredVariable {
    ScoredVariable {
        id: id.to_string(),
        name: id.to_string(),
        domain: None,
        description: None,
    }
}

pub fn band(min_age: u32, max_age: u32, rows: &[(f64, f64, f64)]) -> AgeBand {
    AgeBand {
        min_age,
        max_age,
        stratifier: None,
        rows: rows
            .iter()
            .map(|&(min, max, value)| ScoreRow { min, max, value })
            .collect(),
    }
}

pub fn stratified_band(
    min_age: u32,
    max_age: u32,
    stratifier: &str,
    rows: &[(f64, f64, f64)],
) -> AgeBand {
    AgeBand {
        stratifier: Some(stratifier.to_string()),
        ..band(min_age, max_age, rows)
    }
}

pub fn table(instrument: &str, variable: &str, bands: Vec<AgeBand>) -> NormativeTable {
    NormativeTable {
        instrument: instrument.to_string(),
        variable: variable.to_string(),
        bands,
    }
}

/// AC is normed from age 6; AD only from age 10.
pub fn attention_tables() -> Vec<NormativeTable> {
    vec![
        table(
            ATTENTION,
            "AC",
            vec![
                band(6, 17, &[(-200.0, 4.0, 5.0), (5.0, 100.0, 50.0)]),
                band(
                    18,
                    29,
                    &[(-200.0, 9.0, 10.0), (10.0, 17.0, 50.0), (18.0, 100.0, 90.0)],
                ),
                band(30, 99, &[(-200.0, 100.0, 50.0)]),
            ],
        ),
        table(
            ATTENTION,
            "AD",
            vec![band(10, 99, &[(0.0, 49.0, 25.0), (50.0, 100.0, 75.0)])],
        ),
    ]
}

pub fn attention_registry() -> Registry {
    Registry::new(vec![attention_definition()], attention_tables()).expect("fixture registry")
}

pub fn attention_inputs(hits: f64, errors: f64, omissions: f64) -> RawResponseSet {
    RawResponseSet::new()
        .with("acertos", hits)
        .with("erros", errors)
        .with("omissoes", omissions)
        .with("ad_acertos", 60.0)
}
