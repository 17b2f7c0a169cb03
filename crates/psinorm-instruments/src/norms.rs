//! Normative table store.
//!
//! Tables are age-stratified (and for some instruments also keyed by a
//! secondary stratifier). Each age band maps contiguous raw-score ranges to
//! an authored percentile or standard score. There is no interpolation: a
//! score either lands in an authored row or is unavailable.

use std::collections::BTreeMap;

use psinorm_core::models::classification::BandingScheme;
use psinorm_core::models::lookup::Lookup;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{BandRef, TableIntegrityError};
use crate::scoring::{InstrumentDefinition, ScoredVariable};

/// Tolerance for comparing authored row bounds on a step grid.
const GRID_EPSILON: f64 = 1e-6;

/// Inclusive raw-score range and the normative value it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRow {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl ScoreRow {
    pub fn contains(&self, raw: f64) -> bool {
        self.min <= raw && raw <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgeBand {
    pub min_age: u32,
    pub max_age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stratifier: Option<String>,
    pub rows: Vec<ScoreRow>,
}

impl AgeBand {
    pub fn contains_age(&self, age: u32) -> bool {
        (self.min_age..=self.max_age).contains(&age)
    }

    /// Rows must already be sorted and disjoint.
    fn lookup(&self, raw: f64) -> Option<f64> {
        let idx = self.rows.partition_point(|row| row.max < raw);
        self.rows
            .get(idx)
            .filter(|row| row.contains(raw))
            .map(|row| row.value)
    }
}

/// All age bands for one (instrument, variable) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NormativeTable {
    pub instrument: String,
    pub variable: String,
    pub bands: Vec<AgeBand>,
}

#[derive(Debug, Clone)]
struct StoredTable {
    stratified: bool,
    bands: Vec<AgeBand>,
}

/// Validated, read-only normative data for every registered instrument.
#[derive(Debug, Clone, Default)]
pub struct NormStore {
    tables: BTreeMap<(String, String), StoredTable>,
}

impl NormStore {
    /// Validate `tables` against the instruments they belong to.
    pub(crate) fn build(
        tables: Vec<NormativeTable>,
        instruments: &BTreeMap<String, InstrumentDefinition>,
    ) -> Result<Self, TableIntegrityError> {
        let mut stored = BTreeMap::new();

        for table in tables {
            let definition = instruments.get(&table.instrument).ok_or_else(|| {
                TableIntegrityError::UnknownInstrument {
                    instrument: table.instrument.clone(),
                }
            })?;
            let variable = definition.variable(&table.variable).ok_or_else(|| {
                TableIntegrityError::UnknownVariable {
                    instrument: table.instrument.clone(),
                    variable: table.variable.clone(),
                }
            })?;

            let key = (table.instrument.clone(), table.variable.clone());
            if stored.contains_key(&key) {
                return Err(TableIntegrityError::DuplicateTable {
                    instrument: table.instrument,
                    variable: table.variable,
                });
            }

            let bands = check_table(&table, definition, variable)?;
            stored.insert(
                key,
                StoredTable {
                    stratified: definition.requires_stratifier(),
                    bands,
                },
            );
        }

        Ok(Self { tables: stored })
    }

    /// Resolve a derived score to its normative value.
    ///
    /// For stratified instruments only bands keyed by `stratifier` are
    /// considered; an absent or unknown stratifier resolves to
    /// `NotAvailable`, as does an age no band covers or a score no row
    /// covers.
    pub fn lookup(
        &self,
        instrument: &str,
        variable: &str,
        age: u32,
        raw: f64,
        stratifier: Option<&str>,
    ) -> Lookup<f64> {
        let Some(table) = self
            .tables
            .get(&(instrument.to_string(), variable.to_string()))
        else {
            return Lookup::NotAvailable;
        };

        table
            .bands
            .iter()
            .find(|band| {
                band.contains_age(age)
                    && (!table.stratified || band.stratifier.as_deref() == stratifier)
            })
            .and_then(|band| band.lookup(raw))
            .into()
    }

    pub fn has_table(&self, instrument: &str, variable: &str) -> bool {
        self.tables
            .contains_key(&(instrument.to_string(), variable.to_string()))
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn band_count(&self) -> usize {
        self.tables.values().map(|t| t.bands.len()).sum()
    }

    /// The stored tables in (instrument, variable) order, bands and rows
    /// sorted.
    pub fn tables(&self) -> Vec<NormativeTable> {
        self.tables
            .iter()
            .map(|((instrument, variable), table)| NormativeTable {
                instrument: instrument.clone(),
                variable: variable.clone(),
                bands: table.bands.clone(),
            })
            .collect()
    }
}

/// Validate one table and return its bands sorted by stratifier then age,
/// rows sorted by raw score.
fn check_table(
    table: &NormativeTable,
    definition: &InstrumentDefinition,
    variable: &ScoredVariable,
) -> Result<Vec<AgeBand>, TableIntegrityError> {
    let band_ref = |band: &AgeBand| BandRef {
        instrument: table.instrument.clone(),
        variable: table.variable.clone(),
        stratifier: band.stratifier.clone(),
        min_age: band.min_age,
        max_age: band.max_age,
    };

    let mut bands = table.bands.clone();
    for band in &mut bands {
        band.rows.sort_by(|a, b| a.min.total_cmp(&b.min));
    }

    for band in &bands {
        if band.min_age > band.max_age {
            return Err(TableIntegrityError::InvertedAgeBand {
                band: band_ref(band),
            });
        }
        if band.rows.is_empty() {
            return Err(TableIntegrityError::EmptyBand {
                band: band_ref(band),
            });
        }
        check_stratifier(band, definition).map_err(|detail| {
            TableIntegrityError::StratifierMismatch {
                band: band_ref(band),
                detail,
            }
        })?;
        check_rows(band, definition.banding_scheme, variable, band_ref(band))?;
    }

    bands.sort_by(|a, b| {
        a.stratifier
            .cmp(&b.stratifier)
            .then(a.min_age.cmp(&b.min_age))
    });
    for pair in bands.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.stratifier == next.stratifier && next.min_age <= prev.max_age {
            return Err(TableIntegrityError::OverlappingAgeBands {
                band: band_ref(next),
                other_min_age: prev.min_age,
                other_max_age: prev.max_age,
            });
        }
    }

    Ok(bands)
}

fn check_stratifier(band: &AgeBand, definition: &InstrumentDefinition) -> Result<(), String> {
    match (&definition.stratifier, &band.stratifier) {
        (Some(stratifier), None) => Err(format!(
            "band must be keyed by a {} value",
            stratifier.id
        )),
        (Some(stratifier), Some(value)) if !stratifier.accepts(value) => Err(format!(
            "'{value}' is not a known {} value",
            stratifier.id
        )),
        (None, Some(value)) => Err(format!(
            "instrument takes no stratifier but band is keyed by '{value}'"
        )),
        _ => Ok(()),
    }
}

fn check_rows(
    band: &AgeBand,
    scheme: BandingScheme,
    variable: &ScoredVariable,
    band_ref: BandRef,
) -> Result<(), TableIntegrityError> {
    let (scale_min, scale_max) = scheme.scale();
    for row in &band.rows {
        if !row.min.is_finite() || !row.max.is_finite() || row.min > row.max {
            return Err(TableIntegrityError::InvertedRow {
                band: band_ref,
                min: row.min,
                max: row.max,
            });
        }
        if !row.value.is_finite() || row.value < scale_min || row.value > scale_max {
            return Err(TableIntegrityError::ValueOutOfScale {
                band: band_ref,
                value: row.value,
                scheme: scheme.name(),
            });
        }
    }

    let step = variable.domain.and_then(|d| d.step);
    for pair in band.rows.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.min <= prev.max {
            return Err(TableIntegrityError::OverlappingRows {
                band: band_ref,
                at: next.min,
            });
        }
        if let Some(step) = step {
            let expected = prev.max + step;
            if (next.min - expected).abs() > GRID_EPSILON {
                return Err(TableIntegrityError::CoverageGap {
                    band: band_ref,
                    from: expected,
                    to: next.min - step,
                });
            }
        }
        if next.value < prev.value {
            return Err(TableIntegrityError::NonMonotonic {
                band: band_ref,
                at: next.min,
                previous: prev.value,
                value: next.value,
            });
        }
    }

    if let Some(domain) = variable.domain {
        // rows are non-empty and sorted
        let first = &band.rows[0];
        let last = &band.rows[band.rows.len() - 1];
        if first.min > domain.min + GRID_EPSILON {
            return Err(TableIntegrityError::CoverageGap {
                band: band_ref,
                from: domain.min,
                to: first.min,
            });
        }
        if last.max < domain.max - GRID_EPSILON {
            return Err(TableIntegrityError::CoverageGap {
                band: band_ref,
                from: last.max,
                to: domain.max,
            });
        }
    }

    Ok(())
}
