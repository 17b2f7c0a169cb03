use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;
use crate::error::{CatalogError, TableIntegrityError};
use crate::norms::{NormStore, NormativeTable};
use crate::scoring::{Inputs, InstrumentDefinition};

/// Every supported instrument together with its validated normative data.
///
/// Built once at startup and read-only afterwards; share it by reference
/// (or `Arc`) across threads.
#[derive(Debug, Clone)]
pub struct Registry {
    instruments: BTreeMap<String, InstrumentDefinition>,
    norms: NormStore,
    edition: Option<String>,
}

impl Registry {
    /// Admit `instruments` and `tables`, rejecting any reference data that
    /// would make a score unsound.
    pub fn new(
        instruments: Vec<InstrumentDefinition>,
        tables: Vec<NormativeTable>,
    ) -> Result<Self, TableIntegrityError> {
        let mut by_code = BTreeMap::new();
        for definition in instruments {
            check_derivation(&definition)?;
            let code = definition.code.clone();
            if by_code.insert(code.clone(), definition).is_some() {
                return Err(TableIntegrityError::DuplicateInstrument { code });
            }
        }

        let norms = NormStore::build(tables, &by_code)?;

        for definition in by_code.values() {
            for variable in &definition.scored_variables {
                if !norms.has_table(&definition.code, &variable.id) {
                    tracing::warn!(
                        instrument = %definition.code,
                        variable = %variable.id,
                        "no normative table; variable will always be unavailable"
                    );
                }
            }
        }

        tracing::info!(
            instruments = by_code.len(),
            tables = norms.table_count(),
            bands = norms.band_count(),
            "instrument registry built"
        );

        Ok(Self {
            instruments: by_code,
            norms,
            edition: None,
        })
    }

    /// The built-in instruments with the catalog compiled into this crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_catalog(Catalog::builtin()?)
    }

    /// The built-in instruments with tables from `catalog`.
    pub fn from_catalog(catalog: Catalog) -> Result<Self, CatalogError> {
        let mut registry = Self::new(crate::all_instruments(), catalog.tables)?;
        tracing::info!(
            edition = catalog.edition.as_deref().unwrap_or("unnamed"),
            "normative catalog admitted"
        );
        registry.edition = catalog.edition;
        Ok(registry)
    }

    pub fn instrument(&self, code: &str) -> Option<&InstrumentDefinition> {
        self.instruments.get(code)
    }

    /// Instruments in code order.
    pub fn instruments(&self) -> impl Iterator<Item = &InstrumentDefinition> {
        self.instruments.values()
    }

    pub fn norms(&self) -> &NormStore {
        &self.norms
    }

    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    /// The registry's tables as a catalog, suitable for exporting.
    pub fn to_catalog(&self) -> Catalog {
        Catalog {
            catalog_version: crate::catalog::CURRENT_CATALOG_VERSION,
            edition: self.edition.clone(),
            tables: self.norms.tables(),
        }
    }
}

/// Run the derivation on all-zero inputs and require exactly the declared
/// scored variables back, all finite, having read only declared raw fields.
/// Sum limits may likewise mention declared fields only.
fn check_derivation(definition: &InstrumentDefinition) -> Result<(), TableIntegrityError> {
    let mismatch = |detail: String| TableIntegrityError::DerivationMismatch {
        instrument: definition.code.clone(),
        detail,
    };
    let undeclared = |field: &str| TableIntegrityError::UndeclaredField {
        instrument: definition.code.clone(),
        field: field.to_string(),
    };

    let declared_fields: BTreeSet<&str> =
        definition.raw_fields.iter().map(|f| f.id.as_str()).collect();
    if let Some(field) = definition
        .limits
        .iter()
        .flat_map(|limit| limit.field_ids())
        .find(|field| !declared_fields.contains(field))
    {
        return Err(undeclared(field));
    }

    let inputs = Inputs::zeroed(definition);
    let derived = definition.derive_scores(&inputs, definition.min_age);
    if let Some(field) = inputs.undeclared_reads().first() {
        return Err(undeclared(field));
    }
    let produced: BTreeSet<&str> = derived.keys().map(String::as_str).collect();
    let declared: BTreeSet<&str> = definition
        .scored_variables
        .iter()
        .map(|v| v.id.as_str())
        .collect();

    if produced != declared {
        return Err(mismatch(format!(
            "produces {produced:?} but declares {declared:?}"
        )));
    }
    if let Some((variable, value)) = derived.iter().find(|(_, v)| !v.is_finite()) {
        return Err(mismatch(format!("yields {value} for {variable}")));
    }
    Ok(())
}
