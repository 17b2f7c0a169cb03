//! Versioned normative catalogs.
//!
//! A catalog carries table data only; formulas and field definitions live
//! with the instruments in code. The built-in catalog is compiled into the
//! crate, and a clinic can substitute its licensed tables with a catalog
//! file of the same shape.

use std::path::Path;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CatalogError;
use crate::norms::NormativeTable;

/// Current catalog version. Bump this when changing the document shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_CATALOG_VERSION: u32 = 1;

static BUILTIN_CATALOG: &str = include_str!("../norms/builtin.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Catalog {
    /// Schema version. Missing or 0 = pre-versioned catalog.
    #[serde(default)]
    pub catalog_version: u32,
    /// Free-form label of the norm edition, e.g. the manual's publication.
    #[serde(default)]
    pub edition: Option<String>,
    pub tables: Vec<NormativeTable>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            tables = catalog.tables.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        // Parse as raw JSON so we can run migrations before deserializing.
        let json: serde_json::Value = serde_json::from_str(json)?;
        let on_disk_version = json
            .get("catalog_version")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        let migrated = migrate(json, on_disk_version)?;
        Ok(serde_json::from_value(migrated)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        let mut stamped = self.clone();
        stamped.catalog_version = CURRENT_CATALOG_VERSION;
        Ok(serde_json::to_string_pretty(&stamped)?)
    }
}

/// Run sequential migrations from `from_version` up to
/// [`CURRENT_CATALOG_VERSION`]. Each migration is a pure transform on the
/// raw JSON value.
fn migrate(
    mut json: serde_json::Value,
    from_version: u64,
) -> Result<serde_json::Value, CatalogError> {
    if from_version > u64::from(CURRENT_CATALOG_VERSION) {
        return Err(CatalogError::UnsupportedVersion {
            found: from_version,
            supported: CURRENT_CATALOG_VERSION,
        });
    }

    // v0 → v1: row cells were named `percentile` even for standard scores
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| CatalogError::Malformed("catalog is not a JSON object".into()))?;
        let tables = obj
            .get_mut("tables")
            .and_then(|t| t.as_array_mut())
            .ok_or_else(|| CatalogError::Malformed("`tables` is not an array".into()))?;

        for row in tables
            .iter_mut()
            .filter_map(|t| t.get_mut("bands").and_then(|b| b.as_array_mut()))
            .flatten()
            .filter_map(|b| b.get_mut("rows").and_then(|r| r.as_array_mut()))
            .flatten()
            .filter_map(|r| r.as_object_mut())
        {
            if let Some(value) = row.remove("percentile") {
                row.entry("value").or_insert(value);
            }
        }

        obj.insert(
            "catalog_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated catalog v0 → v1 (renamed row percentile to value)");
    }

    // Future migrations go here:
    // if from_version < 2 { ... }

    Ok(json)
}
