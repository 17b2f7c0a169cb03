mod common;

use std::io::Write;

use common::{ATTENTION, attention_definition, attention_tables, band, table};
use psinorm_instruments::catalog::{CURRENT_CATALOG_VERSION, Catalog};
use psinorm_instruments::norms::ScoreRow;
use psinorm_instruments::{CatalogError, Registry, TableIntegrityError};

#[test]
fn builtin_catalog_parses_at_current_version() {
    let catalog = Catalog::builtin().unwrap();
    assert_eq!(catalog.catalog_version, CURRENT_CATALOG_VERSION);
    assert_eq!(catalog.edition.as_deref(), Some("builtin-2026.1"));
    assert_eq!(catalog.tables.len(), 26);
}

#[test]
fn v0_catalog_rows_are_migrated() {
    let json = r#"{
        "tables": [
            {
                "instrument": "tin",
                "variable": "NOM",
                "bands": [
                    {
                        "min_age": 3,
                        "max_age": 14,
                        "rows": [
                            {"min": 0, "max": 29, "percentile": 80},
                            {"min": 30, "max": 60, "percentile": 110}
                        ]
                    }
                ]
            }
        ]
    }"#;

    let catalog = Catalog::from_json_str(json).unwrap();
    assert_eq!(catalog.catalog_version, CURRENT_CATALOG_VERSION);
    assert_eq!(catalog.edition, None);
    assert_eq!(
        catalog.tables[0].bands[0].rows,
        vec![
            ScoreRow {
                min: 0.0,
                max: 29.0,
                value: 80.0
            },
            ScoreRow {
                min: 30.0,
                max: 60.0,
                value: 110.0
            },
        ]
    );

    let registry = Registry::from_catalog(catalog).unwrap();
    assert_eq!(registry.norms().table_count(), 1);
}

#[test]
fn newer_catalog_version_is_refused() {
    let err = Catalog::from_json_str(r#"{"catalog_version": 99, "tables": []}"#).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::UnsupportedVersion {
            found: 99,
            supported: 1
        }
    ));
}

#[test]
fn malformed_catalogs_are_refused() {
    assert!(matches!(
        Catalog::from_json_str("[]").unwrap_err(),
        CatalogError::Malformed(_)
    ));
    assert!(matches!(
        Catalog::from_json_str(r#"{"tables": 3}"#).unwrap_err(),
        CatalogError::Malformed(_)
    ));
    assert!(matches!(
        Catalog::from_json_str("{not json").unwrap_err(),
        CatalogError::Json(_)
    ));
    assert!(matches!(
        Catalog::from_json_str(r#"{"catalog_version": 1, "tables": [{"instrument": "tin"}]}"#)
            .unwrap_err(),
        CatalogError::Json(_)
    ));
}

#[test]
fn unsound_catalog_fails_registry_construction() {
    let catalog = Catalog {
        catalog_version: CURRENT_CATALOG_VERSION,
        edition: None,
        tables: vec![table(
            "tin",
            "NOM",
            vec![band(3, 14, &[(0.0, 30.0, 110.0), (31.0, 60.0, 90.0)])],
        )],
    };

    let err = Registry::from_catalog(catalog).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Integrity(TableIntegrityError::NonMonotonic { .. })
    ));
}

#[test]
fn exported_catalog_round_trips_through_a_file() {
    let registry = Registry::new(vec![attention_definition()], attention_tables()).unwrap();
    let json = registry.to_catalog().to_json_pretty().unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let loaded = Catalog::load(file.path()).unwrap();
    assert_eq!(loaded.catalog_version, CURRENT_CATALOG_VERSION);
    assert_eq!(loaded.tables, registry.norms().tables());
    assert!(loaded.tables.iter().all(|t| t.instrument == ATTENTION));
}

#[test]
fn missing_catalog_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = Catalog::load(&path).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}
