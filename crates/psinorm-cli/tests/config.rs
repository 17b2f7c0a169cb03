use std::path::PathBuf;

use psinorm_cli::config::{
    CURRENT_VERSION, OutputFormat, PsinormConfig, load_config, save_config,
};
use psinorm_cli::logging::LogFormat;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, PsinormConfig::default());
    assert_eq!(config.config_version, CURRENT_VERSION);
    assert_eq!(config.output, OutputFormat::Table);
    assert_eq!(config.log_format, LogFormat::Pretty);
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let config = PsinormConfig {
        config_version: 0,
        catalog_path: Some(PathBuf::from("/srv/norms/clinic.json")),
        output: OutputFormat::Json,
        log_format: LogFormat::Json,
    };

    save_config(&path, &config).unwrap();
    let loaded = load_config(&path).unwrap();

    assert_eq!(loaded.config_version, CURRENT_VERSION);
    assert_eq!(loaded.catalog_path, config.catalog_path);
    assert_eq!(loaded.output, OutputFormat::Json);
    assert_eq!(loaded.log_format, LogFormat::Json);
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn flags_override_every_file_setting() {
    let file = PsinormConfig {
        config_version: CURRENT_VERSION,
        catalog_path: Some(PathBuf::from("/srv/norms/clinic.json")),
        output: OutputFormat::Table,
        log_format: LogFormat::Pretty,
    };

    let effective = file.clone().with_overrides(
        Some(PathBuf::from("/tmp/trial.json")),
        Some(OutputFormat::Json),
        Some(LogFormat::Json),
    );
    assert_eq!(effective.catalog_path, Some(PathBuf::from("/tmp/trial.json")));
    assert_eq!(effective.output, OutputFormat::Json);
    assert_eq!(effective.log_format, LogFormat::Json);

    let shown = serde_json::to_value(&effective).unwrap();
    assert_eq!(shown["log_format"], "json");

    assert_eq!(file.clone().with_overrides(None, None, None), file);
}

#[cfg(unix)]
#[test]
fn saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    save_config(&path, &PsinormConfig::default()).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn v0_table_path_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"table_path": "/srv/norms/legacy.json", "output": "json"}"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(
        config.catalog_path,
        Some(PathBuf::from("/srv/norms/legacy.json"))
    );
    assert_eq!(config.output, OutputFormat::Json);
    assert_eq!(config.log_format, LogFormat::Pretty);
}

#[test]
fn newer_config_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"config_version": 7}"#).unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn non_object_config_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    assert!(load_config(&path).is_err());
}
