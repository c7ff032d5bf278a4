//! Loading migration configuration from TOML files

use docshift::config::MigrationConfig;
use docshift::readiness::DEFAULT_MIN_VERSION;
use std::fs;
use tempfile::TempDir;

#[test]
#[allow(clippy::expect_used)]
fn test_load_from_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("docshift.toml");
    fs::write(
        &path,
        r#"
[migration]
versions = "0.0.0 0.0.4 0.0.5"
database_min_version = "0.0.3"

[migration.preparers]
"0.0.0" = ""
"0.0.4" = "database_version region"
"0.0.5" = "hospital_sub_item_id"
"#,
    )
    .expect("Failed to write config");

    let config = MigrationConfig::load_from(&path).expect("Failed to load config");
    let params = config.parameters();

    assert_eq!(config.database_min_version, "0.0.3");
    assert_eq!(params.version_list(), Some("0.0.0 0.0.4 0.0.5"));
    assert_eq!(params.preparer_list("0.0.0"), Some(""));
    assert_eq!(params.preparer_list("0.0.4"), Some("database_version region"));
    assert_eq!(params.preparer_list("0.0.5"), Some("hospital_sub_item_id"));
}

#[test]
#[allow(clippy::expect_used)]
fn test_missing_file_is_empty_configuration() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let config = MigrationConfig::load_from(temp_dir.path().join("absent.toml"))
        .expect("Missing file must not be an error");

    assert!(config.versions.is_none());
    assert_eq!(config.database_min_version, DEFAULT_MIN_VERSION);
}

#[test]
#[allow(clippy::expect_used)]
fn test_unparseable_file_falls_back_to_environment() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[migration\nversions = ").expect("Failed to write config");

    let config = MigrationConfig::load_from(&path).expect("Env fallback must succeed");

    assert!(config.preparers.is_empty());
}

#[test]
fn test_wrongly_typed_section_is_an_error() {
    let result = MigrationConfig::from_toml("[migration]\npreparers = 5\n");
    assert!(result.is_err());
}
