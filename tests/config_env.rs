//! Environment variables layered over the configuration file
//!
//! Kept in its own test binary: it mutates the process environment.

use docshift::config::MigrationConfig;
use std::fs;
use tempfile::TempDir;

#[test]
#[allow(clippy::expect_used)]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("docshift.toml");
    fs::write(
        &path,
        "[migration]\nversions = \"0.0.4\"\ndatabase_min_version = \"0.0.1\"\n",
    )
    .expect("Failed to write config");

    std::env::set_var("DOCSHIFT__MIGRATION__DATABASE_MIN_VERSION", "0.0.2");
    let config = MigrationConfig::load_from(&path);
    std::env::remove_var("DOCSHIFT__MIGRATION__DATABASE_MIN_VERSION");

    let config = config.expect("Failed to load config");
    assert_eq!(config.database_min_version, "0.0.2");
    assert_eq!(config.versions.as_deref(), Some("0.0.4"));
}
