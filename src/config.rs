//! Migration configuration
//!
//! Settings are read from an optional TOML file (`config/docshift.toml` by
//! default) and `DOCSHIFT__*` environment variables, then flattened into the
//! key/value [`Parameters`] context the migration engine consumes:
//!
//! ```toml
//! [migration]
//! versions = "0.0.0 0.0.4"
//! database_min_version = "0.0.3"
//!
//! [migration.preparers]
//! "0.0.0" = ""
//! "0.0.4" = "database_version region hospital hospital_sub_item_id"
//! ```

use crate::readiness::DEFAULT_MIN_VERSION;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Parameter key holding the space-delimited version list
pub const CFG_VERSION_LIST: &str = "versions";

/// Parameter key prefix for per-version preparer lists (`migration.<version>`)
pub const CFG_PREFIX_MIGRATION: &str = "migration.";

const DEFAULT_CONFIG_PATH: &str = "config/docshift.toml";
const ENV_PREFIX: &str = "DOCSHIFT";

/// Flat key/value configuration context handed to the migration engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<String, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter, `None` if it is not configured
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`Parameters::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// The configured version list, if any
    pub fn version_list(&self) -> Option<&str> {
        self.get(CFG_VERSION_LIST)
    }

    /// The configured preparer list for `version`, if any
    pub fn preparer_list(&self, version: &str) -> Option<&str> {
        self.get(&format!("{CFG_PREFIX_MIGRATION}{version}"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// The `[migration]` configuration section
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Space-delimited version list; `None` when not configured at all
    #[serde(default)]
    pub versions: Option<String>,
    /// Version reported while the store has no recorded version
    #[serde(default = "default_min_version")]
    pub database_min_version: String,
    /// Version label -> space-delimited preparer identifiers
    #[serde(default)]
    pub preparers: BTreeMap<String, String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            versions: None,
            database_min_version: default_min_version(),
            preparers: BTreeMap::new(),
        }
    }
}

fn default_min_version() -> String {
    DEFAULT_MIN_VERSION.to_string()
}

impl MigrationConfig {
    /// Load from `config/docshift.toml`, falling back to env vars
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from the given TOML file (optional) layered under env vars
    ///
    /// If the file exists but cannot be read or parsed, a warning is logged and
    /// the configuration is rebuilt from the environment alone.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env_source());

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if path.exists() {
                    log::warn!(
                        "Failed to load config file {}, falling back to env. Error: {}",
                        path.display(),
                        err
                    );
                }
                Config::builder()
                    .add_source(env_source())
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        Self::from_settings(&settings)
    }

    /// Parse a TOML document directly (no file or environment layering)
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        match settings.get::<MigrationConfig>("migration") {
            Ok(cfg) => Ok(cfg),
            // A missing section is a valid (empty) configuration; the driver
            // reports the missing version list.
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Migration configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }

    /// Flatten into the `versions` / `migration.<version>` parameter context
    pub fn parameters(&self) -> Parameters {
        let mut params: Parameters = self
            .preparers
            .iter()
            .map(|(version, list)| (format!("{CFG_PREFIX_MIGRATION}{version}"), list.clone()))
            .collect();

        if let Some(versions) = &self.versions {
            params.set(CFG_VERSION_LIST, versions.clone());
        }
        params
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}
