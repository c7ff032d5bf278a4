//! JSON-file document store rooted at a directory

use docshift::migration::MigrationContext;
use docshift::preference::{PreferenceManager, SystemPreference};
use docshift::store::{Hospital, JsonFileRepository, Region, Repository};
use docshift::{Core, Parameters};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const REGIONS_FILE: &str = "regions.json";
pub const HOSPITALS_FILE: &str = "hospitals.json";
pub const PREFERENCES_FILE: &str = "preferences.json";

/// One JSON file per collection under a data directory
///
/// Files are created on first write, so opening a fresh directory is free.
#[derive(Debug)]
pub struct DataDir {
    root: PathBuf,
    regions: Arc<JsonFileRepository<Region>>,
    hospitals: Arc<JsonFileRepository<Hospital>>,
    preferences: Arc<JsonFileRepository<SystemPreference>>,
}

impl DataDir {
    pub fn open(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            regions: Arc::new(JsonFileRepository::new(root.join(REGIONS_FILE))),
            hospitals: Arc::new(JsonFileRepository::new(root.join(HOSPITALS_FILE))),
            preferences: Arc::new(JsonFileRepository::new(root.join(PREFERENCES_FILE))),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn regions(&self) -> Arc<dyn Repository<Region>> {
        self.regions.clone()
    }

    pub fn hospitals(&self) -> Arc<dyn Repository<Hospital>> {
        self.hospitals.clone()
    }

    /// Readiness record backed by the preferences file
    pub fn core(&self, min_version: &str) -> Arc<Core> {
        let preferences = PreferenceManager::new(self.preferences.clone());
        Arc::new(Core::new(preferences, min_version))
    }

    /// Migration context exposing the core and both domain repositories
    pub fn context(&self, parameters: Parameters, core: &Arc<Core>) -> MigrationContext {
        MigrationContext::new(parameters)
            .with_attribute(Arc::clone(core))
            .with_attribute(self.regions())
            .with_attribute(self.hospitals())
    }
}
