//! System preferences: a named key/value store kept in the document store
//!
//! The recorded database content version lives here (see
//! [`crate::readiness::PREFERENCE_DB_VERSION_NAME`]).

use crate::store::{Entity, Repository, StoreError, TransientRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single named system preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPreference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub value: Option<String>,
}

impl SystemPreference {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            value,
        }
    }
}

impl Entity for SystemPreference {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Repository of system preferences, addressable by preference name
///
/// Implemented for every `Repository<SystemPreference>`.
pub trait SystemPreferenceRepository: Repository<SystemPreference> {
    /// Find the preference with the given name
    fn find_by_name(&self, name: &str) -> Result<Option<SystemPreference>, StoreError> {
        Ok(self.get_all()?.into_iter().find(|p| p.name == name))
    }

    /// Remove the preference with the given name, if present
    fn remove_by_name(&self, name: &str) -> Result<bool, StoreError> {
        match self.find_by_name(name)?.and_then(|p| p.id) {
            Some(id) => self.remove_item(&id),
            None => Ok(false),
        }
    }
}

impl<R: Repository<SystemPreference>> SystemPreferenceRepository for R {}

/// In-memory preference repository
pub type TransientSystemPreferenceRepository = TransientRepository<SystemPreference>;

/// Read/write access to system preferences
#[derive(Clone)]
pub struct PreferenceManager {
    repository: Arc<dyn SystemPreferenceRepository>,
}

impl std::fmt::Debug for PreferenceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceManager").finish_non_exhaustive()
    }
}

impl Default for PreferenceManager {
    fn default() -> Self {
        Self::new(Arc::new(TransientSystemPreferenceRepository::new()))
    }
}

impl PreferenceManager {
    pub fn new(repository: Arc<dyn SystemPreferenceRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn SystemPreferenceRepository> {
        &self.repository
    }

    /// Get the value of a preference, `None` if it is unset
    pub fn get_system_preference(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.repository.find_by_name(name)?.and_then(|p| p.value))
    }

    /// Create or update a preference
    pub fn set_system_preference(&self, name: &str, value: &str) -> Result<(), StoreError> {
        match self.repository.find_by_name(name)? {
            Some(mut preference) => {
                preference.value = Some(value.to_string());
                self.repository.update_item(&preference)
            }
            None => {
                self.repository
                    .add_item(SystemPreference::new(name, Some(value.to_string())))?;
                Ok(())
            }
        }
    }

    /// Remove a preference; removing an unknown preference is not an error
    pub fn remove_system_preference(&self, name: &str) -> Result<(), StoreError> {
        self.repository.remove_by_name(name)?;
        Ok(())
    }
}
