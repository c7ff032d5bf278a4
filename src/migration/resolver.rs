//! Per-version preparer resolution

use crate::config::{Parameters, CFG_PREFIX_MIGRATION};
use crate::migration::{MigrationError, Preparer, PreparerRegistry, ResolveError};

/// One configured slot of a version's preparer list
///
/// A slot whose identifier could not be resolved keeps the error instead of
/// an instance; the driver skips it and carries on with the next slot.
pub struct ResolvedPreparer {
    pub name: String,
    pub preparer: Result<Box<dyn Preparer>, ResolveError>,
}

impl std::fmt::Debug for ResolvedPreparer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedPreparer")
            .field("name", &self.name)
            .field("resolved", &self.preparer.is_ok())
            .finish()
    }
}

/// Turns a version label into the instances configured for it
#[derive(Debug, Clone, Copy)]
pub struct PreparerResolver<'a> {
    parameters: &'a Parameters,
    registry: &'a PreparerRegistry,
}

impl<'a> PreparerResolver<'a> {
    pub fn new(parameters: &'a Parameters, registry: &'a PreparerRegistry) -> Self {
        Self {
            parameters,
            registry,
        }
    }

    /// Configured preparer identifiers for `version`, in configuration order
    ///
    /// A blank list is a valid no-op version.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::MissingPreparerList` if `migration.<version>`
    /// is not configured at all.
    pub fn preparer_list(&self, version: &str) -> Result<Vec<String>, MigrationError> {
        let raw = self.parameters.preparer_list(version).ok_or_else(|| {
            MigrationError::MissingPreparerList {
                version: version.to_string(),
            }
        })?;

        if raw.trim().is_empty() {
            log::debug!("Version {} has no preparers to execute", version);
            return Ok(Vec::new());
        }

        Ok(raw.split_whitespace().map(str::to_string).collect())
    }

    /// Create a fresh instance for every identifier configured for `version`
    ///
    /// Identifiers that fail to resolve are logged and kept as error slots.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::MissingPreparerList` if `migration.<version>`
    /// is not configured at all (also logged).
    pub fn resolve(&self, version: &str) -> Result<Vec<ResolvedPreparer>, MigrationError> {
        let names = self.preparer_list(version).map_err(|e| {
            log::error!("{} (key '{}{}')", e, CFG_PREFIX_MIGRATION, version);
            e
        })?;

        Ok(names
            .into_iter()
            .map(|name| {
                let preparer = self.registry.create(&name);
                if let Err(e) = &preparer {
                    log::error!("Version {}: {}", version, e);
                }
                ResolvedPreparer { name, preparer }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::preparers::DummyPreparer;

    fn registry() -> PreparerRegistry {
        let mut registry = PreparerRegistry::new();
        assert!(registry.register_default::<DummyPreparer>("dummy").is_ok());
        registry
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_list_preserves_configuration_order() {
        let params = Parameters::new().with("migration.0.0.4", " region  dummy\tdatabase_version ");
        let registry = registry();
        let resolver = PreparerResolver::new(&params, &registry);

        assert_eq!(
            resolver.preparer_list("0.0.4").unwrap(),
            vec!["region", "dummy", "database_version"]
        );
    }

    #[test]
    fn test_missing_list_is_error_blank_list_is_empty() {
        let params = Parameters::new().with("migration.0.0.2", "  ");
        let registry = registry();
        let resolver = PreparerResolver::new(&params, &registry);

        assert!(matches!(
            resolver.resolve("0.0.1"),
            Err(MigrationError::MissingPreparerList { version }) if version == "0.0.1"
        ));
        assert!(matches!(resolver.resolve("0.0.2"), Ok(slots) if slots.is_empty()));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_unknown_identifier_keeps_error_slot() {
        let params = Parameters::new().with("migration.0.0.9", "NotExistingPreparer dummy");
        let registry = registry();
        let resolver = PreparerResolver::new(&params, &registry);

        let slots = resolver.resolve("0.0.9").unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].name, "NotExistingPreparer");
        assert!(matches!(
            &slots[0].preparer,
            Err(ResolveError::UnknownPreparer(name)) if name == "NotExistingPreparer"
        ));
        assert!(slots[1].preparer.is_ok());
    }
}
