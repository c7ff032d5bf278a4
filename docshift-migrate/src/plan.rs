//! Dry-run planning: which versions are due and what they would run

use docshift::migration::{MigrationError, PreparerRegistry, PreparerResolver, VersionRegistry};
use docshift::Parameters;

/// One configured preparer identifier and whether the registry knows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPreparer {
    pub name: String,
    pub registered: bool,
}

/// A declared version as the driver would see it
#[derive(Debug)]
pub struct PlannedVersion {
    pub version: String,
    /// `false` when the version is older than the recorded version
    pub due: bool,
    /// Configured identifiers, or the error the driver would log
    pub preparers: Result<Vec<PlannedPreparer>, MigrationError>,
}

/// Plan a run against `current` without creating or calling any preparer
///
/// # Errors
///
/// Returns the version-list error the driver would log and skip the run for.
pub fn plan(
    parameters: &Parameters,
    registry: &PreparerRegistry,
    current: &str,
) -> Result<Vec<PlannedVersion>, MigrationError> {
    let versions = VersionRegistry::parse(parameters.version_list())?;
    let resolver = PreparerResolver::new(parameters, registry);

    Ok(versions
        .iter()
        .map(|version| PlannedVersion {
            version: version.to_string(),
            due: version.is_due(current),
            preparers: resolver.preparer_list(version.as_str()).map(|names| {
                names
                    .into_iter()
                    .map(|name| PlannedPreparer {
                        registered: registry.contains(&name),
                        name,
                    })
                    .collect()
            }),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_plan_marks_unknown_identifiers() {
        let params = Parameters::new()
            .with("versions", "0.0.4")
            .with("migration.0.0.4", "region nope");
        let registry = PreparerRegistry::with_builtin();

        let planned = plan(&params, &registry, "0.0.0").unwrap();
        let preparers = planned[0].preparers.as_ref().unwrap();

        assert!(planned[0].due);
        assert!(preparers[0].registered);
        assert!(!preparers[1].registered);
    }
}
