//! In-process migration execution helpers

use crate::migration::{DataMigration, MigrationContext, MigrationReport};
use crate::readiness::Core;

/// Run the data migration on application startup with the built-in preparers
///
/// Intended to be called once during application initialisation, before
/// requests are served. The migration never fails: every error is logged and
/// recorded in the returned report, and `core` is marked ready afterwards.
///
/// # Arguments
///
/// * `core` - Readiness record holding the store's content version
/// * `ctx` - Configuration parameters and the services preparers need
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use docshift::config::MigrationConfig;
/// use docshift::migration::{startup_migration, MigrationContext};
/// use docshift::preference::PreferenceManager;
/// use docshift::readiness::Core;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = MigrationConfig::load()?;
///     let core = Arc::new(Core::new(
///         PreferenceManager::default(),
///         config.database_min_version.clone(),
///     ));
///     let ctx = MigrationContext::new(config.parameters()).with_attribute(Arc::clone(&core));
///
///     startup_migration(&core, &ctx);
///
///     // Continue with application startup...
///     Ok(())
/// }
/// ```
pub fn startup_migration(core: &Core, ctx: &MigrationContext) -> MigrationReport {
    startup_migration_with(&DataMigration::with_builtin(), core, ctx)
}

/// Run the data migration with a caller-supplied driver
///
/// Same as [`startup_migration`], but preparers are resolved against the
/// driver's own registry.
pub fn startup_migration_with(
    driver: &DataMigration,
    core: &Core,
    ctx: &MigrationContext,
) -> MigrationReport {
    let report = driver.run(core, ctx);

    let completed = report.completed_count();
    if completed > 0 {
        log::info!("Completed {} preparer(s) on startup", completed);
    } else {
        log::debug!("No preparer had work to do");
    }

    let failures = report.failure_count();
    if failures > 0 || !report.errors.is_empty() {
        log::warn!(
            "Data migration finished with {} failed preparer(s) and {} error(s)",
            failures,
            report.errors.len()
        );
    }

    report
}
