//! Data migration driver
//!
//! Runs once per process during startup:
//!
//! 1. load the declared versions (`versions` parameter), sorted and unique;
//! 2. read the recorded store version from [`Core`];
//! 3. for every due version, resolve its preparers and drive each through
//!    `check` -> `execute` -> `validate`;
//! 4. record the last declared version;
//! 5. mark the system ready.
//!
//! Every failure is logged and recorded in the returned [`MigrationReport`],
//! never propagated. The system is marked ready whatever happened.

use crate::migration::{
    MigrationContext, MigrationError, MigrationReport, Preparer, PreparerError, PreparerOutcome,
    PreparerRegistry, PreparerReport, PreparerResolver, VersionLabel, VersionRegistry,
    VersionReport,
};
use crate::readiness::Core;
use chrono::Utc;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// The migration engine
#[derive(Debug, Default)]
pub struct DataMigration {
    registry: PreparerRegistry,
}

impl DataMigration {
    /// Create a driver resolving preparer identifiers against `registry`
    pub fn new(registry: PreparerRegistry) -> Self {
        Self { registry }
    }

    /// Create a driver with the built-in preparers
    pub fn with_builtin() -> Self {
        Self::new(PreparerRegistry::with_builtin())
    }

    pub fn registry(&self) -> &PreparerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PreparerRegistry {
        &mut self.registry
    }

    /// Run the migration and mark `core` ready
    ///
    /// Never fails and never panics because of a preparer: the outcome of
    /// every step is in the returned report.
    pub fn run(&self, core: &Core, ctx: &MigrationContext) -> MigrationReport {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("data_migration").entered();

        log::debug!("Starting data migration");
        let mut report = MigrationReport::started();

        self.migrate(core, ctx, &mut report);

        log::debug!("Data migration completed. Setting the Core to READY");
        core.set_ready(true);

        report.finished_at = Utc::now();

        #[cfg(feature = "metrics")]
        crate::metrics::METRICS.record_run(&report);

        report
    }

    fn migrate(&self, core: &Core, ctx: &MigrationContext, report: &mut MigrationReport) {
        let versions = match VersionRegistry::parse(ctx.parameters().version_list()) {
            Ok(versions) => versions,
            Err(e) => {
                log::error!("{}; skipping data migration", e);
                report.errors.push(e);
                return;
            }
        };

        let current = core.get_current_database_version();
        log::debug!("Current database version: '{}'", current);
        report.starting_version = Some(current.clone());

        let resolver = PreparerResolver::new(ctx.parameters(), &self.registry);
        let mut last_successful = current.clone();

        for version in &versions {
            if version.is_due(&current) {
                report
                    .versions
                    .push(self.process_version(version, &resolver, ctx));
            } else {
                log::debug!(
                    "Skipping version {} (older than recorded version {})",
                    version,
                    current
                );
                report.versions.push(VersionReport::skipped(version.as_str()));
            }

            // Advances through every declared version, processed or not.
            last_successful = version.to_string();
        }

        match core.set_database_version(&last_successful) {
            Ok(()) => {
                log::debug!("Database version set to '{}'", last_successful);
                report.final_version = Some(last_successful);
            }
            Err(error) => {
                let error = MigrationError::VersionUpdate {
                    version: last_successful,
                    error,
                };
                log::error!("{}", error);
                report.errors.push(error);
            }
        }
    }

    fn process_version(
        &self,
        version: &VersionLabel,
        resolver: &PreparerResolver<'_>,
        ctx: &MigrationContext,
    ) -> VersionReport {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("migration_version", version = %version).entered();

        let mut report = VersionReport {
            version: version.to_string(),
            processed: true,
            error: None,
            preparers: Vec::new(),
        };

        let slots = match resolver.resolve(version.as_str()) {
            Ok(slots) => slots,
            Err(e) => {
                report.error = Some(e);
                return report;
            }
        };

        for slot in slots {
            let start = Instant::now();
            let outcome = match slot.preparer {
                Ok(mut preparer) => {
                    Self::process_preparer(version.as_str(), &slot.name, preparer.as_mut(), ctx)
                }
                Err(e) => PreparerOutcome::Unresolved(e),
            };
            let elapsed = start.elapsed();

            #[cfg(feature = "metrics")]
            crate::metrics::METRICS.record_preparer(&outcome, elapsed);

            report.preparers.push(PreparerReport {
                name: slot.name,
                outcome,
                execution_time_ms: elapsed.as_millis() as i64,
            });
        }

        report
    }

    /// Drive one preparer through its phases
    ///
    /// `validate` only runs after a successful `execute`, and `execute` only
    /// after `check` returned `true`.
    pub fn process_preparer(
        version: &str,
        name: &str,
        preparer: &mut dyn Preparer,
        ctx: &MigrationContext,
    ) -> PreparerOutcome {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("preparer", version = %version, preparer = %name).entered();

        log::debug!("Checking if {} needs to be executed", name);
        let needed = match guarded(|| preparer.check(ctx)) {
            Ok(needed) => needed,
            Err(e) => {
                log::error!("Check threw error: {}: {}: {}", version, name, e);
                return PreparerOutcome::CheckFailed(e);
            }
        };

        if !needed {
            log::debug!("Preparer {} ({}) has nothing to do", name, version);
            return PreparerOutcome::NotNeeded;
        }

        log::debug!("Executing preparer {} ({})", name, version);
        if let Err(e) = guarded(|| preparer.execute(ctx)) {
            log::error!("Execution threw error: {}: {}: {}", version, name, e);
            return PreparerOutcome::ExecuteFailed(e);
        }

        match guarded(|| preparer.validate(ctx)) {
            Ok(true) => {
                log::info!("Preparer {} ({}) completed", name, version);
                PreparerOutcome::Completed
            }
            Ok(false) => {
                log::error!("Validation failed: {}: {}", version, name);
                PreparerOutcome::Incomplete
            }
            Err(e) => {
                log::error!("Validation threw error: {}: {}: {}", version, name, e);
                PreparerOutcome::ValidateFailed(e)
            }
        }
    }
}

/// Run one phase, turning a panic into [`PreparerError::Panicked`]
fn guarded<T>(phase: impl FnOnce() -> Result<T, PreparerError>) -> Result<T, PreparerError> {
    match panic::catch_unwind(AssertUnwindSafe(phase)) {
        Ok(result) => result,
        Err(payload) => Err(PreparerError::Panicked(panic_message(payload.as_ref()))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        check: Result<bool, &'static str>,
        validate: bool,
        calls: Vec<&'static str>,
    }

    impl Preparer for Scripted {
        fn check(&mut self, _ctx: &MigrationContext) -> Result<bool, PreparerError> {
            self.calls.push("check");
            self.check.map_err(|e| PreparerError::Failed(e.to_string()))
        }

        fn execute(&mut self, _ctx: &MigrationContext) -> Result<(), PreparerError> {
            self.calls.push("execute");
            Ok(())
        }

        fn validate(&mut self, _ctx: &MigrationContext) -> Result<bool, PreparerError> {
            self.calls.push("validate");
            Ok(self.validate)
        }
    }

    fn scripted(check: Result<bool, &'static str>, validate: bool) -> Scripted {
        Scripted {
            check,
            validate,
            calls: Vec::new(),
        }
    }

    #[test]
    fn test_full_cycle() {
        let ctx = MigrationContext::default();
        let mut preparer = scripted(Ok(true), true);

        let outcome = DataMigration::process_preparer("0.0.9", "scripted", &mut preparer, &ctx);
        assert!(matches!(outcome, PreparerOutcome::Completed));
        assert_eq!(preparer.calls, vec!["check", "execute", "validate"]);
    }

    #[test]
    fn test_check_false_short_circuits() {
        let ctx = MigrationContext::default();
        let mut preparer = scripted(Ok(false), true);

        let outcome = DataMigration::process_preparer("0.0.9", "scripted", &mut preparer, &ctx);
        assert!(matches!(outcome, PreparerOutcome::NotNeeded));
        assert_eq!(preparer.calls, vec!["check"]);
    }

    #[test]
    fn test_check_error_short_circuits() {
        let ctx = MigrationContext::default();
        let mut preparer = scripted(Err("boom"), true);

        let outcome = DataMigration::process_preparer("0.0.9", "scripted", &mut preparer, &ctx);
        assert!(matches!(outcome, PreparerOutcome::CheckFailed(_)));
        assert_eq!(preparer.calls, vec!["check"]);
    }

    #[test]
    fn test_validate_false_is_incomplete() {
        let ctx = MigrationContext::default();
        let mut preparer = scripted(Ok(true), false);

        let outcome = DataMigration::process_preparer("0.0.9", "scripted", &mut preparer, &ctx);
        assert!(matches!(outcome, PreparerOutcome::Incomplete));
    }

    #[test]
    fn test_panic_becomes_error() {
        let result: Result<(), PreparerError> = guarded(|| panic!("exploded"));

        match result {
            Err(PreparerError::Panicked(msg)) => assert_eq!(msg, "exploded"),
            other => panic!("expected panic error, got {:?}", other),
        }
    }

    #[test]
    fn test_formatted_panic_message() {
        let code = 7;
        let result: Result<(), PreparerError> = guarded(|| panic!("exit code {}", code));

        assert!(matches!(result, Err(PreparerError::Panicked(msg)) if msg == "exit code 7"));
    }
}
