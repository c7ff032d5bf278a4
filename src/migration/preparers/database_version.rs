use crate::migration::{MigrationContext, Preparer, PreparerError};
use crate::readiness::{Core, PREFERENCE_DB_VERSION_NAME};

/// Seeds the recorded database version for stores that predate version tracking
///
/// Writes the core's minimum version when no version preference exists.
/// Requires an `Arc<Core>` in the migration context.
#[derive(Debug, Default)]
pub struct DatabaseVersionPreparer;

impl Preparer for DatabaseVersionPreparer {
    fn check(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError> {
        let core = ctx.require::<Core>()?;
        Ok(core
            .preferences()
            .get_system_preference(PREFERENCE_DB_VERSION_NAME)?
            .is_none())
    }

    fn execute(&mut self, ctx: &MigrationContext) -> Result<(), PreparerError> {
        let core = ctx.require::<Core>()?;
        core.preferences()
            .set_system_preference(PREFERENCE_DB_VERSION_NAME, core.min_version())?;
        Ok(())
    }

    fn validate(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError> {
        Ok(!self.check(ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parameters;
    use crate::preference::PreferenceManager;
    use std::sync::Arc;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_seeds_min_version_once() {
        let core = Arc::new(Core::new(PreferenceManager::default(), "0.0.3"));
        let ctx = MigrationContext::new(Parameters::new()).with_attribute(Arc::clone(&core));
        let mut preparer = DatabaseVersionPreparer;

        assert!(preparer.check(&ctx).unwrap());
        preparer.execute(&ctx).unwrap();
        assert!(preparer.validate(&ctx).unwrap());

        assert_eq!(core.get_current_database_version(), "0.0.3");
        assert!(!DatabaseVersionPreparer.check(&ctx).unwrap());
    }

    #[test]
    fn test_requires_core() {
        let ctx = MigrationContext::default();
        assert!(matches!(
            DatabaseVersionPreparer.check(&ctx),
            Err(PreparerError::MissingAttribute(_))
        ));
    }
}
