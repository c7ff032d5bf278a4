use crate::migration::{MigrationContext, Preparer, PreparerError};
use crate::store::{Region, Repository};

/// Bundled seed for the initial region
pub const REGION_SEED: &str = include_str!("../../../resources/migration/0.0.4/domain/region.json");

/// Creates the initial region from the bundled seed when no region exists
///
/// Requires an `Arc<dyn Repository<Region>>` in the migration context.
#[derive(Debug, Default)]
pub struct RegionPreparer;

impl RegionPreparer {
    /// Parse the bundled seed into a new (id-less) region
    pub fn seed_region() -> Result<Region, PreparerError> {
        let parsed: Region = serde_json::from_str(REGION_SEED).map_err(PreparerError::SeedData)?;

        Ok(Region {
            id: None,
            ..parsed
        })
    }
}

impl Preparer for RegionPreparer {
    fn check(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError> {
        let regions = ctx.require::<dyn Repository<Region>>()?;
        Ok(regions.get_all()?.is_empty())
    }

    fn execute(&mut self, ctx: &MigrationContext) -> Result<(), PreparerError> {
        let regions = ctx.require::<dyn Repository<Region>>()?;
        let region = Self::seed_region()?;
        let id = regions.add_item(region)?;
        log::info!("Created initial region {}", id);
        Ok(())
    }

    fn validate(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError> {
        Ok(!self.check(ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TransientRepository;
    use std::sync::Arc;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_seed_parses() {
        let region = RegionPreparer::seed_region().unwrap();

        assert!(region.id.is_none());
        assert!(!region.name.is_empty());
        let interval = region.interval_type.clone().unwrap();
        assert!(Region::INTERVAL_TYPES.iter().any(|t| *t == interval));
        assert!(!region.urgency_categories.unwrap().is_empty());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_skips_when_region_exists() {
        let regions: Arc<dyn Repository<Region>> =
            Arc::new(TransientRepository::with_items([Region::new("Existing")]).unwrap());
        let ctx = MigrationContext::default().with_attribute(regions);

        assert!(!RegionPreparer.check(&ctx).unwrap());
    }
}
