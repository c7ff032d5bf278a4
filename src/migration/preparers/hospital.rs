use crate::migration::{MigrationContext, Preparer, PreparerError};
use crate::store::{Hospital, Repository};

/// Bundled seed for the initial hospital
pub const HOSPITAL_SEED: &str =
    include_str!("../../../resources/migration/0.0.4/domain/hospital.json");

/// Creates the demo hospital from the bundled seed when no hospital exists
///
/// Requires an `Arc<dyn Repository<Hospital>>` in the migration context.
#[derive(Debug, Default)]
pub struct HospitalPreparer;

impl HospitalPreparer {
    /// Parse the bundled seed into a new (id-less) hospital
    pub fn seed_hospital() -> Result<Hospital, PreparerError> {
        let parsed: Hospital =
            serde_json::from_str(HOSPITAL_SEED).map_err(PreparerError::SeedData)?;

        Ok(Hospital { id: None, ..parsed })
    }
}

impl Preparer for HospitalPreparer {
    fn check(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError> {
        let hospitals = ctx.require::<dyn Repository<Hospital>>()?;
        Ok(hospitals.get_all()?.is_empty())
    }

    fn execute(&mut self, ctx: &MigrationContext) -> Result<(), PreparerError> {
        let hospitals = ctx.require::<dyn Repository<Hospital>>()?;
        let id = hospitals.add_item(Self::seed_hospital()?)?;
        log::info!("Created demo hospital {}", id);
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
        let hospital = HospitalPreparer::seed_hospital().unwrap();

        assert!(hospital.id.is_none());
        assert_eq!(hospital.name, "Demo Hospital");
        assert!(hospital.theatre_count > 0);
        assert_eq!(hospital.wards.unwrap().len(), 2);
        assert!(!hospital.departments.unwrap().is_empty());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_seeds_once() {
        let hospitals: Arc<dyn Repository<Hospital>> = Arc::new(TransientRepository::new());
        let ctx = MigrationContext::default().with_attribute(Arc::clone(&hospitals));
        let mut preparer = HospitalPreparer;

        assert!(preparer.check(&ctx).unwrap());
        preparer.execute(&ctx).unwrap();
        assert!(preparer.validate(&ctx).unwrap());

        assert_eq!(hospitals.get_all().unwrap().len(), 1);
        assert!(!HospitalPreparer.check(&ctx).unwrap());
    }
}
