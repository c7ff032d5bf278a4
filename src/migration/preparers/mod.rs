//! Built-in preparers
//!
//! | Identifier | Preparer |
//! |---|---|
//! | `database_version` | [`DatabaseVersionPreparer`] |
//! | `region` | [`RegionPreparer`] |
//! | `hospital` | [`HospitalPreparer`] |
//! | `hospital_sub_item_id` | [`HospitalSubItemIdPreparer`] |
//!
//! [`DummyPreparer`] is not registered by default; register it with a
//! [`DummyProbe`] to observe which phases the driver called.

mod database_version;
mod dummy;
mod hospital;
mod hospital_sub_item_id;
mod region;

pub use database_version::DatabaseVersionPreparer;
pub use dummy::{DummyBehaviour, DummyPreparer, DummyProbe};
pub use hospital::{HospitalPreparer, HOSPITAL_SEED};
pub use hospital_sub_item_id::HospitalSubItemIdPreparer;
pub use region::{RegionPreparer, REGION_SEED};

use crate::migration::PreparerRegistry;

pub const DATABASE_VERSION: &str = "database_version";
pub const REGION: &str = "region";
pub const HOSPITAL: &str = "hospital";
pub const HOSPITAL_SUB_ITEM_ID: &str = "hospital_sub_item_id";

/// Register every built-in preparer
///
/// Identifiers that are already taken are left alone (and logged).
pub fn register_all(registry: &mut PreparerRegistry) {
    let results = [
        registry.register_default::<DatabaseVersionPreparer>(DATABASE_VERSION),
        registry.register_default::<RegionPreparer>(REGION),
        registry.register_default::<HospitalPreparer>(HOSPITAL),
        registry.register_default::<HospitalSubItemIdPreparer>(HOSPITAL_SUB_ITEM_ID),
    ];

    for result in results {
        if let Err(e) = result {
            log::warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_identifiers() {
        let registry = PreparerRegistry::with_builtin();

        assert_eq!(
            registry.names(),
            vec![DATABASE_VERSION, HOSPITAL, HOSPITAL_SUB_ITEM_ID, REGION]
        );
    }

    #[test]
    fn test_register_all_keeps_existing_entries() {
        let mut registry = PreparerRegistry::new();
        assert!(registry.register_default::<DummyPreparer>(REGION).is_ok());

        register_all(&mut registry);
        assert_eq!(registry.len(), 4);
    }
}
