use crate::migration::{MigrationContext, Preparer, PreparerError};
use crate::store::{Hospital, Region, Repository, SubElement};
use std::sync::Arc;

/// Gives every hospital and region sub-element its own id
///
/// Urgency categories (regions and hospitals), departments, wards and
/// specialist types written before sub-element ids existed have none; this
/// preparer assigns a fresh UUID to each and updates the owning document.
///
/// Requires `Arc<dyn Repository<Region>>` and `Arc<dyn Repository<Hospital>>`
/// in the migration context.
#[derive(Debug, Default)]
pub struct HospitalSubItemIdPreparer;

/// Whether any element in the (optional) list lacks an id
fn missing_ids<E: SubElement>(elements: Option<&Vec<E>>) -> bool {
    elements.map_or(false, |list| list.iter().any(|el| el.id().is_none()))
}

/// Assign ids where missing; returns whether anything changed
fn fill_ids<E: SubElement>(elements: Option<&mut Vec<E>>) -> bool {
    let mut changed = false;
    for el in elements.into_iter().flatten() {
        if el.id().is_none() {
            el.set_id(uuid::Uuid::new_v4().to_string());
            changed = true;
        }
    }
    changed
}

fn hospital_needs_ids(hospital: &Hospital) -> bool {
    missing_ids(hospital.urgency_categories.as_ref())
        || missing_ids(hospital.departments.as_ref())
        || missing_ids(hospital.wards.as_ref())
        || missing_ids(hospital.specialist_types.as_ref())
}

fn fix_hospital(hospital: &mut Hospital) -> bool {
    // Non-short-circuiting: every list must be filled.
    let categories = fill_ids(hospital.urgency_categories.as_mut());
    let specialists = fill_ids(hospital.specialist_types.as_mut());
    let wards = fill_ids(hospital.wards.as_mut());
    let departments = fill_ids(hospital.departments.as_mut());
    categories || specialists || wards || departments
}

impl HospitalSubItemIdPreparer {
    fn repositories(
        ctx: &MigrationContext,
    ) -> Result<(Arc<dyn Repository<Region>>, Arc<dyn Repository<Hospital>>), PreparerError> {
        Ok((
            ctx.require::<dyn Repository<Region>>()?,
            ctx.require::<dyn Repository<Hospital>>()?,
        ))
    }
}

impl Preparer for HospitalSubItemIdPreparer {
    fn check(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError> {
        let (regions, hospitals) = Self::repositories(ctx)?;

        if regions
            .get_all()?
            .iter()
            .any(|region| missing_ids(region.urgency_categories.as_ref()))
        {
            return Ok(true);
        }

        Ok(hospitals.get_all()?.iter().any(hospital_needs_ids))
    }

    fn execute(&mut self, ctx: &MigrationContext) -> Result<(), PreparerError> {
        let (regions, hospitals) = Self::repositories(ctx)?;

        for mut hospital in hospitals.get_all()? {
            if fix_hospital(&mut hospital) {
                hospitals.update_item(&hospital)?;
            }
        }

        for mut region in regions.get_all()? {
            if fill_ids(region.urgency_categories.as_mut()) {
                regions.update_item(&region)?;
            }
        }

        Ok(())
    }

    fn validate(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError> {
        Ok(!self.check(ctx)?)
    }
}
