use docshift::migration::{MigrationError, PreparerRegistry};
use docshift::Parameters;
use docshift_migrate::plan;

#[test]
#[allow(clippy::expect_used)]
fn test_plan_follows_recorded_version() {
    let params = Parameters::new()
        .with("versions", "0.0.0 0.0.3 0.0.4")
        .with("migration.0.0.0", "")
        .with("migration.0.0.3", "region")
        .with("migration.0.0.4", "hospital_sub_item_id");
    let registry = PreparerRegistry::with_builtin();

    let planned = plan(&params, &registry, "0.0.4").expect("Failed to plan");
    let due: Vec<&str> = planned
        .iter()
        .filter(|v| v.due)
        .map(|v| v.version.as_str())
        .collect();

    assert_eq!(due, vec!["0.0.0", "0.0.4"]);
}

#[test]
#[allow(clippy::expect_used)]
fn test_plan_reports_missing_preparer_list() {
    let params = Parameters::new().with("versions", "0.0.5");
    let registry = PreparerRegistry::with_builtin();

    let planned = plan(&params, &registry, "0.0.0").expect("Failed to plan");

    assert!(matches!(
        &planned[0].preparers,
        Err(MigrationError::MissingPreparerList { version }) if version == "0.0.5"
    ));
}

#[test]
fn test_plan_without_versions() {
    let registry = PreparerRegistry::with_builtin();

    let result = plan(&Parameters::new(), &registry, "0.0.0");
    assert!(matches!(result, Err(MigrationError::MissingVersionList)));
}
