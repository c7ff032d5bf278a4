//! Versioned data migration
//!
//! On every startup the [`DataMigration`] driver compares the store's
//! recorded content version with the versions declared in configuration and
//! runs the [`Preparer`]s of every due version:
//!
//! - [`VersionRegistry`] parses and orders the declared versions
//! - [`PreparerResolver`] turns `migration.<version>` lists into instances
//!   through a [`PreparerRegistry`]
//! - [`DataMigration`] drives each preparer through check/execute/validate,
//!   isolating failures, then records the final version and marks the
//!   [`Core`](crate::readiness::Core) ready
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use docshift::config::Parameters;
//! use docshift::migration::{startup_migration, MigrationContext};
//! use docshift::preference::PreferenceManager;
//! use docshift::readiness::Core;
//! use docshift::store::{Hospital, Region, Repository, TransientRepository};
//!
//! let params = Parameters::new()
//!     .with("versions", "0.0.4")
//!     .with("migration.0.0.4", "database_version region hospital hospital_sub_item_id");
//!
//! let core = Arc::new(Core::new(PreferenceManager::default(), "0.0.0"));
//! let regions: Arc<dyn Repository<Region>> = Arc::new(TransientRepository::new());
//! let hospitals: Arc<dyn Repository<Hospital>> = Arc::new(TransientRepository::new());
//! let ctx = MigrationContext::new(params)
//!     .with_attribute(Arc::clone(&core))
//!     .with_attribute(regions)
//!     .with_attribute(hospitals);
//!
//! let report = startup_migration(&core, &ctx);
//! assert!(core.is_ready());
//! assert_eq!(report.final_version.as_deref(), Some("0.0.4"));
//! ```

pub mod context;
pub mod driver;
pub mod error;
pub mod preparer;
pub mod preparers;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod startup;
pub mod version;

pub use context::MigrationContext;
pub use driver::DataMigration;
pub use error::{MigrationError, PreparerError, ResolveError};
pub use preparer::Preparer;
pub use registry::{PreparerFactory, PreparerRegistry};
pub use report::{MigrationReport, PreparerOutcome, PreparerReport, VersionReport};
pub use resolver::{PreparerResolver, ResolvedPreparer};
pub use startup::{startup_migration, startup_migration_with};
pub use version::{VersionLabel, VersionRegistry, ALWAYS_VERSION};
