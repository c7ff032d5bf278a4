//! # Docshift
//!
//! Versioned, fault-isolated data migration for document stores.
//!
//! An application declares content versions in configuration and, for each
//! version, the preparers that bring an older store up to date. On startup
//! [`DataMigration`] runs every due preparer, records the new content version
//! and marks the [`Core`] ready. See [`migration`] for the full flow.

pub mod config;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod migration;
pub mod preference;
pub mod readiness;
pub mod store;

pub use config::{MigrationConfig, Parameters};
pub use migration::{DataMigration, MigrationContext, MigrationReport, Preparer};
pub use readiness::Core;
