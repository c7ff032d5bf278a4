//! Docshift Migration Library
//!
//! Support code for the `docshift-migrate` CLI tool (main.rs): opening the
//! JSON-file store and planning a run without executing any preparer.

pub mod data_dir;
pub mod plan;

pub use data_dir::DataDir;
pub use plan::{plan, PlannedPreparer, PlannedVersion};
