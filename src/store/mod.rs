//! Document store consumed by migration preparers
//!
//! The store is small: a [`Repository`] per document type, an
//! in-memory implementation for tests and services without persistence, and
//! a JSON-file implementation used by the `docshift-migrate` tool.

pub mod domain;
pub mod error;
pub mod file;
pub mod repository;
pub mod transient;

pub use domain::{Department, Hospital, Region, SpecialistType, SubElement, UrgencyCategory, Ward};
pub use error::StoreError;
pub use file::JsonFileRepository;
pub use repository::{Entity, Repository};
pub use transient::TransientRepository;
