//! Preparer trait definition

use crate::migration::{MigrationContext, PreparerError};

/// A unit of data migration work
///
/// Each version of the application declares the preparers that bring a store
/// written by an older version up to date. On every startup the driver runs,
/// for each due version, every configured preparer through three phases:
///
/// 1. [`check`](Preparer::check) decides whether the work is still needed.
/// 2. [`execute`](Preparer::execute) performs the mutation (only if `check`
///    returned `true`).
/// 3. [`validate`](Preparer::validate) confirms the mutation (only if
///    `execute` succeeded).
///
/// A fresh instance is created for every run, so a preparer may keep state
/// between its own phases (e.g. documents found during `check`).
///
/// There is no coordination between application instances. A preparer must
/// be safe to run repeatedly and concurrently with another instance running
/// the same migration: check for existence before creating, and write
/// idempotently.
///
/// After one successful pass, a subsequent `check` must return `false`.
pub trait Preparer: Send {
    /// Inspect the store and decide whether [`execute`](Preparer::execute) must run
    fn check(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError>;

    /// Perform the data mutation
    fn execute(&mut self, ctx: &MigrationContext) -> Result<(), PreparerError>;

    /// Confirm the mutation succeeded
    ///
    /// Most preparers implement this as `!check`.
    fn validate(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError>;
}
