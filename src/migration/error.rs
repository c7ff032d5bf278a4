//! Migration-specific error types
//!
//! The driver never propagates any of these: each is logged and recorded in
//! the [`MigrationReport`](crate::migration::MigrationReport) of the run.

use crate::store::StoreError;

/// Failure raised by a preparer phase (`check`, `execute` or `validate`)
#[derive(Debug)]
pub enum PreparerError {
    /// Document store error
    Store(StoreError),
    /// A service the preparer needs is not present in the migration context
    MissingAttribute(&'static str),
    /// Bundled seed data could not be parsed
    SeedData(serde_json::Error),
    /// The phase panicked; the payload message is preserved
    Panicked(String),
    /// Any other failure
    Failed(String),
}

impl std::fmt::Display for PreparerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreparerError::Store(e) => write!(f, "Store error: {}", e),
            PreparerError::MissingAttribute(name) => {
                write!(f, "Migration context does not provide {}", name)
            }
            PreparerError::SeedData(e) => write!(f, "Invalid seed data: {}", e),
            PreparerError::Panicked(msg) => write!(f, "Preparer panicked: {}", msg),
            PreparerError::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PreparerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreparerError::Store(e) => Some(e),
            PreparerError::SeedData(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for PreparerError {
    fn from(error: StoreError) -> Self {
        PreparerError::Store(error)
    }
}

/// Failure to turn a configured preparer identifier into an instance
#[derive(Debug)]
pub enum ResolveError {
    /// No factory is registered under the identifier
    UnknownPreparer(String),
    /// A factory is already registered under the identifier
    AlreadyRegistered(String),
    /// The factory itself failed
    Construction { preparer: String, error: PreparerError },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::UnknownPreparer(name) => write!(
                f,
                "Preparer '{}' is not a registered database preparer",
                name
            ),
            ResolveError::AlreadyRegistered(name) => {
                write!(f, "Preparer '{}' is already registered", name)
            }
            ResolveError::Construction { preparer, error } => {
                write!(f, "Preparer '{}' could not be created: {}", preparer, error)
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Construction { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Run-level configuration and bookkeeping errors
#[derive(Debug)]
pub enum MigrationError {
    /// The `versions` parameter is not configured
    MissingVersionList,
    /// The `versions` parameter is configured but blank
    EmptyVersionList,
    /// A declared version has no `migration.<version>` entry (not even an empty one)
    MissingPreparerList { version: String },
    /// The final version could not be recorded
    VersionUpdate { version: String, error: StoreError },
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::MissingVersionList => {
                write!(f, "Configuration doesn't contain a list of versions")
            }
            MigrationError::EmptyVersionList => {
                write!(f, "'versions' parameter is set to empty string: ''")
            }
            MigrationError::MissingPreparerList { version } => write!(
                f,
                "Configuration specifies version {}, but doesn't specify a preparer list (even an empty one)",
                version
            ),
            MigrationError::VersionUpdate { version, error } => write!(
                f,
                "Failed to record database version {}: {}",
                version, error
            ),
        }
    }
}

impl std::error::Error for MigrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MigrationError::VersionUpdate { error, .. } => Some(error),
            _ => None,
        }
    }
}
