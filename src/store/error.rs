//! Store-specific error types

/// Errors raised by document repositories
#[derive(Debug)]
pub enum StoreError {
    /// No document with the given id exists
    NotFound(String),
    /// A document with the given id already exists
    Duplicate(String),
    /// Reading or writing the backing file failed
    Io(std::io::Error),
    /// A document could not be (de)serialized
    Serialization(serde_json::Error),
    /// The repository lock was poisoned by a panicking writer
    Poisoned(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Document not found: {}", id),
            StoreError::Duplicate(id) => write!(f, "Document already exists: {}", id),
            StoreError::Io(e) => write!(f, "Store I/O error: {}", e),
            StoreError::Serialization(e) => write!(f, "Document serialization error: {}", e),
            StoreError::Poisoned(msg) => write!(f, "Repository lock poisoned: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        StoreError::Io(error)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Serialization(error)
    }
}
