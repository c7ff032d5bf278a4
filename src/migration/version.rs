//! Version labels and the ordered set of declared versions
//!
//! Labels are opaque strings compared lexicographically, NOT as semantic
//! versions: `"0.0.10"` sorts before `"0.0.9"`.

use crate::migration::MigrationError;
use std::collections::BTreeSet;

/// Version whose preparers run on every migration pass
pub const ALWAYS_VERSION: &str = "0.0.0";

/// Opaque version label, ordered as a plain string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionLabel(String);

impl VersionLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the always-run sentinel version
    pub fn is_always(&self) -> bool {
        self.0 == ALWAYS_VERSION
    }

    /// Whether this version must be processed given the recorded version
    ///
    /// A version is due when it is not older than `current`, or when it is
    /// the always-run sentinel.
    pub fn is_due(&self, current: &str) -> bool {
        self.0.as_str() >= current || self.is_always()
    }
}

impl std::fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VersionLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VersionLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Unique version labels in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRegistry {
    versions: BTreeSet<VersionLabel>,
}

impl VersionRegistry {
    /// Build the registry from the raw `versions` parameter
    ///
    /// Tokens are whitespace-delimited; duplicates collapse.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::MissingVersionList` when the parameter is not
    /// configured and `MigrationError::EmptyVersionList` when it is blank.
    pub fn parse(raw: Option<&str>) -> Result<Self, MigrationError> {
        let raw = raw.ok_or(MigrationError::MissingVersionList)?;
        if raw.trim().is_empty() {
            return Err(MigrationError::EmptyVersionList);
        }

        Ok(raw.split_whitespace().collect())
    }

    /// Iterate versions in ascending lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &VersionLabel> {
        self.versions.iter()
    }

    /// Versions that must be processed given the recorded version, ascending
    pub fn due(&self, current: &str) -> impl Iterator<Item = &VersionLabel> + '_ {
        let current = current.to_string();
        self.versions.iter().filter(move |v| v.is_due(&current))
    }

    /// Highest declared version
    pub fn latest(&self) -> Option<&VersionLabel> {
        self.versions.iter().next_back()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for VersionRegistry {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            versions: iter.into_iter().map(VersionLabel::from).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a VersionRegistry {
    type Item = &'a VersionLabel;
    type IntoIter = std::collections::btree_set::Iter<'a, VersionLabel>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}
