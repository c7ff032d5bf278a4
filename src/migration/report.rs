//! Outcome of a migration run
//!
//! The driver swallows every failure so that startup is never blocked; the
//! report is how callers and tests see what actually happened.

use crate::migration::{MigrationError, PreparerError, ResolveError};
use chrono::{DateTime, Utc};

/// What happened to a single configured preparer
#[derive(Debug)]
pub enum PreparerOutcome {
    /// The identifier did not resolve to an instance; no phase ran
    Unresolved(ResolveError),
    /// `check` failed; nothing else ran
    CheckFailed(PreparerError),
    /// `check` returned `false`; the work was already done
    NotNeeded,
    /// `execute` failed; `validate` did not run
    ExecuteFailed(PreparerError),
    /// `validate` failed
    ValidateFailed(PreparerError),
    /// `validate` returned `false`; the work appears incomplete
    Incomplete,
    /// All three phases ran and `validate` returned `true`
    Completed,
}

impl PreparerOutcome {
    /// Whether this outcome is a failure worth reporting
    pub fn is_failure(&self) -> bool {
        !matches!(self, PreparerOutcome::NotNeeded | PreparerOutcome::Completed)
    }

    /// Short label used for logging and metrics
    pub fn label(&self) -> &'static str {
        match self {
            PreparerOutcome::Unresolved(_) => "unresolved",
            PreparerOutcome::CheckFailed(_) => "check_failed",
            PreparerOutcome::NotNeeded => "not_needed",
            PreparerOutcome::ExecuteFailed(_) => "execute_failed",
            PreparerOutcome::ValidateFailed(_) => "validate_failed",
            PreparerOutcome::Incomplete => "incomplete",
            PreparerOutcome::Completed => "completed",
        }
    }
}

impl std::fmt::Display for PreparerOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreparerOutcome::Unresolved(e) => write!(f, "unresolved: {}", e),
            PreparerOutcome::CheckFailed(e) => write!(f, "check failed: {}", e),
            PreparerOutcome::NotNeeded => write!(f, "not needed"),
            PreparerOutcome::ExecuteFailed(e) => write!(f, "execution failed: {}", e),
            PreparerOutcome::ValidateFailed(e) => write!(f, "validation failed: {}", e),
            PreparerOutcome::Incomplete => write!(f, "validation returned false"),
            PreparerOutcome::Completed => write!(f, "completed"),
        }
    }
}

/// Record of one preparer slot within a version
#[derive(Debug)]
pub struct PreparerReport {
    /// Configured identifier
    pub name: String,
    pub outcome: PreparerOutcome,
    /// Time spent in the phases, in milliseconds
    pub execution_time_ms: i64,
}

/// Record of one declared version
#[derive(Debug)]
pub struct VersionReport {
    pub version: String,
    /// `false` when the version was older than the recorded version and skipped
    pub processed: bool,
    /// Set when the version has no preparer list configured
    pub error: Option<MigrationError>,
    pub preparers: Vec<PreparerReport>,
}

impl VersionReport {
    pub(crate) fn skipped(version: &str) -> Self {
        Self {
            version: version.to_string(),
            processed: false,
            error: None,
            preparers: Vec::new(),
        }
    }
}

/// Record of a whole migration run
#[derive(Debug)]
pub struct MigrationReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Recorded version at the start; `None` when the run was a no-op
    pub starting_version: Option<String>,
    /// Version written at the end; `None` when nothing was written
    pub final_version: Option<String>,
    /// Run-level errors (version list, recording the final version)
    pub errors: Vec<MigrationError>,
    /// Declared versions in processing order
    pub versions: Vec<VersionReport>,
}

impl MigrationReport {
    pub(crate) fn started() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            starting_version: None,
            final_version: None,
            errors: Vec::new(),
            versions: Vec::new(),
        }
    }

    /// Whether the run finished without any error of any kind
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
            && self.versions.iter().all(|v| v.error.is_none())
            && self.preparers().all(|(_, p)| !p.outcome.is_failure())
    }

    /// Every preparer slot with its version, in processing order
    pub fn preparers(&self) -> impl Iterator<Item = (&str, &PreparerReport)> {
        self.versions
            .iter()
            .flat_map(|v| v.preparers.iter().map(move |p| (v.version.as_str(), p)))
    }

    /// Preparer slots that failed, with their version
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PreparerReport)> {
        self.preparers().filter(|(_, p)| p.outcome.is_failure())
    }

    /// First slot configured under `name` (in processing order)
    pub fn preparer(&self, name: &str) -> Option<&PreparerReport> {
        self.preparers().map(|(_, p)| p).find(|p| p.name == name)
    }

    pub fn version(&self, version: &str) -> Option<&VersionReport> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Number of preparers whose work was completed and validated
    pub fn completed_count(&self) -> usize {
        self.preparers()
            .filter(|(_, p)| matches!(p.outcome, PreparerOutcome::Completed))
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Number of versions whose preparers were considered
    pub fn processed_count(&self) -> usize {
        self.versions.iter().filter(|v| v.processed).count()
    }

    /// Run duration in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(outcomes: Vec<(&str, PreparerOutcome)>) -> MigrationReport {
        let mut report = MigrationReport::started();
        report.versions.push(VersionReport {
            version: "0.0.4".to_string(),
            processed: true,
            error: None,
            preparers: outcomes
                .into_iter()
                .map(|(name, outcome)| PreparerReport {
                    name: name.to_string(),
                    outcome,
                    execution_time_ms: 0,
                })
                .collect(),
        });
        report
    }

    #[test]
    fn test_clean_report() {
        let report = report_with(vec![
            ("a", PreparerOutcome::Completed),
            ("b", PreparerOutcome::NotNeeded),
        ]);

        assert!(report.is_clean());
        assert_eq!(report.completed_count(), 1);
        assert_eq!(report.failure_count(), 0);
    }

    #[test]
    fn test_failures_are_listed_with_version() {
        let report = report_with(vec![
            ("a", PreparerOutcome::Incomplete),
            ("b", PreparerOutcome::Completed),
            (
                "c",
                PreparerOutcome::Unresolved(ResolveError::UnknownPreparer("c".to_string())),
            ),
        ]);

        let failed: Vec<(&str, &str)> = report
            .failures()
            .map(|(version, p)| (version, p.name.as_str()))
            .collect();
        assert_eq!(failed, vec![("0.0.4", "a"), ("0.0.4", "c")]);
        assert!(!report.is_clean());
        assert_eq!(report.preparer("c").map(|p| p.outcome.label()), Some("unresolved"));
    }

    #[test]
    fn test_run_level_error_is_not_clean() {
        let mut report = MigrationReport::started();
        report.errors.push(MigrationError::EmptyVersionList);

        assert!(!report.is_clean());
        assert_eq!(report.processed_count(), 0);
    }
}
