//! Process-wide readiness state
//!
//! [`Core`] holds the two things the rest of the application needs to know
//! about data migration: which content version the store is at, and whether
//! the system is ready to serve requests. It is created once at startup and
//! shared by `Arc` between the migration driver and the serving layer.

use crate::migration::driver::panic_message;
use crate::preference::PreferenceManager;
use crate::store::StoreError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// System preference name holding the current database content version
pub const PREFERENCE_DB_VERSION_NAME: &str = "database.content.version";

/// Version reported when the store has no recorded version
pub const DEFAULT_MIN_VERSION: &str = "0.0.0";

type DeferredTask = Box<dyn FnOnce() + Send>;

/// Readiness record: recorded store version plus the ready flag
pub struct Core {
    ready: AtomicBool,
    preferences: PreferenceManager,
    min_version: String,
    deferred: Mutex<Vec<DeferredTask>>,
}

impl std::fmt::Debug for Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("ready", &self.is_ready())
            .field("min_version", &self.min_version)
            .finish_non_exhaustive()
    }
}

impl Core {
    /// Create a core that is not ready yet
    ///
    /// `min_version` is reported by [`Core::get_current_database_version`]
    /// while the store has no recorded version.
    pub fn new(preferences: PreferenceManager, min_version: impl Into<String>) -> Self {
        Self {
            ready: AtomicBool::new(false),
            preferences,
            min_version: min_version.into(),
            deferred: Mutex::new(Vec::new()),
        }
    }

    pub fn preferences(&self) -> &PreferenceManager {
        &self.preferences
    }

    pub fn min_version(&self) -> &str {
        &self.min_version
    }

    /// Get the recorded content version of the store
    ///
    /// Falls back to the minimum version when nothing is recorded or the
    /// preference cannot be read (the failure is logged).
    pub fn get_current_database_version(&self) -> String {
        match self.preferences.get_system_preference(PREFERENCE_DB_VERSION_NAME) {
            Ok(Some(version)) => version,
            Ok(None) => self.min_version.clone(),
            Err(e) => {
                log::error!("Error when retrieving the database version: {}", e);
                self.min_version.clone()
            }
        }
    }

    /// Record a new content version for the store
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the preference cannot be written.
    pub fn set_database_version(&self, version: &str) -> Result<(), StoreError> {
        self.preferences
            .set_system_preference(PREFERENCE_DB_VERSION_NAME, version)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Set the ready flag
    ///
    /// Switching to ready runs every task queued by
    /// [`Core::defer_until_ready`], in submission order.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
        if !ready {
            return;
        }

        log::info!("System ready to receive and process requests");

        let tasks = match self.deferred.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        if !tasks.is_empty() {
            log::debug!("Running {} task(s) deferred until ready", tasks.len());
        }
        for task in tasks {
            run_deferred(task);
        }
    }

    /// Run `task` once the system is ready
    ///
    /// Runs immediately if the system is already ready, otherwise queues it.
    pub fn defer_until_ready(&self, task: impl FnOnce() + Send + 'static) {
        {
            let mut queue = match self.deferred.lock() {
                Ok(queue) => queue,
                Err(poisoned) => poisoned.into_inner(),
            };
            // Checked under the queue lock so a concurrent `set_ready(true)`
            // either drains this task or we see the flag.
            if !self.is_ready() {
                log::debug!("System not ready, deferring task");
                queue.push(Box::new(task));
                return;
            }
        }
        run_deferred(Box::new(task));
    }
}

/// Run one deferred task; a panic is logged and does not reach the caller
fn run_deferred(task: DeferredTask) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
        log::error!("Deferred task panicked: {}", panic_message(payload.as_ref()));
    }
}
