//! Configurable no-op preparer for exercising the driver

use crate::migration::{MigrationContext, Preparer, PreparerError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// How a [`DummyPreparer`] behaves in each phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyBehaviour {
    /// Value returned by `check`
    pub check_result: bool,
    /// Value returned by `validate`
    pub validate_result: bool,
    pub check_error: bool,
    pub execute_error: bool,
    pub validate_error: bool,
    /// Panic (instead of returning an error) in `execute`
    pub execute_panic: bool,
}

impl Default for DummyBehaviour {
    fn default() -> Self {
        Self {
            check_result: true,
            validate_result: true,
            check_error: false,
            execute_error: false,
            validate_error: false,
            execute_panic: false,
        }
    }
}

/// Shared record of which phases ran, across every instance built with it
#[derive(Debug, Default)]
pub struct DummyProbe {
    instances: AtomicUsize,
    checks: AtomicUsize,
    executes: AtomicUsize,
    validates: AtomicUsize,
}

impl DummyProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn instances(&self) -> usize {
        self.instances.load(Ordering::SeqCst)
    }

    pub fn check_count(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn execute_count(&self) -> usize {
        self.executes.load(Ordering::SeqCst)
    }

    pub fn validate_count(&self) -> usize {
        self.validates.load(Ordering::SeqCst)
    }

    pub fn is_check_executed(&self) -> bool {
        self.check_count() > 0
    }

    pub fn is_execute_executed(&self) -> bool {
        self.execute_count() > 0
    }

    pub fn is_validate_executed(&self) -> bool {
        self.validate_count() > 0
    }
}

/// Preparer that does nothing but report the configured results
///
/// If the migration context carries an `Arc<DummyBehaviour>` attribute, it
/// overrides the behaviour given at construction.
#[derive(Debug, Default)]
pub struct DummyPreparer {
    behaviour: DummyBehaviour,
    probe: Arc<DummyProbe>,
}

impl DummyPreparer {
    pub fn new(behaviour: DummyBehaviour, probe: Arc<DummyProbe>) -> Self {
        probe.instances.fetch_add(1, Ordering::SeqCst);
        Self { behaviour, probe }
    }

    pub fn probe(&self) -> &Arc<DummyProbe> {
        &self.probe
    }

    fn behaviour(&self, ctx: &MigrationContext) -> DummyBehaviour {
        ctx.attribute::<DummyBehaviour>()
            .map(|b| *b)
            .unwrap_or(self.behaviour)
    }
}

impl Preparer for DummyPreparer {
    fn check(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError> {
        self.probe.checks.fetch_add(1, Ordering::SeqCst);

        let behaviour = self.behaviour(ctx);
        if behaviour.check_error {
            return Err(PreparerError::Failed("Check Exception".to_string()));
        }
        Ok(behaviour.check_result)
    }

    fn execute(&mut self, ctx: &MigrationContext) -> Result<(), PreparerError> {
        self.probe.executes.fetch_add(1, Ordering::SeqCst);

        let behaviour = self.behaviour(ctx);
        if behaviour.execute_panic {
            panic!("Execute Panic");
        }
        if behaviour.execute_error {
            return Err(PreparerError::Failed("Execute Exception".to_string()));
        }
        Ok(())
    }

    fn validate(&mut self, ctx: &MigrationContext) -> Result<bool, PreparerError> {
        self.probe.validates.fetch_add(1, Ordering::SeqCst);

        let behaviour = self.behaviour(ctx);
        if behaviour.validate_error {
            return Err(PreparerError::Failed("Validate Exception".to_string()));
        }
        Ok(behaviour.validate_result)
    }
}
