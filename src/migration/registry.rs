//! Preparer registry: identifier -> constructor
//!
//! Configuration names preparers by identifier (`migration.0.0.4 = "region"`).
//! The registry maps each identifier to a factory that builds a fresh
//! instance, and is populated once at program initialisation.

use crate::migration::{Preparer, PreparerError, ResolveError};
use std::collections::BTreeMap;

/// Constructor for a preparer instance
pub type PreparerFactory =
    Box<dyn Fn() -> Result<Box<dyn Preparer>, PreparerError> + Send + Sync>;

/// Registry of preparer factories, keyed by identifier
#[derive(Default)]
pub struct PreparerRegistry {
    factories: BTreeMap<String, PreparerFactory>,
}

impl std::fmt::Debug for PreparerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparerRegistry")
            .field("preparers", &self.names())
            .finish()
    }
}

impl PreparerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in preparers
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        crate::migration::preparers::register_all(&mut registry);
        registry
    }

    /// Register a factory under `name`
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::AlreadyRegistered` if `name` is taken.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), ResolveError>
    where
        F: Fn() -> Result<Box<dyn Preparer>, PreparerError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(ResolveError::AlreadyRegistered(name));
        }

        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Register a preparer type that is built with `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::AlreadyRegistered` if `name` is taken.
    pub fn register_default<P>(&mut self, name: impl Into<String>) -> Result<(), ResolveError>
    where
        P: Preparer + Default + 'static,
    {
        self.register(name, || Ok(Box::new(P::default()) as Box<dyn Preparer>))
    }

    /// Remove a factory
    ///
    /// Returns `true` if a factory was registered under `name`.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered identifiers, sorted
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build a fresh instance of the preparer registered under `name`
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::UnknownPreparer` if nothing is registered under
    /// `name`, or `ResolveError::Construction` if the factory fails.
    pub fn create(&self, name: &str) -> Result<Box<dyn Preparer>, ResolveError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ResolveError::UnknownPreparer(name.to_string()))?;

        factory().map_err(|error| ResolveError::Construction {
            preparer: name.to_string(),
            error,
        })
    }
}
