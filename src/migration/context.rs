//! Context handed to every preparer phase

use crate::config::Parameters;
use crate::migration::PreparerError;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Configuration parameters plus the shared services preparers work against
///
/// Services are stored by type, usually as trait objects:
///
/// ```rust
/// use std::sync::Arc;
/// use docshift::config::Parameters;
/// use docshift::migration::MigrationContext;
/// use docshift::store::{Region, Repository, TransientRepository};
///
/// let mut ctx = MigrationContext::new(Parameters::new());
/// let regions: Arc<dyn Repository<Region>> = Arc::new(TransientRepository::new());
/// ctx.set_attribute(regions);
///
/// assert!(ctx.attribute::<dyn Repository<Region>>().is_some());
/// ```
#[derive(Default)]
pub struct MigrationContext {
    parameters: Parameters,
    attributes: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for MigrationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationContext")
            .field("parameters", &self.parameters)
            .field("attributes", &self.attributes.len())
            .finish()
    }
}

impl MigrationContext {
    pub fn new(parameters: Parameters) -> Self {
        Self {
            parameters,
            attributes: HashMap::new(),
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    /// Register a shared service, replacing any previous one of the same type
    pub fn set_attribute<T>(&mut self, value: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.attributes.insert(TypeId::of::<Arc<T>>(), Box::new(value));
    }

    /// Builder form of [`MigrationContext::set_attribute`]
    pub fn with_attribute<T>(mut self, value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.set_attribute(value);
        self
    }

    /// Look up a shared service by type
    pub fn attribute<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.attributes
            .get(&TypeId::of::<Arc<T>>())
            .and_then(|value| value.downcast_ref::<Arc<T>>())
            .cloned()
    }

    /// Look up a shared service, failing with [`PreparerError::MissingAttribute`]
    pub fn require<T>(&self) -> Result<Arc<T>, PreparerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.attribute::<T>()
            .ok_or(PreparerError::MissingAttribute(std::any::type_name::<T>()))
    }

    pub fn remove_attribute<T>(&mut self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.attributes
            .remove(&TypeId::of::<Arc<T>>())
            .and_then(|value| value.downcast::<Arc<T>>().ok())
            .map(|value| *value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_trait_object_attribute() {
        let greeter: Arc<dyn Greeter> = Arc::new(English);
        let ctx = MigrationContext::default().with_attribute(greeter);

        let found = ctx.attribute::<dyn Greeter>();
        assert_eq!(found.map(|g| g.greet()).as_deref(), Some("hello"));
    }

    #[test]
    fn test_concrete_and_trait_object_keys_differ() {
        let ctx = MigrationContext::default().with_attribute(Arc::new(English));

        assert!(ctx.attribute::<English>().is_some());
        assert!(ctx.attribute::<dyn Greeter>().is_none());
    }

    #[test]
    fn test_require_reports_missing_type() {
        let ctx = MigrationContext::default();

        match ctx.require::<dyn Greeter>() {
            Err(PreparerError::MissingAttribute(name)) => assert!(name.contains("Greeter")),
            other => panic!("expected missing attribute, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_remove_attribute() {
        let mut ctx = MigrationContext::default().with_attribute(Arc::new(42u32));

        assert_eq!(ctx.remove_attribute::<u32>().as_deref(), Some(&42));
        assert!(ctx.attribute::<u32>().is_none());
    }
}
