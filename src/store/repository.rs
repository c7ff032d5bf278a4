//! Repository contract shared by every document collection

use crate::store::StoreError;

/// A document that can be stored in a [`Repository`]
///
/// Documents carry an optional string id. Documents without an id get a
/// fresh UUID when they are added to a repository.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Get the document id, if one has been assigned
    fn id(&self) -> Option<&str>;

    /// Assign the document id
    fn set_id(&mut self, id: String);
}

/// Collection of documents of a single type
///
/// Implementations use interior mutability so a repository can be shared
/// (behind an `Arc`) between the migration run and the serving layer.
pub trait Repository<T: Entity>: Send + Sync {
    /// Return every document in insertion order
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get_all(&self) -> Result<Vec<T>, StoreError>;

    /// Return the document with the given id
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get_item(&self, id: &str) -> Result<Option<T>, StoreError>;

    /// Add a document, assigning an id when it has none
    ///
    /// # Returns
    ///
    /// Returns the id under which the document was stored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if a document with the same id exists.
    fn add_item(&self, item: T) -> Result<String, StoreError>;

    /// Replace a stored document with the given one (matched by id)
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the document has no id or is unknown.
    fn update_item(&self, item: &T) -> Result<(), StoreError>;

    /// Remove the document with the given id
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if a document was removed, `Ok(false)` if none matched.
    fn remove_item(&self, id: &str) -> Result<bool, StoreError>;

    /// Remove every document
    fn remove_all(&self) -> Result<(), StoreError>;
}

/// Generate a fresh document id
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Insert `item` into `items`, assigning an id when it has none
pub(crate) fn insert<T: Entity>(items: &mut Vec<T>, mut item: T) -> Result<String, StoreError> {
    let id = match item.id() {
        Some(id) => id.to_string(),
        None => {
            let id = new_id();
            item.set_id(id.clone());
            id
        }
    };

    if items.iter().any(|existing| existing.id() == Some(id.as_str())) {
        return Err(StoreError::Duplicate(id));
    }

    items.push(item);
    Ok(id)
}

/// Replace the document in `items` that shares `item`'s id
pub(crate) fn replace<T: Entity>(items: &mut [T], item: &T) -> Result<(), StoreError> {
    let id = item
        .id()
        .ok_or_else(|| StoreError::NotFound("<unassigned>".to_string()))?;

    let slot = items
        .iter_mut()
        .find(|existing| existing.id() == Some(id))
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    *slot = item.clone();
    Ok(())
}

/// Remove the document with `id` from `items`
pub(crate) fn remove<T: Entity>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|existing| existing.id() != Some(id));
    items.len() != before
}
