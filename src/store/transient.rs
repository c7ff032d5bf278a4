//! In-memory repository

use crate::store::repository::{insert, remove, replace};
use crate::store::{Entity, Repository, StoreError};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Repository that keeps its documents in memory
///
/// Nothing survives the process. Used in tests and as the default store for
/// services that do not need persistence.
#[derive(Debug)]
pub struct TransientRepository<T> {
    items: RwLock<Vec<T>>,
}

impl<T> Default for TransientRepository<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Entity> TransientRepository<T> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-filled with `items` (ids are assigned where missing)
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if two items share an id.
    pub fn with_items(items: impl IntoIterator<Item = T>) -> Result<Self, StoreError> {
        let repo = Self::new();
        for item in items {
            repo.add_item(item)?;
        }
        Ok(repo)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, StoreError> {
        self.items
            .read()
            .map_err(|e| StoreError::Poisoned(format!("{e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, StoreError> {
        self.items
            .write()
            .map_err(|e| StoreError::Poisoned(format!("{e}")))
    }
}

impl<T: Entity> Repository<T> for TransientRepository<T> {
    fn get_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.read()?.clone())
    }

    fn get_item(&self, id: &str) -> Result<Option<T>, StoreError> {
        Ok(self.read()?.iter().find(|item| item.id() == Some(id)).cloned())
    }

    fn add_item(&self, item: T) -> Result<String, StoreError> {
        let mut items = self.write()?;
        insert(&mut items, item)
    }

    fn update_item(&self, item: &T) -> Result<(), StoreError> {
        replace(&mut self.write()?, item)
    }

    fn remove_item(&self, id: &str) -> Result<bool, StoreError> {
        let mut items = self.write()?;
        Ok(remove(&mut items, id))
    }

    fn remove_all(&self) -> Result<(), StoreError> {
        self.write()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Option<String>,
        text: String,
    }

    impl Note {
        fn new(text: &str) -> Self {
            Self {
                id: None,
                text: text.to_string(),
            }
        }
    }

    impl Entity for Note {
        fn id(&self) -> Option<&str> {
            self.id.as_deref()
        }

        fn set_id(&mut self, id: String) {
            self.id = Some(id);
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_add_assigns_id() {
        let repo = TransientRepository::new();
        let id = repo.add_item(Note::new("first")).unwrap();

        let stored = repo.get_item(&id).unwrap().unwrap();
        assert_eq!(stored.id.as_deref(), Some(id.as_str()));
        assert_eq!(stored.text, "first");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_add_rejects_duplicate_id() {
        let repo = TransientRepository::new();
        let mut note = Note::new("a");
        note.set_id("fixed".to_string());
        repo.add_item(note.clone()).unwrap();

        let result = repo.add_item(note);
        assert!(matches!(result, Err(StoreError::Duplicate(id)) if id == "fixed"));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_update_and_remove() {
        let repo = TransientRepository::new();
        let id = repo.add_item(Note::new("draft")).unwrap();

        let mut note = repo.get_item(&id).unwrap().unwrap();
        note.text = "final".to_string();
        repo.update_item(&note).unwrap();
        assert_eq!(repo.get_item(&id).unwrap().unwrap().text, "final");

        assert!(repo.remove_item(&id).unwrap());
        assert!(!repo.remove_item(&id).unwrap());
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_unknown_document_fails() {
        let repo = TransientRepository::new();
        let mut note = Note::new("ghost");
        note.set_id("missing".to_string());

        assert!(matches!(
            repo.update_item(&note),
            Err(StoreError::NotFound(id)) if id == "missing"
        ));
    }
}
