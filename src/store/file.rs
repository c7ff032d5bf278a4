//! JSON-file backed repository

use crate::store::repository::{insert, remove, replace};
use crate::store::{Entity, Repository, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Repository that persists its collection as a JSON array in one file
///
/// Every mutation re-reads the file, applies the change and rewrites the whole
/// collection. A missing file is an empty collection. Writes go to a sibling
/// temporary file first and are then renamed over the original.
#[derive(Debug)]
pub struct JsonFileRepository<T> {
    path: PathBuf,
    guard: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    /// Create a repository backed by the file at `path`
    ///
    /// The file is not touched until the first read or write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<T>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn save(&self, items: &[T]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Run `f` against the loaded collection and persist the result
    fn modify<R>(&self, f: impl FnOnce(&mut Vec<T>) -> Result<R, StoreError>) -> Result<R, StoreError> {
        let _guard = self
            .guard
            .lock()
            .map_err(|e| StoreError::Poisoned(format!("{e}")))?;

        let mut items = self.load()?;
        let result = f(&mut items)?;
        self.save(&items)?;
        Ok(result)
    }
}

impl<T> Repository<T> for JsonFileRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    fn get_all(&self) -> Result<Vec<T>, StoreError> {
        self.load()
    }

    fn get_item(&self, id: &str) -> Result<Option<T>, StoreError> {
        Ok(self.load()?.into_iter().find(|item| item.id() == Some(id)))
    }

    fn add_item(&self, item: T) -> Result<String, StoreError> {
        self.modify(|items| insert(items, item))
    }

    fn update_item(&self, item: &T) -> Result<(), StoreError> {
        self.modify(|items| replace(items, item))
    }

    fn remove_item(&self, id: &str) -> Result<bool, StoreError> {
        self.modify(|items| Ok(remove(items, id)))
    }

    fn remove_all(&self) -> Result<(), StoreError> {
        self.modify(|items| {
            items.clear();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::domain::Region;
    use tempfile::TempDir;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let repo: JsonFileRepository<Region> = JsonFileRepository::new(dir.path().join("regions.json"));

        assert!(repo.get_all().unwrap().is_empty());
        assert!(!repo.path().exists());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_documents_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("regions.json");

        let id = {
            let repo: JsonFileRepository<Region> = JsonFileRepository::new(&path);
            repo.add_item(Region::new("Metro North")).unwrap()
        };

        let reopened: JsonFileRepository<Region> = JsonFileRepository::new(&path);
        let region = reopened.get_item(&id).unwrap().unwrap();
        assert_eq!(region.name, "Metro North");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("regions.json");
        std::fs::write(&path, "{not json").unwrap();

        let repo: JsonFileRepository<Region> = JsonFileRepository::new(&path);
        assert!(matches!(repo.get_all(), Err(StoreError::Serialization(_))));
    }
}
