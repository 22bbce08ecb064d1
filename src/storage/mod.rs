//! Project persistence
//!
//! Projects are stored whole: `load` returns a complete [`ProjectState`] and
//! `save` replaces it. Each project lives under its own key in a string
//! key-value store, serialized as JSON so correction indices round-trip as
//! object keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::ProjectState;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

/// Storage failures reported by repositories
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Stored data exists but cannot be decoded
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Raw string key-value storage (localStorage, a directory, memory)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Returns whether the key existed
    fn remove(&mut self, key: &str) -> Result<bool>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// Whole-project load/replace persistence
pub trait ProjectRepository {
    fn load(&self, id: &str) -> Result<ProjectState>;
    fn save(&mut self, id: &str, project: &ProjectState) -> Result<()>;
    fn delete(&mut self, id: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<ProjectSummary>>;
}

impl<R: ProjectRepository + ?Sized> ProjectRepository for Box<R> {
    fn load(&self, id: &str) -> Result<ProjectState> {
        (**self).load(id)
    }

    fn save(&mut self, id: &str, project: &ProjectState) -> Result<()> {
        (**self).save(id, project)
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        (**self).delete(id)
    }

    fn list(&self) -> Result<Vec<ProjectSummary>> {
        (**self).list()
    }
}

/// Project list entry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub uuid: String,
    pub name: String,
    pub created_at: i64,
}

const PROJECT_KEY_PREFIX: &str = "project-";

fn project_key(id: &str) -> String {
    format!("{}{}", PROJECT_KEY_PREFIX, id)
}

/// [`ProjectRepository`] over any [`KeyValueStore`]
#[derive(Debug, Default)]
pub struct KvRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KvRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: KeyValueStore> ProjectRepository for KvRepository<S> {
    fn load(&self, id: &str) -> Result<ProjectState> {
        let raw = self
            .store
            .get(&project_key(id))?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        let mut project: ProjectState = serde_json::from_str(&raw)?;
        project.normalize();
        Ok(project)
    }

    fn save(&mut self, id: &str, project: &ProjectState) -> Result<()> {
        let raw = serde_json::to_string(project)?;
        self.store.set(&project_key(id), &raw)
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        self.store.remove(&project_key(id))
    }

    fn list(&self) -> Result<Vec<ProjectSummary>> {
        let mut summaries = Vec::new();

        for key in self.store.keys()? {
            let Some(id) = key.strip_prefix(PROJECT_KEY_PREFIX) else {
                continue;
            };
            match self.load(id) {
                Ok(p) => summaries.push(ProjectSummary {
                    uuid: p.uuid,
                    name: p.name,
                    created_at: p.created_at,
                }),
                Err(e) => log::warn!("Skipping unreadable project {}: {}", id, e),
            }
        }

        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.uuid.cmp(&b.uuid)));
        Ok(summaries)
    }
}

/// Private in-process store; each instance has its own entries
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(not(target_arch = "wasm32"))]
lazy_static::lazy_static! {
    static ref PROCESS_STORE: std::sync::Mutex<MemoryStore> =
        std::sync::Mutex::new(MemoryStore::new());
}

/// Handle to one in-memory store shared by the whole process
///
/// Every handle sees the same entries, so projects outlive the session that
/// created them. Used where no browser storage exists.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessStore;

#[cfg(not(target_arch = "wasm32"))]
impl ProcessStore {
    fn with<T>(f: impl FnOnce(&mut MemoryStore) -> Result<T>) -> Result<T> {
        let mut store = PROCESS_STORE
            .lock()
            .map_err(|_| StorageError::Unavailable("process store is poisoned".to_string()))?;
        f(&mut store)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for ProcessStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::with(|store| store.get(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Self::with(|store| store.set(key, value))
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Self::with(|store| store.remove(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Self::with(|store| store.keys())
    }
}

pub type MemoryRepository = KvRepository<MemoryStore>;

impl MemoryRepository {
    pub fn in_memory() -> Self {
        KvRepository::new(MemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load_round_trips() {
        let mut repo = MemoryRepository::in_memory();
        let mut p = ProjectState::new("abc", "demo");
        p.corrections.paint_cell(12, "A");
        p.corrections.paint_cell(3, "B");

        repo.save("abc", &p).unwrap();
        assert_eq!(repo.load("abc").unwrap(), p);
    }

    #[test]
    fn test_missing_project_is_not_found() {
        let repo = MemoryRepository::in_memory();
        assert!(matches!(repo.load("nope"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_entry_reports_serialization_error() {
        let mut repo = MemoryRepository::in_memory();
        repo.store_mut().set("project-bad", "not json").unwrap();
        let err = repo.load("bad").unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_list_skips_corrupt_and_foreign_keys() {
        let mut repo = MemoryRepository::in_memory();
        repo.save("b", &ProjectState::new("b", "second").with_created_at(20)).unwrap();
        repo.save("a", &ProjectState::new("a", "first").with_created_at(10)).unwrap();
        repo.store_mut().set("project-broken", "{").unwrap();
        repo.store_mut().set("knitting-prefs", "{}").unwrap();

        let list = repo.list().unwrap();
        let names: Vec<&str> = list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_delete() {
        let mut repo = MemoryRepository::in_memory();
        repo.save("x", &ProjectState::new("x", "gone")).unwrap();
        assert!(repo.delete("x").unwrap());
        assert!(!repo.delete("x").unwrap());
        assert!(repo.list().unwrap().is_empty());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_process_store_is_shared_between_handles() {
        let mut writer = KvRepository::new(ProcessStore);
        writer.save("shared-7f3a", &ProjectState::new("shared-7f3a", "mitten")).unwrap();

        let reader = KvRepository::new(ProcessStore);
        assert_eq!(reader.load("shared-7f3a").unwrap().name, "mitten");
        assert!(reader.list().unwrap().iter().any(|s| s.uuid == "shared-7f3a"));

        assert!(writer.delete("shared-7f3a").unwrap());
        assert!(reader.load("shared-7f3a").is_err());
    }
}
