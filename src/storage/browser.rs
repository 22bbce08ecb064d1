//! `window.localStorage` as a key-value store

use super::{KeyValueStore, Result, StorageError};

/// Keys are namespaced so unrelated localStorage entries are never touched
const NAMESPACE: &str = "knit-chart:";

fn js_err(context: &str, e: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("{}: {:?}", context, e))
}

/// Handle to the page's localStorage
///
/// The storage object is looked up on every call rather than held, which
/// keeps the handle `Send` so it can live in the shared editor state.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// Check that localStorage is reachable
    pub fn open() -> Result<Self> {
        Self::storage()?;
        Ok(Self)
    }

    fn storage() -> Result<web_sys::Storage> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| js_err("localStorage access denied", e))?
            .ok_or_else(|| StorageError::Unavailable("localStorage missing".to_string()))
    }

    fn namespaced(key: &str) -> String {
        format!("{}{}", NAMESPACE, key)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?
            .get_item(&Self::namespaced(key))
            .map_err(|e| js_err("localStorage read failed", e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(&Self::namespaced(key), value)
            .map_err(|e| js_err("localStorage write failed", e))
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let existed = self.get(key)?.is_some();
        Self::storage()?
            .remove_item(&Self::namespaced(key))
            .map_err(|e| js_err("localStorage remove failed", e))?;
        Ok(existed)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let storage = Self::storage()?;
        let len = storage
            .length()
            .map_err(|e| js_err("localStorage length failed", e))?;

        let mut keys = Vec::new();
        for i in 0..len {
            let key = storage
                .key(i)
                .map_err(|e| js_err("localStorage key failed", e))?;
            if let Some(k) = key.as_deref().and_then(|k| k.strip_prefix(NAMESPACE)) {
                keys.push(k.to_string());
            }
        }
        Ok(keys)
    }
}
