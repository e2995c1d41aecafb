//! Persisted client state behind a small key-value interface.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Keys written by the dashboards and auth flows.
pub mod keys {
    pub const JWT_TOKEN: &str = "jwt_token";
    pub const USER_ROLE: &str = "user_role";
    pub const CURRENT_USER: &str = "current_user";
    pub const CENTERS_LOADED: &str = "centersLoaded";
    pub const SELECTED_CENTER: &str = "selectedHealthCenter";
    pub const SELECTED_DOCTOR: &str = "selectedDoctor";
    pub const DOCTOR_CENTER: &str = "doctorHealthCenter";
}

/// String key-value store. Writes are best effort.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.inner.borrow_mut().remove(key);
    }
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(s) => {
                if s.set_item(key, value).is_err() {
                    tracing::warn!(key, "localStorage write rejected");
                }
            }
            None => tracing::warn!(key, "localStorage unavailable"),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(s) = Self::storage() {
            let _ = s.remove_item(key);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub type DefaultStore = BrowserStorage;

#[cfg(not(target_arch = "wasm32"))]
pub type DefaultStore = MemoryStore;

/// Decode a JSON value. Empty values read as absent; corrupt values are
/// logged and removed so the next read starts clean.
pub fn read_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    if raw.trim().is_empty() || raw == "null" || raw == "undefined" {
        return None;
    }
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding corrupt stored value");
            store.remove(key);
            None
        }
    }
}

/// Encode `value` as JSON, or remove the key for `None`.
pub fn write_json<T: Serialize>(store: &impl KeyValueStore, key: &str, value: Option<&T>) {
    let Some(value) = value else {
        store.remove(key);
        return;
    };
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => tracing::error!(key, error = %e, "Failed to encode value for storage"),
    }
}
