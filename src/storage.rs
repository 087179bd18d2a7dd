//! JSON persistence on top of the browser key-value stores.
//!
//! Every operation of [`JsonStorage`] tolerates failures: they are logged and reported
//! through the return value, never raised.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("The storage is not available in this browser.")]
    Unavailable,
    #[error("The storage refused the operation: {0}")]
    Access(String),
    #[error("The stored value is not valid JSON for the expected type.")]
    Malformed(#[from] serde_json::Error),
}

impl From<JsValue> for StorageError {
    fn from(value: JsValue) -> Self {
        StorageError::Access(format!("{value:?}"))
    }
}

/// A synchronous string key-value store.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// `localStorage` or `sessionStorage`.
pub struct WebStorage {
    storage: web_sys::Storage,
}

impl WebStorage {
    pub fn local() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let storage = window.local_storage()?.ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }

    pub fn session() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let storage = window.session_storage()?.ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.storage.get_item(key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.storage.set_item(key, value)?)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Ok(self.storage.remove_item(key)?)
    }

    fn clear(&self) -> Result<(), StorageError> {
        Ok(self.storage.clear()?)
    }
}

/// Store living in memory only, used when the browser denies access to its storages.
/// Clones share the same content.
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.items.borrow_mut().clear();
        Ok(())
    }
}

pub struct JsonStorage {
    store: Box<dyn KeyValueStore>,
}

impl JsonStorage {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Browser local storage, or an in-memory store when it can't be reached.
    pub fn local_or_memory() -> Self {
        match WebStorage::local() {
            Ok(storage) => Self::new(storage),
            Err(error) => {
                log::warn!("Local storage unavailable, falling back to memory: {error}");
                Self::new(MemoryStore::new())
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set_item(key, &json));
        match result {
            Ok(()) => true,
            Err(error) => {
                log::error!("Can't store `{key}`: {error}");
                false
            }
        }
    }

    /// Read and decode `key`; `Ok(None)` when nothing is stored.
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get_item(key)? {
            None => Ok(None),
            Some(json) if json.is_empty() => Ok(None),
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.try_get(key).unwrap_or_else(|error| {
            log::error!("Can't read `{key}`: {error}");
            None
        })
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.store
            .remove_item(key)
            .map_err(|error| log::error!("Can't remove `{key}`: {error}"))
            .is_ok()
    }

    pub fn clear(&self) -> bool {
        self.store
            .clear()
            .map_err(|error| log::error!("Can't clear storage: {error}"))
            .is_ok()
    }
}

/// Whether local storage can be written to and read back.
#[wasm_bindgen]
pub fn storage_available() -> bool {
    let Ok(storage) = WebStorage::local() else {
        return false;
    };
    let key = format!("test_key_{}", js_sys::Date::now());
    let value = "test_value";
    let round_trip = storage
        .set_item(&key, value)
        .and_then(|_| storage.get_item(&key));
    let _ = storage.remove_item(&key);
    matches!(round_trip, Ok(Some(stored)) if stored == value)
}

/// Local or session storage exposed to page scripts, with JSON values.
#[wasm_bindgen]
pub struct PersistentStore {
    storage: JsonStorage,
}

#[wasm_bindgen]
impl PersistentStore {
    pub fn local() -> PersistentStore {
        PersistentStore {
            storage: JsonStorage::local_or_memory(),
        }
    }

    pub fn session() -> PersistentStore {
        let storage = match WebStorage::session() {
            Ok(storage) => JsonStorage::new(storage),
            Err(error) => {
                log::warn!("Session storage unavailable, falling back to memory: {error}");
                JsonStorage::new(MemoryStore::new())
            }
        };
        PersistentStore { storage }
    }

    pub fn set(&self, key: &str, value: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(value) {
            Ok(value) => self.storage.set(key, &value),
            Err(error) => {
                log::error!("Can't store `{key}`: {error}");
                false
            }
        }
    }

    /// The stored value, or `default_value` when missing or unreadable.
    pub fn get(&self, key: &str, default_value: JsValue) -> JsValue {
        self.storage
            .get::<serde_json::Value>(key)
            .and_then(|value| {
                value
                    .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                    .ok()
            })
            .unwrap_or(default_value)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.storage.remove(key)
    }

    pub fn clear(&self) -> bool {
        self.storage.clear()
    }
}
