//! Geometry Persistence
//!
//! Storage adapters for the floating window's saved geometry. Three keys per
//! window kind: `<key>` holds the position, `<key>_size` the size and
//! `<key>_vertical` the orientation flag. Values are loosely-typed JSON so
//! each field can be validated independently; a malformed value is treated
//! the same as a missing one.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Key under which a window's size record is saved
pub fn size_key(storage_key: &str) -> String {
    format!("{storage_key}_size")
}

/// Key under which a window's orientation flag is saved
pub fn vertical_key(storage_key: &str) -> String {
    format!("{storage_key}_vertical")
}

/// Storage facility failure. Always recovered locally by falling back to
/// defaults or in-memory-only operation; never surfaced to the user.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Async key-value store backing the floating window's persisted geometry.
///
/// Reads happen once at window creation; writes are fire-and-forget full
/// snapshots, so last-write-wins is the only ordering the store must offer.
#[allow(async_fn_in_trait)]
pub trait GeometryStorage {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>, StorageError>;
    async fn set(&self, entries: HashMap<String, Value>) -> Result<(), StorageError>;
}

// ========================
// In-memory store
// ========================

/// In-memory store, used when no browser storage facility exists and as the
/// test double.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GeometryStorage for MemoryStorage {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>, StorageError> {
        let values = self.values.borrow();
        Ok(keys
            .iter()
            .filter_map(|key| values.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<(), StorageError> {
        self.values.borrow_mut().extend(entries);
        Ok(())
    }
}

// ========================
// chrome.storage.local
// ========================

/// `chrome.storage.local` adapter. Availability is probed on every call so a
/// page without the extension APIs degrades to defaults instead of throwing.
#[derive(Debug, Default)]
pub struct ChromeStorage;

impl ChromeStorage {
    pub fn new() -> Self {
        Self
    }

    fn lookup(target: &JsValue, name: &str) -> Option<JsValue> {
        let value = js_sys::Reflect::get(target, &JsValue::from_str(name)).ok()?;
        if value.is_undefined() || value.is_null() {
            None
        } else {
            Some(value)
        }
    }

    fn local_area() -> Result<JsValue, StorageError> {
        let global: JsValue = js_sys::global().into();
        Self::lookup(&global, "chrome")
            .and_then(|chrome| Self::lookup(&chrome, "storage"))
            .and_then(|storage| Self::lookup(&storage, "local"))
            .ok_or_else(|| StorageError::Unavailable("chrome.storage is not available".into()))
    }

    async fn call(method: &str, arg: &JsValue) -> Result<JsValue, StorageError> {
        let area = Self::local_area()?;
        let func = Self::lookup(&area, method)
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| StorageError::Unavailable(format!("chrome.storage.local.{method} is not a function")))?;
        let promise: js_sys::Promise = func
            .call1(&area, arg)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))?
            .unchecked_into();
        JsFuture::from(promise)
            .await
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }
}

impl GeometryStorage for ChromeStorage {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>, StorageError> {
        let js_keys = serde_wasm_bindgen::to_value(keys)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        let result = Self::call("get", &js_keys).await?;

        // Pull each key out individually so one unreadable value does not
        // discard the rest.
        let mut values = HashMap::new();
        for key in keys {
            let Some(value) = Self::lookup(&result, key) else {
                continue;
            };
            if let Ok(value) = serde_wasm_bindgen::from_value::<Value>(value) {
                values.insert(key.clone(), value);
            }
        }
        Ok(values)
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<(), StorageError> {
        let js_entries = serde_wasm_bindgen::to_value(&entries)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        Self::call("set", &js_entries).await?;
        Ok(())
    }
}
