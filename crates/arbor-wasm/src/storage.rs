//! `TextStore` over the browser's `localStorage`.

use arbor_editor::{StoreError, TextStore};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Storage;

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// `None` outside a window or when storage is disabled.
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl TextStore for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(js_error_message(&e)))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(js_error_message(&e)))
    }
}

/// Best-effort message out of a thrown JS value (usually a `DOMException`).
fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| "unknown storage error".to_string())
}
