use planner_core::{CoreError, CoreErrorCode, KeyValueStore};
use wasm_bindgen::JsValue;

/// `window.localStorage` as a [`KeyValueStore`].
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, CoreError> {
        let window = web_sys::window().ok_or_else(|| {
            CoreError::new(CoreErrorCode::Storage, "no browser window is available")
        })?;
        let storage = window
            .local_storage()
            .map_err(|err| storage_error("failed to open localStorage", &err))?
            .ok_or_else(|| {
                CoreError::new(CoreErrorCode::Storage, "localStorage is disabled")
            })?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.storage
            .get_item(key)
            .map_err(|err| storage_error(&format!("failed to read '{key}'"), &err))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| storage_error(&format!("failed to write '{key}'"), &err))
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        let len = self
            .storage
            .length()
            .map_err(|err| storage_error("failed to count keys", &err))?;
        let mut keys = Vec::with_capacity(len as usize);
        for index in 0..len {
            let key = self
                .storage
                .key(index)
                .map_err(|err| storage_error("failed to list keys", &err))?;
            if let Some(key) = key {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

fn storage_error(context: &str, err: &JsValue) -> CoreError {
    CoreError::new(CoreErrorCode::Storage, format!("{context}: {err:?}"))
}
