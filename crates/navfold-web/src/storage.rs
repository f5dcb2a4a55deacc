//! `window.sessionStorage` backend

use navfold_core::{CoreError, SessionStorage};
use web_sys::{Storage, Window};

/// Browser session storage; absent when the page may not use it
/// (sandboxed frames, some privacy modes)
pub struct BrowserSessionStorage {
    storage: Option<Storage>,
}

impl BrowserSessionStorage {
    pub fn from_window(window: &Window) -> Self {
        Self {
            storage: window.session_storage().ok().flatten(),
        }
    }

    fn storage(&self, key: &str) -> Result<&Storage, CoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| CoreError::StorageUnavailable {
                reason: format!("sessionStorage not accessible for {key}"),
            })
    }
}

impl SessionStorage for BrowserSessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.storage(key)?
            .set_item(key, value)
            .map_err(|e| CoreError::StorageWrite {
                key: key.to_string(),
                message: format!("{e:?}"),
            })
    }

    fn remove_item(&mut self, key: &str) -> Result<(), CoreError> {
        self.storage(key)?
            .remove_item(key)
            .map_err(|e| CoreError::StorageWrite {
                key: key.to_string(),
                message: format!("{e:?}"),
            })
    }
}
