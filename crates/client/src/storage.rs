//! Cross-platform storage module.
//!
//! - Web: `localStorage`
//! - Desktop: JSON files in the platform config directory:
//!   - Linux: `~/.config/keikichi/`
//!   - macOS: `~/Library/Application Support/keikichi/`
//!   - Windows: `%APPDATA%\keikichi\`

use keikichi_shared::StorageError;
use serde::{de::DeserializeOwned, Serialize};

pub fn save<T: Serialize>(key: &str, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    save_raw(key, &json)
}

/// `None` when the key is missing or the stored value no longer parses.
pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = load_raw(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            crate::log_warn!("Discarding unreadable stored value '{}': {}", key, e);
            None
        }
    }
}

pub fn remove(key: &str) {
    remove_raw(key);
}

/// Turn a storage key into a safe file stem.
pub fn sanitize_key(key: &str) -> String {
    key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_")
}

// =========================================
// Web (WASM) implementation
// =========================================

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
fn save_raw(key: &str, value: &str) -> Result<(), StorageError> {
    let storage = local_storage().ok_or(StorageError::Unavailable)?;
    storage
        .set_item(key, value)
        .map_err(|e| StorageError::Io(format!("{e:?}")))
}

#[cfg(target_arch = "wasm32")]
fn load_raw(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

#[cfg(target_arch = "wasm32")]
fn remove_raw(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

// =========================================
// Desktop (native) implementation
// =========================================

#[cfg(not(target_arch = "wasm32"))]
fn config_dir() -> Option<std::path::PathBuf> {
    let app_dir = dirs::config_dir()?.join("keikichi");
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir).ok()?;
    }
    Some(app_dir)
}

#[cfg(not(target_arch = "wasm32"))]
fn file_path(key: &str) -> Option<std::path::PathBuf> {
    Some(config_dir()?.join(format!("{}.json", sanitize_key(key))))
}

#[cfg(not(target_arch = "wasm32"))]
fn save_raw(key: &str, value: &str) -> Result<(), StorageError> {
    let path = file_path(key).ok_or(StorageError::Unavailable)?;
    std::fs::write(path, value).map_err(|e| StorageError::Io(e.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
fn load_raw(key: &str) -> Option<String> {
    std::fs::read_to_string(file_path(key)?).ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn remove_raw(key: &str) {
    if let Some(path) = file_path(key) {
        let _ = std::fs::remove_file(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_become_safe_file_names() {
        assert_eq!(sanitize_key("reservation_draft_t1"), "reservation_draft_t1");
        assert_eq!(sanitize_key("a/b:c?"), "a_b_c_");
    }
}
