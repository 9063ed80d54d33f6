//! JSON key/value persistence
//!
//! - Web: LocalStorage, one key per record
//! - Native: one JSON file per record in the working directory

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Where a record lives on each platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageKey {
    /// LocalStorage key (web)
    pub local_storage: &'static str,
    /// File name (native)
    pub file_name: &'static str,
}

/// Failure to write a record
#[derive(Debug)]
pub enum StorageError {
    /// No LocalStorage available (private browsing, sandboxed iframe)
    Unavailable,
    Serialize(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Serialize(e) => write!(f, "serialization failed: {}", e),
            Self::Io(e) => write!(f, "write failed: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unavailable => None,
            Self::Serialize(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Load a record; missing or corrupt records read as `None`
#[cfg(target_arch = "wasm32")]
pub fn load_json<T: DeserializeOwned>(key: &StorageKey) -> Option<T> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let json = storage.get_item(key.local_storage).ok()??;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt {}: {}", key.local_storage, e);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn save_json<T: Serialize>(key: &StorageKey, value: &T) -> Result<(), StorageError> {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(StorageError::Unavailable)?;
    let json = serde_json::to_string(value)?;
    storage
        .set_item(key.local_storage, &json)
        .map_err(|_| StorageError::Unavailable)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_json<T: DeserializeOwned>(key: &StorageKey) -> Option<T> {
    load_json_from(std::path::Path::new("."), key)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_json<T: Serialize>(key: &StorageKey, value: &T) -> Result<(), StorageError> {
    save_json_to(std::path::Path::new("."), key, value)
}

/// Load a record from `dir`
#[cfg(not(target_arch = "wasm32"))]
pub fn load_json_from<T: DeserializeOwned>(dir: &std::path::Path, key: &StorageKey) -> Option<T> {
    let path = dir.join(key.file_name);
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt {}: {}", path.display(), e);
            None
        }
    }
}

/// Write a record into `dir` (via a temp file, then rename)
#[cfg(not(target_arch = "wasm32"))]
pub fn save_json_to<T: Serialize>(
    dir: &std::path::Path,
    key: &StorageKey,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)?;
    let path = dir.join(key.file_name);
    let tmp = dir.join(format!("{}.tmp", key.file_name));
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}
