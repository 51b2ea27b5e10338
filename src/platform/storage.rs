//! Synchronous key-value storage
//!
//! Persistence in this crate only ever needs `get`/`set` of string values.
//! Failures never surface: an unreadable value is absent, and a failed write
//! is logged and dropped.

use std::collections::HashMap;

/// Minimal synchronous storage contract
pub trait KeyValueStore {
    /// Stored value, or `None` if absent or unreadable
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// In-memory store, used in tests and as a fallback when nothing persists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::KeyValueStore;

    /// JSON file holding every key, rewritten in full on each `set`
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
        entries: BTreeMap<String, String>,
    }

    impl FileStore {
        /// Open (or lazily create) the store at `path`
        ///
        /// A missing or corrupt file starts empty.
        pub fn open(path: impl Into<PathBuf>) -> Self {
            let path = path.into();
            let entries = match fs::read_to_string(&path) {
                Ok(json) => match serde_json::from_str(&json) {
                    Ok(entries) => {
                        log::info!("Opened store at {}", path.display());
                        entries
                    }
                    Err(err) => {
                        log::warn!("Store at {} is corrupt ({}), starting empty", path.display(), err);
                        BTreeMap::new()
                    }
                },
                Err(_) => {
                    log::info!("No store at {}, starting empty", path.display());
                    BTreeMap::new()
                }
            };
            Self { path, entries }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn flush(&self) -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&self.entries)?;
            fs::write(&self.path, json)
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) {
            self.entries.insert(key.to_string(), value.to_string());
            if let Err(err) = self.flush() {
                log::warn!("Failed to write store {}: {}", self.path.display(), err);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::KeyValueStore;

    /// Browser `window.localStorage`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStore;

    impl LocalStore {
        fn storage() -> Option<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
        }
    }

    impl KeyValueStore for LocalStore {
        fn get(&self, key: &str) -> Option<String> {
            Self::storage().and_then(|s| s.get_item(key).ok().flatten())
        }

        fn set(&mut self, key: &str, value: &str) {
            match Self::storage() {
                Some(storage) => {
                    if storage.set_item(key, value).is_err() {
                        log::warn!("LocalStorage rejected write to {}", key);
                    }
                }
                None => log::warn!("LocalStorage unavailable, {} not saved", key),
            }
        }
    }
}
