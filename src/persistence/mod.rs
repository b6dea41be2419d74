//! Key-value persistence
//!
//! The game never touches browser storage directly. Whoever starts a
//! [`Session`](crate::Session) hands it a [`PersistenceProvider`]:
//! - [`LocalStore`]: browser LocalStorage (wasm32 only)
//! - [`MemoryStore`]: in-process map, used natively and in tests
//!
//! Values are JSON strings; the [`profile`] module owns the player profile codec.

pub mod profile;

use std::collections::HashMap;
use std::fmt;

pub use profile::{Profile, ProfileError};

/// String key-value storage
pub trait PersistenceProvider: fmt::Debug {
    /// Stored value for `key`, if any
    fn load(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`, replacing what was there
    fn save(&mut self, key: &str, value: &str);
}

/// Storage that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value (e.g. a profile from an earlier run)
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl PersistenceProvider for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// `None` when the page has no LocalStorage (e.g. disabled by privacy settings)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl PersistenceProvider for LocalStore {
    fn load(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn save(&mut self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("Failed to write {} to LocalStorage", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new().with_entry("a", "1");
        assert_eq!(store.load("a").as_deref(), Some("1"));
        assert_eq!(store.load("b"), None);

        store.save("a", "2");
        store.save("b", "3");
        assert_eq!(store.load("a").as_deref(), Some("2"));
        assert_eq!(store.load("b").as_deref(), Some("3"));
    }
}
