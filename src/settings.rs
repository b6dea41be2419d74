//! Game settings and preferences
//!
//! Persisted separately from the player profile, through the same injected store.

use serde::{Deserialize, Serialize};

use crate::persistence::PersistenceProvider;
use crate::sim::WorldConfig;

/// How the player steers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlScheme {
    /// Arrow keys / WASD
    #[default]
    Keyboard,
    /// Move toward the pointer
    Pointer,
}

impl ControlScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlScheme::Keyboard => "Keyboard",
            ControlScheme::Pointer => "Pointer",
        }
    }

    /// The other scheme
    pub fn toggled(self) -> Self {
        match self {
            ControlScheme::Keyboard => ControlScheme::Pointer,
            ControlScheme::Pointer => ControlScheme::Keyboard,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// World size and enemy population
    pub world: WorldConfig,
    pub controls: ControlScheme,
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "dig_blob_settings";

    /// Load settings from the store, or defaults when missing or unreadable
    pub fn load(store: &dyn PersistenceProvider) -> Self {
        if let Some(json) = store.load(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn PersistenceProvider) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.save(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}
