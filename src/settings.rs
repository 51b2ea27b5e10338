//! Player audio preferences
//!
//! Persisted separately from progress, under its own storage key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::SETTINGS_STORAGE_KEY;
use crate::platform::KeyValueStore;

/// Audio toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Background music enabled
    pub music: bool,
    /// Sound effects enabled
    pub sfx: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music: true,
            sfx: true,
        }
    }
}

impl Settings {
    /// Load settings; only an explicit `false` turns a toggle off
    pub fn load<S: KeyValueStore + ?Sized>(storage: &S) -> Self {
        let Some(json) = storage.get(SETTINGS_STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match serde_json::from_str::<Value>(&json) {
            Ok(value) => {
                let enabled = |key: &str| value.get(key) != Some(&Value::Bool(false));
                let settings = Self {
                    music: enabled("music"),
                    sfx: enabled("sfx"),
                };
                log::info!("Loaded settings: {:?}", settings);
                settings
            }
            Err(err) => {
                log::warn!("Stored settings are unreadable ({}), using defaults", err);
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, storage: &mut S) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage.set(SETTINGS_STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(err) => log::warn!("Failed to serialize settings: {}", err),
        }
    }

    pub fn toggle_music(&mut self) -> bool {
        self.music = !self.music;
        self.music
    }

    pub fn toggle_sfx(&mut self) -> bool {
        self.sfx = !self.sfx;
        self.sfx
    }
}
