//! Find It - a hidden-object tapping game
//!
//! Core modules:
//! - `catalog`: Read-only level definitions
//! - `play`: Hit testing, hint selection and the per-level session
//! - `progress`: Persistent unlock ledger
//! - `platform`: Storage backends (memory, file, LocalStorage)
//! - `settings`: Audio preferences
//! - `reward`: Simulated rewarded-hint timer
//! - `app`: Render-free controller tying the above together

pub mod app;
pub mod catalog;
pub mod platform;
pub mod play;
pub mod progress;
pub mod reward;
pub mod settings;

pub use app::{App, AppError, HintOutcome, LevelEntry, TapOutcome, View, board_to_normalized};
pub use catalog::{CatalogError, LevelCatalog, LevelDefinition, Target};
pub use play::{GameSession, HintRng, SessionStatus, find_hit_target, pick_hint_target};
pub use progress::{ProgressRecord, ProgressStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Starting hearts for built-in levels
    pub const DEFAULT_HEARTS: u32 = 3;
    /// Starting hints for built-in levels
    pub const DEFAULT_HINTS: u32 = 1;

    /// Storage key of the progress ledger
    pub const PROGRESS_STORAGE_KEY: &str = "progress_v1";
    /// Storage key of the audio settings
    pub const SETTINGS_STORAGE_KEY: &str = "settings_v1";

    /// Length of the simulated rewarded ad (seconds)
    pub const REWARD_DURATION_SECS: f32 = 2.0;
    /// Hints granted per completed reward
    pub const REWARD_HINTS: u32 = 1;
}

/// Clamp a signed count into `0..=u32::MAX`
#[inline]
pub fn clamp_count(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}
