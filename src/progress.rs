//! Level progress ledger
//!
//! Persisted through a [`KeyValueStore`] under a single key. The whole record
//! is written after every mutation. Anything unreadable at load time is
//! treated as a fresh start.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clamp_count;
use crate::consts::PROGRESS_STORAGE_KEY;
use crate::platform::KeyValueStore;

/// Cleared levels and the furthest level reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Always at least 1
    pub current_level: u32,
    /// Insertion-ordered, no duplicates
    pub cleared: Vec<u32>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            current_level: 1,
            cleared: Vec::new(),
        }
    }
}

/// On-disk shape; numbers may be fractional in saves written by other clients
///
/// Only the overall shape is required. Non-numeric `cleared` entries are
/// skipped on conversion rather than rejecting the record.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    current_level: f64,
    cleared: Vec<Value>,
}

impl From<StoredRecord> for ProgressRecord {
    fn from(stored: StoredRecord) -> Self {
        let current_level = clamp_count(stored.current_level.floor() as i64).max(1);
        let mut cleared: Vec<u32> = Vec::with_capacity(stored.cleared.len());
        for level in stored.cleared.iter().filter_map(Value::as_f64) {
            let level = level.floor();
            if level < 0.0 {
                continue;
            }
            let level = clamp_count(level as i64);
            if !cleared.contains(&level) {
                cleared.push(level);
            }
        }
        Self {
            current_level,
            cleared,
        }
    }
}

impl ProgressRecord {
    fn parse(json: &str) -> Option<Self> {
        serde_json::from_str::<StoredRecord>(json).ok().map(Self::from)
    }
}

/// Progress ledger bound to its backing store
#[derive(Debug)]
pub struct ProgressStore<S: KeyValueStore> {
    storage: S,
    record: ProgressRecord,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Load the ledger, falling back to defaults on absent or corrupt data
    pub fn load(storage: S) -> Self {
        let record = match storage.get(PROGRESS_STORAGE_KEY) {
            Some(json) => match ProgressRecord::parse(&json) {
                Some(record) => {
                    log::info!(
                        "Loaded progress: level {}, {} cleared",
                        record.current_level,
                        record.cleared.len()
                    );
                    record
                }
                None => {
                    log::warn!("Stored progress is unreadable, starting fresh");
                    ProgressRecord::default()
                }
            },
            None => {
                log::info!("No saved progress, starting fresh");
                ProgressRecord::default()
            }
        };
        Self { storage, record }
    }

    pub fn current_level(&self) -> u32 {
        self.record.current_level
    }

    /// Levels below 1 clamp to 1
    pub fn set_current_level(&mut self, level: i64) {
        self.record.current_level = clamp_count(level).max(1);
        self.persist();
    }

    /// Record a cleared level and advance the current level past it
    pub fn mark_level_cleared(&mut self, level: i64) {
        let level = clamp_count(level);
        if !self.record.cleared.contains(&level) {
            self.record.cleared.push(level);
        }
        let next = level.saturating_add(1);
        if next > self.record.current_level {
            self.record.current_level = next;
        }
        self.persist();
    }

    /// Level 1 (and below) is always open; others need their predecessor cleared
    pub fn is_unlocked(&self, level: i64) -> bool {
        if level <= 1 {
            return true;
        }
        u32::try_from(level - 1).is_ok_and(|prev| self.record.cleared.contains(&prev))
    }

    /// Copy of the cleared levels
    pub fn cleared_levels(&self) -> Vec<u32> {
        self.record.cleared.clone()
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    /// Backing store, shared with other persisted records
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.record) {
            Ok(json) => {
                self.storage.set(PROGRESS_STORAGE_KEY, &json);
                log::debug!("Progress saved: {}", json);
            }
            Err(err) => log::warn!("Failed to serialize progress: {}", err),
        }
    }
}
