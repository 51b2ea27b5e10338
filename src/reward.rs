//! Simulated rewarded-hint flow
//!
//! Stands in for a rewarded ad: once the player agrees to watch, a timer runs
//! and, when it elapses, exactly one grant is produced. The flow never touches
//! a session itself; the caller credits the grant with `add_hint`.

use crate::consts::{REWARD_DURATION_SECS, REWARD_HINTS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewardPhase {
    Idle,
    /// Prompt shown, waiting for watch or cancel
    Offered,
    /// Reward playing; `remaining` seconds left
    Playing { remaining: f32 },
}

/// Hints earned by completing the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardGrant {
    pub hints: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewardFlow {
    phase: RewardPhase,
    duration: f32,
}

impl Default for RewardFlow {
    fn default() -> Self {
        Self::new(REWARD_DURATION_SECS)
    }
}

impl RewardFlow {
    pub fn new(duration: f32) -> Self {
        Self {
            phase: RewardPhase::Idle,
            duration: duration.max(0.0),
        }
    }

    pub fn phase(&self) -> RewardPhase {
        self.phase
    }

    /// Prompt open or reward playing
    pub fn is_active(&self) -> bool {
        self.phase != RewardPhase::Idle
    }

    /// Show the prompt; ignored while already playing
    pub fn offer(&mut self) {
        if self.phase == RewardPhase::Idle {
            self.phase = RewardPhase::Offered;
        }
    }

    /// Dismiss the prompt; a playing reward cannot be cancelled
    pub fn cancel(&mut self) -> bool {
        if self.phase == RewardPhase::Offered {
            self.phase = RewardPhase::Idle;
            true
        } else {
            false
        }
    }

    /// Start the reward timer from the prompt
    pub fn watch(&mut self) -> bool {
        if self.phase == RewardPhase::Offered {
            self.phase = RewardPhase::Playing {
                remaining: self.duration,
            };
            true
        } else {
            false
        }
    }

    /// Advance the timer by `dt` seconds; yields the grant once it elapses
    pub fn advance(&mut self, dt: f32) -> Option<RewardGrant> {
        let RewardPhase::Playing { remaining } = self.phase else {
            return None;
        };

        let remaining = remaining - dt.max(0.0);
        if remaining > 0.0 {
            self.phase = RewardPhase::Playing { remaining };
            return None;
        }

        self.phase = RewardPhase::Idle;
        log::info!("Reward complete, granting {} hint(s)", REWARD_HINTS);
        Some(RewardGrant {
            hints: REWARD_HINTS,
        })
    }

    /// Drop any prompt or running reward without granting
    pub fn reset(&mut self) {
        self.phase = RewardPhase::Idle;
    }
}
