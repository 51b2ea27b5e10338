//! Per-level game session
//!
//! Tracks which targets were found and the remaining hearts and hints.
//! A session is a plain value: starting a level builds a new one and the
//! previous one is simply dropped.

use std::collections::BTreeSet;

use super::hint::{UniformSource, pick_hint_target};
use crate::catalog::LevelDefinition;
use crate::clamp_count;

/// Derived state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    /// Every target found (terminal)
    Won,
    /// Out of hearts (terminal)
    Lost,
}

impl SessionStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Result of registering a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Unknown id, or already found
    NoChange,
    Found,
    /// Found the last remaining target
    Won,
}

/// Result of registering a miss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissOutcome {
    /// Lost a heart, some remain
    Damaged,
    /// No hearts left
    Failed,
}

/// Result of spending a hint to reveal a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintReveal {
    Revealed { id: String, won: bool },
    /// No hints left; the caller may offer a reward
    NoHints,
    /// Nothing was revealed; no hint was spent
    NothingLeft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    /// Level targets in catalog order
    target_ids: Vec<String>,
    found: BTreeSet<String>,
    hearts: u32,
    hints: u32,
}

impl GameSession {
    /// Negative starting counts clamp to zero
    pub fn new(target_ids: Vec<String>, hearts: i64, hints: i64) -> Self {
        Self {
            target_ids,
            found: BTreeSet::new(),
            hearts: clamp_count(hearts),
            hints: clamp_count(hints),
        }
    }

    pub fn from_level(level: &LevelDefinition) -> Self {
        Self::new(
            level.target_ids(),
            i64::from(level.initial_hearts),
            i64::from(level.initial_hints),
        )
    }

    /// Mark `id` found if it is a known, unfound target
    pub fn hit(&mut self, id: &str) -> HitOutcome {
        if self.found.contains(id) || !self.target_ids.iter().any(|t| t == id) {
            return HitOutcome::NoChange;
        }

        self.found.insert(id.to_string());
        if self.is_win() {
            HitOutcome::Won
        } else {
            HitOutcome::Found
        }
    }

    /// Lose one heart, never going below zero
    pub fn miss(&mut self) -> MissOutcome {
        self.hearts = self.hearts.saturating_sub(1);
        if self.is_fail() {
            MissOutcome::Failed
        } else {
            MissOutcome::Damaged
        }
    }

    /// Spend one hint if any remain
    ///
    /// Does not pick or reveal anything; see [`GameSession::reveal_hint`].
    pub fn use_hint(&mut self) -> bool {
        if self.hints == 0 {
            return false;
        }
        self.hints -= 1;
        true
    }

    /// Credit hints; negative counts credit nothing
    pub fn add_hint(&mut self, count: i64) {
        self.hints = self.hints.saturating_add(clamp_count(count));
    }

    /// Spend a hint and mark a random remaining target found
    pub fn reveal_hint<S: UniformSource + ?Sized>(&mut self, rng: &mut S) -> HintReveal {
        if self.is_win() {
            return HintReveal::NothingLeft;
        }
        if self.hints == 0 {
            return HintReveal::NoHints;
        }

        let remaining = self.remaining_target_ids();
        let Some(id) = pick_hint_target(&remaining, rng).map(str::to_string) else {
            return HintReveal::NothingLeft;
        };
        self.use_hint();
        let won = self.hit(&id) == HitOutcome::Won;
        HintReveal::Revealed { id, won }
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    pub fn total_targets(&self) -> usize {
        self.target_ids.len()
    }

    pub fn hearts(&self) -> u32 {
        self.hearts
    }

    pub fn hints(&self) -> u32 {
        self.hints
    }

    pub fn found(&self) -> &BTreeSet<String> {
        &self.found
    }

    pub fn is_found(&self, id: &str) -> bool {
        self.found.contains(id)
    }

    /// Unfound targets in catalog order
    pub fn remaining_target_ids(&self) -> Vec<String> {
        self.target_ids
            .iter()
            .filter(|id| !self.found.contains(id.as_str()))
            .cloned()
            .collect()
    }

    pub fn is_win(&self) -> bool {
        self.found.len() >= self.target_ids.len()
    }

    pub fn is_fail(&self) -> bool {
        self.hearts == 0
    }

    /// Won takes precedence when both predicates hold
    pub fn status(&self) -> SessionStatus {
        if self.is_win() {
            SessionStatus::Won
        } else if self.is_fail() {
            SessionStatus::Lost
        } else {
            SessionStatus::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn two_target_session() -> GameSession {
        GameSession::new(ids(&["a", "b"]), 3, 1)
    }

    #[test]
    fn test_win_after_all_targets_found() {
        let mut session = two_target_session();
        assert_eq!(session.hit("a"), HitOutcome::Found);
        assert_eq!(session.found_count(), 1);
        assert!(!session.is_win());

        assert_eq!(session.miss(), MissOutcome::Damaged);
        assert_eq!(session.hearts(), 2);

        assert_eq!(session.hit("b"), HitOutcome::Won);
        assert_eq!(session.found_count(), 2);
        assert!(session.is_win());
        assert_eq!(session.status(), SessionStatus::Won);
    }

    #[test]
    fn test_three_misses_fail() {
        let mut session = two_target_session();
        session.miss();
        session.miss();
        assert_eq!(session.miss(), MissOutcome::Failed);
        assert!(session.is_fail());
        assert_eq!(session.status(), SessionStatus::Lost);

        assert_eq!(session.miss(), MissOutcome::Failed);
        assert_eq!(session.hearts(), 0);
    }

    #[test]
    fn test_hit_ignores_unknown_and_repeated_ids() {
        let mut session = two_target_session();
        assert_eq!(session.hit("zzz"), HitOutcome::NoChange);
        assert_eq!(session.hit(""), HitOutcome::NoChange);
        assert_eq!(session.hit("a"), HitOutcome::Found);
        assert_eq!(session.hit("a"), HitOutcome::NoChange);
        assert_eq!(session.found_count(), 1);
        assert!(session.is_found("a"));
        assert_eq!(session.remaining_target_ids(), ["b"]);
    }

    #[test]
    fn test_negative_start_counts_clamp() {
        let session = GameSession::new(ids(&["a"]), -4, -1);
        assert_eq!(session.hearts(), 0);
        assert_eq!(session.hints(), 0);
        assert!(session.is_fail());
    }

    #[test]
    fn test_use_hint_until_exhausted() {
        let mut session = GameSession::new(ids(&["a"]), 3, 2);
        assert!(session.use_hint());
        assert!(session.use_hint());
        assert!(!session.use_hint());
        assert!(!session.use_hint());
        assert_eq!(session.hints(), 0);

        session.add_hint(1);
        assert_eq!(session.hints(), 1);
        session.add_hint(-5);
        assert_eq!(session.hints(), 1);
    }

    #[test]
    fn test_remaining_ids_keep_catalog_order() {
        let mut session = GameSession::new(ids(&["c", "a", "b", "d"]), 3, 0);
        session.hit("a");
        assert_eq!(session.remaining_target_ids(), ["c", "b", "d"]);
    }

    #[test]
    fn test_reveal_hint_marks_target_found() {
        let mut session = GameSession::new(ids(&["a", "b", "c"]), 3, 1);
        let reveal = session.reveal_hint(&mut || 0.0);
        assert_eq!(
            reveal,
            HintReveal::Revealed {
                id: "a".to_string(),
                won: false
            }
        );
        assert!(session.is_found("a"));
        assert_eq!(session.hints(), 0);
        assert_eq!(session.reveal_hint(&mut || 0.0), HintReveal::NoHints);
    }

    #[test]
    fn test_reveal_hint_can_win() {
        let mut session = GameSession::new(ids(&["a", "b"]), 3, 1);
        session.hit("a");
        let reveal = session.reveal_hint(&mut || 0.7);
        assert_eq!(
            reveal,
            HintReveal::Revealed {
                id: "b".to_string(),
                won: true
            }
        );
        assert_eq!(session.status(), SessionStatus::Won);

        session.add_hint(1);
        assert_eq!(session.reveal_hint(&mut || 0.0), HintReveal::NothingLeft);
        assert_eq!(session.hints(), 1);
    }

    #[test]
    fn test_failed_pick_keeps_hint() {
        let mut session = GameSession::new(ids(&["a", "b"]), 3, 1);
        assert_eq!(session.reveal_hint(&mut || 1.0), HintReveal::NothingLeft);
        assert_eq!(session.hints(), 1);
        assert_eq!(session.found_count(), 0);

        assert!(matches!(session.reveal_hint(&mut || 0.5), HintReveal::Revealed { .. }));
        assert_eq!(session.hints(), 0);
    }

    #[test]
    fn test_empty_level_is_won_immediately() {
        let session = GameSession::new(Vec::new(), 3, 1);
        assert!(session.is_win());
    }

    proptest! {
        #[test]
        fn misses_floor_at_zero(h in 0i64..20, k in 0usize..40) {
            let mut session = GameSession::new(ids(&["a"]), h, 0);
            for _ in 0..k {
                session.miss();
            }
            let expected = (h - k as i64).max(0) as u32;
            prop_assert_eq!(session.hearts(), expected);
            prop_assert_eq!(session.is_fail(), expected == 0);
        }

        #[test]
        fn any_hit_order_wins(order in Just(vec!["a", "b", "c", "d"]).prop_shuffle()) {
            let mut session = GameSession::new(ids(&["a", "b", "c", "d"]), 3, 0);
            for (i, id) in order.iter().enumerate() {
                prop_assert!(!session.is_win());
                session.hit(id);
                session.hit(id);
                prop_assert_eq!(session.found_count(), i + 1);
            }
            prop_assert!(session.is_win());
        }

        #[test]
        fn add_hint_credits_non_negative_counts(start in 0i64..10, n in -50i64..50) {
            let mut session = GameSession::new(ids(&["a"]), 3, start);
            session.add_hint(n);
            prop_assert_eq!(i64::from(session.hints()), start + n.max(0));
        }

        #[test]
        fn use_hint_succeeds_exactly_while_positive(start in 0i64..10, calls in 0usize..20) {
            let mut session = GameSession::new(ids(&["a"]), 3, start);
            let mut granted = 0;
            for _ in 0..calls {
                let before = session.hints();
                let ok = session.use_hint();
                prop_assert_eq!(ok, before > 0);
                if ok {
                    granted += 1;
                    prop_assert_eq!(session.hints(), before - 1);
                } else {
                    prop_assert_eq!(session.hints(), 0);
                }
            }
            prop_assert_eq!(granted, calls.min(start as usize));
        }
    }
}
