//! Gameplay core
//!
//! Everything that decides what a tap means lives here. This module is pure
//! and synchronous:
//! - Hit testing is referentially transparent
//! - Hint selection only sees an injected random source
//! - The session holds no reference back into presentation

pub mod hint;
pub mod session;

pub use hint::{HintRng, RngSource, UniformSource, pick_hint_target};
pub use hit_test::find_hit_target;
pub use session::{GameSession, HintReveal, HitOutcome, MissOutcome, SessionStatus};
