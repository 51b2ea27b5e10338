//! Application controller
//!
//! Render-free glue between the presentation layer and the gameplay core.
//! Presentation forwards primitive events (a tap position, a button press,
//! elapsed time) and draws from the plain values returned here.

use glam::Vec2;
use thiserror::Error;

use crate::catalog::{LevelCatalog, LevelDefinition};
use crate::platform::KeyValueStore;
use crate::play::{GameSession, HintReveal, HitOutcome, MissOutcome, UniformSource, find_hit_target};
use crate::progress::ProgressStore;
use crate::reward::RewardFlow;
use crate::settings::Settings;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    #[error("No level has been started")]
    NoActiveSession,
    #[error("Level {0} is locked")]
    LevelLocked(u32),
}

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    MainMenu,
    LevelSelect,
    Playing,
}

/// One row of the level selection screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub id: u32,
    pub title: String,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    Found { id: String, won: bool },
    Missed { hearts: u32, failed: bool },
    /// Level already over, or a reward prompt is open
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintOutcome {
    Revealed { id: String, won: bool },
    /// Out of hints; the reward prompt is now open
    RewardOffered,
    Ignored,
}

/// Map board-local coordinates (origin at the board center) into `[0, 1]` space
///
/// Returns `None` for a degenerate board.
pub fn board_to_normalized(local: Vec2, board_size: Vec2) -> Option<Vec2> {
    if board_size.x <= 0.0 || board_size.y <= 0.0 {
        return None;
    }
    Some(local / board_size + Vec2::splat(0.5))
}

struct ActiveLevel {
    level: LevelDefinition,
    session: GameSession,
}

pub struct App<S: KeyValueStore> {
    catalog: LevelCatalog,
    progress: ProgressStore<S>,
    settings: Settings,
    view: View,
    active: Option<ActiveLevel>,
    reward: RewardFlow,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(catalog: LevelCatalog, storage: S) -> Self {
        let progress = ProgressStore::load(storage);
        let settings = Settings::load(progress.storage());
        Self {
            catalog,
            progress,
            settings,
            view: View::MainMenu,
            active: None,
            reward: RewardFlow::default(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressStore<S> {
        &self.progress
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn reward(&self) -> &RewardFlow {
        &self.reward
    }

    /// Furthest level reached, for the main menu
    pub fn current_level(&self) -> u32 {
        self.progress.current_level()
    }

    pub fn show_main_menu(&mut self) {
        self.view = View::MainMenu;
    }

    pub fn show_level_select(&mut self) {
        self.view = View::LevelSelect;
    }

    pub fn level_entries(&self) -> Vec<LevelEntry> {
        self.catalog
            .iter()
            .map(|level| LevelEntry {
                id: level.id,
                title: level.title.clone(),
                unlocked: self.progress.is_unlocked(i64::from(level.id)),
            })
            .collect()
    }

    /// Start a level from the selection screen, refusing locked ones
    pub fn select_level(&mut self, id: u32) -> Result<u32, AppError> {
        if !self.progress.is_unlocked(i64::from(id)) {
            return Err(AppError::LevelLocked(id));
        }
        Ok(self.start_level(id))
    }

    /// Start (or restart) a level; unknown ids fall back to the first level
    ///
    /// Returns the id of the level actually started.
    pub fn start_level(&mut self, id: u32) -> u32 {
        let level = match self.catalog.get(id) {
            Some(level) => level.clone(),
            None => {
                log::warn!("Level {} not in catalog, starting first level", id);
                self.catalog.first().clone()
            }
        };

        log::info!("Starting level {} ({})", level.id, level.title);
        let started = level.id;
        self.active = Some(ActiveLevel {
            session: GameSession::from_level(&level),
            level,
        });
        self.reward.reset();
        self.view = View::Playing;
        started
    }

    pub fn retry(&mut self) -> Result<u32, AppError> {
        let id = self.active_level()?.id;
        Ok(self.start_level(id))
    }

    pub fn next_level(&mut self) -> Result<u32, AppError> {
        let id = self.active_level()?.id;
        Ok(self.start_level(id.saturating_add(1)))
    }

    pub fn active_level(&self) -> Result<&LevelDefinition, AppError> {
        self.active
            .as_ref()
            .map(|a| &a.level)
            .ok_or(AppError::NoActiveSession)
    }

    pub fn session(&self) -> Result<&GameSession, AppError> {
        self.active
            .as_ref()
            .map(|a| &a.session)
            .ok_or(AppError::NoActiveSession)
    }

    /// Resolve a tap at a normalized board position
    pub fn tap(&mut self, point: Vec2) -> Result<TapOutcome, AppError> {
        let reward_open = self.reward.is_active();
        let active = self.active.as_mut().ok_or(AppError::NoActiveSession)?;
        if reward_open || active.session.status().is_finished() {
            return Ok(TapOutcome::Ignored);
        }

        let hit = find_hit_target(point, &active.level.targets, active.session.found())
            .map(str::to_string);
        log::debug!("Tap at ({:.3}, {:.3}) -> {:?}", point.x, point.y, hit);

        let outcome = match hit {
            Some(id) => {
                let won = active.session.hit(&id) == HitOutcome::Won;
                TapOutcome::Found { id, won }
            }
            None => {
                let failed = active.session.miss() == MissOutcome::Failed;
                if failed {
                    log::info!("Level {} failed", active.level.id);
                }
                TapOutcome::Missed {
                    hearts: active.session.hearts(),
                    failed,
                }
            }
        };

        if matches!(outcome, TapOutcome::Found { won: true, .. }) {
            self.record_win();
        }
        Ok(outcome)
    }

    /// Spend a hint, or open the reward prompt when none remain
    pub fn request_hint<R: UniformSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<HintOutcome, AppError> {
        let reward_open = self.reward.is_active();
        let active = self.active.as_mut().ok_or(AppError::NoActiveSession)?;
        if reward_open || active.session.status().is_finished() {
            return Ok(HintOutcome::Ignored);
        }

        match active.session.reveal_hint(rng) {
            HintReveal::Revealed { id, won } => {
                log::debug!("Hint revealed {}", id);
                if won {
                    self.record_win();
                }
                Ok(HintOutcome::Revealed { id, won })
            }
            HintReveal::NoHints => {
                self.reward.offer();
                Ok(HintOutcome::RewardOffered)
            }
            HintReveal::NothingLeft => Ok(HintOutcome::Ignored),
        }
    }

    pub fn watch_reward(&mut self) -> bool {
        self.reward.watch()
    }

    pub fn cancel_reward(&mut self) -> bool {
        self.reward.cancel()
    }

    /// Advance timed flows by `dt` seconds; returns hints credited, if any
    pub fn advance(&mut self, dt: f32) -> Option<u32> {
        let grant = self.reward.advance(dt)?;
        let active = self.active.as_mut()?;
        active.session.add_hint(i64::from(grant.hints));
        Some(grant.hints)
    }

    pub fn toggle_music(&mut self) -> bool {
        let enabled = self.settings.toggle_music();
        self.settings.save(self.progress.storage_mut());
        enabled
    }

    pub fn toggle_sfx(&mut self) -> bool {
        let enabled = self.settings.toggle_sfx();
        self.settings.save(self.progress.storage_mut());
        enabled
    }

    fn record_win(&mut self) {
        if let Some(active) = &self.active {
            log::info!("Level {} cleared", active.level.id);
            self.progress.mark_level_cleared(i64::from(active.level.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    fn app() -> App<MemoryStore> {
        App::new(LevelCatalog::builtin(), MemoryStore::new())
    }

    fn target_point(app: &App<MemoryStore>, id: &str) -> Vec2 {
        app.active_level().unwrap().target(id).unwrap().center()
    }

    const MISS: Vec2 = Vec2::new(0.5, 0.5);

    #[test]
    fn test_requires_started_level() {
        let mut app = app();
        assert_eq!(app.view(), View::MainMenu);
        assert_eq!(app.tap(MISS), Err(AppError::NoActiveSession));
        assert_eq!(app.request_hint(&mut || 0.0), Err(AppError::NoActiveSession));
        assert_eq!(app.retry(), Err(AppError::NoActiveSession));
        assert!(app.session().is_err());
    }

    #[test]
    fn test_win_unlocks_next_level() {
        let mut app = app();
        app.show_level_select();
        assert_eq!(app.select_level(2), Err(AppError::LevelLocked(2)));
        assert_eq!(app.select_level(1), Ok(1));
        assert_eq!(app.view(), View::Playing);

        let first = target_point(&app, "l1-1");
        assert_eq!(
            app.tap(first).unwrap(),
            TapOutcome::Found {
                id: "l1-1".to_string(),
                won: false
            }
        );
        assert_eq!(app.tap(first).unwrap(), TapOutcome::Missed { hearts: 2, failed: false });

        let second = target_point(&app, "l1-2");
        assert_eq!(
            app.tap(second).unwrap(),
            TapOutcome::Found {
                id: "l1-2".to_string(),
                won: true
            }
        );
        assert_eq!(app.tap(MISS).unwrap(), TapOutcome::Ignored);
        assert_eq!(app.current_level(), 2);

        let entries = app.level_entries();
        assert!(entries[0].unlocked && entries[1].unlocked && !entries[2].unlocked);
        assert_eq!(app.next_level(), Ok(2));
        assert_eq!(app.session().unwrap().total_targets(), 3);
    }

    #[test]
    fn test_misses_fail_level_and_retry_resets() {
        let mut app = app();
        app.start_level(1);
        app.tap(MISS).unwrap();
        app.tap(MISS).unwrap();
        assert_eq!(app.tap(MISS).unwrap(), TapOutcome::Missed { hearts: 0, failed: true });
        assert_eq!(app.tap(target_point(&app, "l1-1")).unwrap(), TapOutcome::Ignored);
        assert!(!app.progress().is_unlocked(2));

        assert_eq!(app.retry(), Ok(1));
        assert_eq!(app.session().unwrap().hearts(), 3);
    }

    #[test]
    fn test_hint_then_reward_flow() {
        let mut app = app();
        app.start_level(2);
        assert_eq!(
            app.request_hint(&mut || 0.0).unwrap(),
            HintOutcome::Revealed {
                id: "l2-1".to_string(),
                won: false
            }
        );
        assert_eq!(app.request_hint(&mut || 0.0).unwrap(), HintOutcome::RewardOffered);
        assert_eq!(app.tap(MISS).unwrap(), TapOutcome::Ignored);

        assert!(app.watch_reward());
        assert!(!app.cancel_reward());
        assert_eq!(app.advance(1.0), None);
        assert_eq!(app.advance(1.0), Some(1));
        assert_eq!(app.session().unwrap().hints(), 1);

        assert!(matches!(
            app.request_hint(&mut || 0.0).unwrap(),
            HintOutcome::Revealed { won: false, .. }
        ));
    }

    #[test]
    fn test_cancelled_reward_grants_nothing() {
        let mut app = app();
        app.start_level(1);
        app.request_hint(&mut || 0.0).unwrap();
        assert_eq!(app.request_hint(&mut || 0.0).unwrap(), HintOutcome::RewardOffered);
        assert!(app.cancel_reward());
        assert_eq!(app.advance(10.0), None);
        assert_eq!(app.session().unwrap().hints(), 0);
        assert!(matches!(app.tap(MISS).unwrap(), TapOutcome::Missed { .. }));
    }

    #[test]
    fn test_ignored_hint_is_not_spent() {
        let mut app = app();
        app.start_level(1);
        let hints = app.session().unwrap().hints();
        assert_eq!(app.request_hint(&mut || 1.0).unwrap(), HintOutcome::Ignored);
        assert_eq!(app.session().unwrap().hints(), hints);
        assert_eq!(app.session().unwrap().found_count(), 0);
    }

    #[test]
    fn test_hint_can_win_level() {
        let mut app = app();
        app.start_level(1);
        app.tap(target_point(&app, "l1-1")).unwrap();
        assert_eq!(
            app.request_hint(&mut || 0.0).unwrap(),
            HintOutcome::Revealed {
                id: "l1-2".to_string(),
                won: true
            }
        );
        assert!(app.progress().is_unlocked(2));
        assert_eq!(app.request_hint(&mut || 0.0).unwrap(), HintOutcome::Ignored);
    }

    #[test]
    fn test_unknown_level_falls_back_to_first() {
        let mut app = app();
        assert_eq!(app.start_level(42), 1);
        assert_eq!(app.active_level().unwrap().id, 1);

        app.start_level(5);
        assert_eq!(app.next_level(), Ok(1));
    }

    #[test]
    fn test_progress_and_settings_persist_across_apps() {
        let mut memory = MemoryStore::new();
        {
            let mut app = App::new(LevelCatalog::builtin(), &mut memory);
            app.start_level(1);
            let a = app.active_level().unwrap().target("l1-1").unwrap().center();
            let b = app.active_level().unwrap().target("l1-2").unwrap().center();
            app.tap(a).unwrap();
            app.tap(b).unwrap();
            assert!(!app.toggle_sfx());
        }

        let app = App::new(LevelCatalog::builtin(), &mut memory);
        assert_eq!(app.current_level(), 2);
        assert!(!app.settings().sfx);
        assert!(app.settings().music);
        assert!(app.session().is_err());
    }

    #[test]
    fn test_board_to_normalized() {
        let size = Vec2::new(960.0, 640.0);
        assert_eq!(board_to_normalized(Vec2::ZERO, size), Some(Vec2::new(0.5, 0.5)));
        assert_eq!(
            board_to_normalized(Vec2::new(-480.0, 320.0), size),
            Some(Vec2::new(0.0, 1.0))
        );
        assert_eq!(board_to_normalized(Vec2::ZERO, Vec2::new(0.0, 10.0)), None);
    }
}
