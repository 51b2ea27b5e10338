//! Find It entry point
//!
//! Native builds run a line-driven console session; web builds export a
//! `FindIt` handle that the page's presentation layer calls with primitive
//! values.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use find_it::platform::LocalStore;
    use find_it::{App, HintOutcome, HintRng, LevelCatalog, TapOutcome, board_to_normalized};

    /// Tap/hint result codes handed to JavaScript
    pub mod code {
        pub const NO_SESSION: i32 = -1;
        pub const IGNORED: i32 = 0;
        pub const FOUND: i32 = 1;
        pub const WON: i32 = 2;
        pub const MISSED: i32 = 3;
        pub const FAILED: i32 = 4;
        pub const REWARD_OFFERED: i32 = 5;
    }

    /// Level ids that do not fit an `i32` report as no session
    fn level_code(id: u32) -> i32 {
        i32::try_from(id).unwrap_or(code::NO_SESSION)
    }

    #[wasm_bindgen]
    pub struct FindIt {
        app: App<LocalStore>,
        rng: HintRng,
        last_found: Option<String>,
    }

    #[wasm_bindgen]
    impl FindIt {
        #[wasm_bindgen(constructor)]
        pub fn new() -> FindIt {
            Self {
                app: App::new(LevelCatalog::builtin(), LocalStore),
                rng: HintRng::from_entropy(),
                last_found: None,
            }
        }

        pub fn current_level(&self) -> u32 {
            self.app.current_level()
        }

        pub fn level_count(&self) -> usize {
            self.app.catalog().len()
        }

        pub fn is_unlocked(&self, id: u32) -> bool {
            self.app.progress().is_unlocked(i64::from(id))
        }

        pub fn start_level(&mut self, id: u32) -> u32 {
            self.last_found = None;
            self.app.start_level(id)
        }

        pub fn retry(&mut self) -> i32 {
            self.app.retry().map_or(code::NO_SESSION, level_code)
        }

        pub fn next_level(&mut self) -> i32 {
            self.app.next_level().map_or(code::NO_SESSION, level_code)
        }

        /// Tap in board-local pixels (origin at the board center)
        pub fn tap(&mut self, local_x: f32, local_y: f32, width: f32, height: f32) -> i32 {
            let Some(point) =
                board_to_normalized(Vec2::new(local_x, local_y), Vec2::new(width, height))
            else {
                return code::IGNORED;
            };
            match self.app.tap(point) {
                Ok(TapOutcome::Found { id, won }) => {
                    self.last_found = Some(id);
                    if won { code::WON } else { code::FOUND }
                }
                Ok(TapOutcome::Missed { failed, .. }) => {
                    if failed { code::FAILED } else { code::MISSED }
                }
                Ok(TapOutcome::Ignored) => code::IGNORED,
                Err(_) => code::NO_SESSION,
            }
        }

        pub fn hint(&mut self) -> i32 {
            match self.app.request_hint(&mut self.rng) {
                Ok(HintOutcome::Revealed { id, won }) => {
                    self.last_found = Some(id);
                    if won { code::WON } else { code::FOUND }
                }
                Ok(HintOutcome::RewardOffered) => code::REWARD_OFFERED,
                Ok(HintOutcome::Ignored) => code::IGNORED,
                Err(_) => code::NO_SESSION,
            }
        }

        /// Id of the most recently found target, for placing its marker
        pub fn last_found(&self) -> Option<String> {
            self.last_found.clone()
        }

        pub fn watch_reward(&mut self) -> bool {
            self.app.watch_reward()
        }

        pub fn cancel_reward(&mut self) -> bool {
            self.app.cancel_reward()
        }

        /// Advance timers by `dt` seconds; returns hints credited (0 if none)
        pub fn update(&mut self, dt: f32) -> u32 {
            self.app.advance(dt).unwrap_or(0)
        }

        pub fn found_count(&self) -> usize {
            self.app.session().map_or(0, |s| s.found_count())
        }

        pub fn target_count(&self) -> usize {
            self.app.session().map_or(0, |s| s.total_targets())
        }

        pub fn hearts(&self) -> u32 {
            self.app.session().map_or(0, |s| s.hearts())
        }

        pub fn hints(&self) -> u32 {
            self.app.session().map_or(0, |s| s.hints())
        }

        pub fn toggle_music(&mut self) -> bool {
            self.app.toggle_music()
        }

        pub fn toggle_sfx(&mut self) -> bool {
            self.app.toggle_sfx()
        }
    }

    impl Default for FindIt {
        fn default() -> Self {
            Self::new()
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Find It starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Find It (native) starting...");

    let save_path = std::env::var("FIND_IT_SAVE").unwrap_or_else(|_| "find-it-save.json".to_string());
    console::run(&save_path);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod console {
    use std::io::{self, BufRead, Write};

    use glam::Vec2;

    use find_it::platform::FileStore;
    use find_it::{App, HintOutcome, HintRng, LevelCatalog, TapOutcome};

    const HELP: &str = "commands: levels | play <id> | tap <x> <y> | hint | watch | cancel | \
                        wait <secs> | retry | next | status | music | sfx | help | quit";

    pub fn run(save_path: &str) {
        let mut app = App::new(LevelCatalog::builtin(), FileStore::open(save_path));
        let mut rng = HintRng::from_entropy();

        println!("Find It - current level {}", app.current_level());
        println!("{}", HELP);

        let stdin = io::stdin();
        loop {
            prompt(&mut io::stdout());

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    log::warn!("Failed to read input: {}", err);
                    break;
                }
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                [] => {}
                ["quit" | "exit"] => break,
                ["help"] => println!("{}", HELP),
                ["levels"] => {
                    for entry in app.level_entries() {
                        let lock = if entry.unlocked { "" } else { " (locked)" };
                        println!("  {}. {}{}", entry.id, entry.title, lock);
                    }
                }
                ["play", id] => match id.parse::<u32>() {
                    Ok(id) => match app.select_level(id) {
                        Ok(started) => {
                            println!("Level {} started", started);
                            print_status(&app);
                        }
                        Err(err) => println!("{}", err),
                    },
                    Err(_) => println!("level id must be a number"),
                },
                ["tap", x, y] => match (x.parse::<f32>(), y.parse::<f32>()) {
                    (Ok(x), Ok(y)) => match app.tap(Vec2::new(x, y)) {
                        Ok(TapOutcome::Found { id, won }) => {
                            println!("Found {}!", id);
                            if won {
                                println!("Level cleared!");
                            }
                        }
                        Ok(TapOutcome::Missed { hearts, failed }) => {
                            println!("Miss. Hearts left: {}", hearts);
                            if failed {
                                println!("Out of hearts. Try `retry`.");
                            }
                        }
                        Ok(TapOutcome::Ignored) => println!("(ignored)"),
                        Err(err) => println!("{}", err),
                    },
                    _ => println!("tap takes normalized coordinates, e.g. `tap 0.25 0.7`"),
                },
                ["hint"] => match app.request_hint(&mut rng) {
                    Ok(HintOutcome::Revealed { id, won }) => {
                        println!("Hint revealed {}", id);
                        if won {
                            println!("Level cleared!");
                        }
                    }
                    Ok(HintOutcome::RewardOffered) => {
                        println!("No hints left. `watch` a reward for +1, or `cancel`.")
                    }
                    Ok(HintOutcome::Ignored) => println!("(ignored)"),
                    Err(err) => println!("{}", err),
                },
                ["watch"] => {
                    if app.watch_reward() {
                        println!("Reward playing... `wait 2` to finish");
                    }
                }
                ["cancel"] => {
                    app.cancel_reward();
                }
                ["wait", secs] => match secs.parse::<f32>() {
                    Ok(secs) => {
                        if let Some(hints) = app.advance(secs) {
                            println!("Earned {} hint(s)", hints);
                        }
                    }
                    Err(_) => println!("wait takes seconds, e.g. `wait 2`"),
                },
                ["retry"] => match app.retry() {
                    Ok(id) => println!("Level {} restarted", id),
                    Err(err) => println!("{}", err),
                },
                ["next"] => match app.next_level() {
                    Ok(id) => println!("Level {} started", id),
                    Err(err) => println!("{}", err),
                },
                ["status"] => print_status(&app),
                ["music"] => println!("Music: {}", on_off(app.toggle_music())),
                ["sfx"] => println!("Sound effects: {}", on_off(app.toggle_sfx())),
                _ => println!("{}", HELP),
            }
        }
    }

    /// Write the input prompt; a failed flush only costs the prompt
    fn prompt<W: Write>(out: &mut W) {
        if let Err(err) = out.write_all(b"> ").and_then(|()| out.flush()) {
            log::warn!("Failed to write prompt: {}", err);
        }
    }

    fn print_status(app: &App<FileStore>) {
        match (app.active_level(), app.session()) {
            (Ok(level), Ok(session)) => println!(
                "{} - found {}/{} - hearts {} - hints {}",
                level.title,
                session.found_count(),
                level.target_count,
                session.hearts(),
                session.hints()
            ),
            _ => println!("No level in progress (current level {})", app.current_level()),
        }
    }

    fn on_off(enabled: bool) -> &'static str {
        if enabled { "on" } else { "off" }
    }

}
