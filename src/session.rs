//! Session controller
//!
//! Owns the running `GameState` (if any), the audio manager and the high
//! score store, and moves between the top-level phases:
//!
//! `Menu -> Playing <-> Paused -> Menu`, `Playing -> GameOver -> Playing`
//!
//! Transitions happen only on input commands or when the player's health
//! runs out.

use serde::{Deserialize, Serialize};

use crate::audio::{AudioManager, CueSink, LogSink, Music, SoundEffect};
use crate::highscores::{HighScoreStore, now_timestamp};
use crate::input::{Action, InputEvent, InputState};
use crate::settings::{Settings, Theme};
use crate::sim::{GamePhase, GameState, Hud, tick};

/// Top-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Outcome of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub score: u64,
    pub kills: u32,
    /// Seconds played
    pub elapsed: f32,
    pub new_high_score: bool,
}

/// What the renderer needs besides the entity collections
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub phase: Phase,
    /// `None` in the menu
    pub hud: Option<Hud>,
    pub high_score: u64,
    pub theme: Theme,
}

/// Game instance holding everything one player session needs
pub struct Game<S: CueSink = LogSink> {
    settings: Settings,
    audio: AudioManager<S>,
    scores: HighScoreStore,
    input: InputState,
    session: Option<GameState>,
    theme: Theme,
    /// Autopilot flies the ship (attract mode)
    idle_mode: bool,
    /// Seed for the next session
    next_seed: u64,
    quit: bool,
    last_result: Option<RunResult>,
}

impl<S: CueSink> Game<S> {
    /// Create a game sitting in the menu
    pub fn new(settings: Settings, sink: S) -> Self {
        let audio = AudioManager::from_settings(&settings, sink);
        let scores = HighScoreStore::open(settings.highscore_path.clone());
        let next_seed = settings.seed.unwrap_or_else(rand::random);
        let mut game = Self {
            input: InputState::new(settings.dead_zone),
            theme: settings.theme,
            settings,
            audio,
            scores,
            session: None,
            idle_mode: false,
            next_seed,
            quit: false,
            last_result: None,
        };
        game.audio.set_music(Some(Music::Menu));
        game
    }

    pub fn phase(&self) -> Phase {
        match &self.session {
            None => Phase::Menu,
            Some(state) => match state.phase {
                GamePhase::Playing => Phase::Playing,
                GamePhase::Paused => Phase::Paused,
                GamePhase::GameOver => Phase::GameOver,
            },
        }
    }

    /// Feed one input event
    pub fn handle(&mut self, event: InputEvent) {
        let Some(command) = self.input.apply(event) else {
            return;
        };

        match (self.phase(), command) {
            (_, Action::Quit) => {
                log::info!("Quit requested");
                self.quit = true;
            }
            (Phase::Menu, Action::Start) | (Phase::GameOver, Action::Restart) => {
                self.start_session();
            }
            (Phase::Menu, Action::NextTheme) => {
                self.theme = self.theme.next();
                log::info!("Theme: {}", self.theme.as_str());
            }
            (Phase::Playing, Action::Pause)
            | (Phase::Paused, Action::Pause)
            | (Phase::Paused, Action::Resume) => {
                if let Some(state) = self.session.as_mut() {
                    state.toggle_pause();
                }
                self.dispatch_events();
            }
            (Phase::Paused, Action::Menu) => {
                log::info!("Session abandoned, back to menu");
                self.session = None;
                self.input.clear();
                self.audio.set_music(Some(Music::Menu));
            }
            (phase, command) => {
                log::debug!("Ignoring {:?} in {:?}", command, phase);
            }
        }
    }

    /// Advance one frame. Does nothing outside `Playing`.
    pub fn step(&mut self, dt: f32) {
        let input = self.input.take_tick_input(self.idle_mode);
        let Some(state) = self.session.as_mut() else {
            return;
        };
        if state.phase != GamePhase::Playing {
            return;
        }

        tick(state, &input, dt);
        let over = state.is_over();
        self.dispatch_events();

        if over {
            self.finish_run();
        }
    }

    fn start_session(&mut self) {
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);
        log::info!(
            "Starting session (seed {}, theme {}, {:?})",
            seed,
            self.theme.as_str(),
            self.settings.difficulty
        );

        self.session = Some(GameState::new(seed, self.theme, self.settings.difficulty));
        self.input.clear();
        self.last_result = None;
        self.audio.play(SoundEffect::Start);
        self.audio.set_music(Some(Music::Game));
    }

    /// Record the final score once the session has reached game over
    fn finish_run(&mut self) {
        let Some(state) = self.session.as_ref() else {
            return;
        };
        let hud = state.hud();
        let previous_best = self.scores.high_score();

        if let Err(e) = self
            .scores
            .submit(hud.score, &self.settings.player_name, now_timestamp())
        {
            log::error!(
                "Failed to write high scores to {}: {}",
                self.scores.path().display(),
                e
            );
        }

        let new_high_score = hud.score > previous_best;
        if new_high_score {
            self.audio.play(SoundEffect::HighScore);
        }
        self.audio.set_music(None);

        log::info!(
            "Run over: score {}, kills {}, {:.1}s",
            hud.score,
            hud.kills,
            hud.elapsed
        );
        self.last_result = Some(RunResult {
            score: hud.score,
            kills: hud.kills,
            elapsed: hud.elapsed,
            new_high_score,
        });
    }

    /// Forward pending simulation events to the audio manager
    fn dispatch_events(&mut self) {
        if let Some(state) = self.session.as_mut() {
            for event in state.drain_events() {
                self.audio.on_event(&event);
            }
        }
    }

    pub fn view(&self) -> FrameView {
        FrameView {
            phase: self.phase(),
            hud: self.session.as_ref().map(|s| s.hud()),
            high_score: self.scores.high_score(),
            theme: self.theme,
        }
    }

    /// Running session, for entity snapshots
    pub fn state(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.session.as_mut()
    }

    pub fn high_scores(&self) -> &HighScoreStore {
        &self.scores
    }

    pub fn last_result(&self) -> Option<RunResult> {
        self.last_result
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn audio(&self) -> &AudioManager<S> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager<S> {
        &mut self.audio
    }
}
