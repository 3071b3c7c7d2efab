//! Sky Shooter - A side-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, game state)
//! - `session`: Menu / play / pause / game over state machine
//! - `input`: Decoding of `{action, value}` input events
//! - `audio`: Named sound cues for an external playback backend
//! - `persistence`: Atomic JSON save/load
//! - `highscores`: Persisted high score record

pub mod audio;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreRecord, HighScoreStore};
pub use session::{Game, Phase};
pub use settings::{DifficultyPolicy, Settings, Theme};

/// Game configuration constants
pub mod consts {
    /// Nominal frame step (one tick per rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta fed to the spawners (avoids spawn bursts after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Screen dimensions (y axis points up)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Spawned entities start with their left edge this far past the right edge, at most
    pub const SPAWN_X_JITTER: i32 = 80;
    /// Entities moving right are dropped once their left edge is this far past the screen
    pub const OFFSCREEN_RIGHT_MARGIN: f32 = 200.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_START_X: f32 = 10.0; // left edge
    /// Pixels per tick at full stick / key press
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const START_HEALTH: u8 = 3;
    pub const MAX_HEALTH: u8 = 4;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 15.0;
    pub const FIRE_COOLDOWN_TICKS: u32 = 8;

    /// Explosion animation (frames x ticks per frame)
    pub const EXPLOSION_FRAMES: u32 = 6;
    pub const EXPLOSION_TICKS_PER_FRAME: u32 = 4;

    /// Every Nth projectile kill drops a bonus heart
    pub const BONUS_HEART_EVERY: u32 = 10;

    /// Analog stick magnitudes below this read as zero
    pub const JOYSTICK_DEAD_ZONE: f32 = 0.15;
}
