//! Game settings and preferences
//!
//! Persisted as JSON next to the high score file. A missing or malformed
//! file yields the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::JOYSTICK_DEAD_ZONE;
use crate::persistence::{self, PersistError};

/// Visual theme, which also decides the background décor spawned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    /// Sky blue with clouds
    #[default]
    Day,
    /// Dark sky with stars and a moon
    Night,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Day => "Day",
            Theme::Night => "Night",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "day" => Some(Theme::Day),
            "night" => Some(Theme::Night),
            _ => None,
        }
    }

    /// Cycle to the next theme (menu selection)
    pub fn next(&self) -> Self {
        match self {
            Theme::Day => Theme::Night,
            Theme::Night => Theme::Day,
        }
    }
}

/// Enemy spawn pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPolicy {
    /// Enemy spawner only
    Fixed,
    /// Extra enemies accompany each coin, growing with score and time
    #[default]
    Escalating,
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name recorded with each run
    pub player_name: String,
    pub theme: Theme,
    pub difficulty: DifficultyPolicy,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Input ===
    /// Analog stick dead zone
    pub dead_zone: f32,

    // === Storage ===
    /// Where the high score record lives
    pub highscore_path: PathBuf,
    /// Fixed RNG seed for reproducible runs (random when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            theme: Theme::Day,
            difficulty: DifficultyPolicy::Escalating,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            dead_zone: JOYSTICK_DEAD_ZONE,

            highscore_path: PathBuf::from("highscore.json"),
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let mut settings: Self = persistence::read_json_or_default(path);
        settings.sanitize();
        settings
    }

    /// Save settings to `path` atomically
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::write_json_atomic(path, self)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Pull hand-edited values back into range
    pub fn sanitize(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.dead_zone = self.dead_zone.clamp(0.0, 0.95);
        if self.player_name.trim().is_empty() {
            self.player_name = Self::default().player_name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_theme_cycle_and_parse() {
        assert_eq!(Theme::Day.next(), Theme::Night);
        assert_eq!(Theme::Night.next(), Theme::Day);
        assert_eq!(Theme::from_str("NIGHT"), Some(Theme::Night));
        assert_eq!(Theme::from_str(Theme::Day.as_str()), Some(Theme::Day));
        assert_eq!(Theme::from_str("dusk"), None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(settings.player_name, "Player");
        assert_eq!(settings.dead_zone, JOYSTICK_DEAD_ZONE);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"player_name": "Ace", "theme": "Night", "sfx_volume": 3.0}"#)
            .unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.player_name, "Ace");
        assert_eq!(settings.theme, Theme::Night);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.difficulty, DifficultyPolicy::Escalating);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            player_name: "Zed".to_string(),
            seed: Some(9),
            muted: true,
            ..Default::default()
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.player_name, "Zed");
        assert_eq!(loaded.seed, Some(9));
        assert!(loaded.muted);
    }
}
