//! Audio cue dispatch
//!
//! The simulation never plays sound itself. Game events are mapped to
//! named cues and handed to a `CueSink`, which owns actual playback.
//! One `AudioManager` is created per game and passed around explicitly.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Enemy destroyed or rammed the player
    Explosion,
    /// Coin collected
    Coin,
    /// Heart collected
    HeartPickup,
    /// Bonus heart dropped after a kill streak
    BonusHeart,
    /// Projectile fired
    Laser,
    Pause,
    Resume,
    /// Run ended
    GameOver,
    /// New high score
    HighScore,
    /// Session started
    Start,
}

impl SoundEffect {
    /// Cue name understood by the playback backend
    pub fn cue(&self) -> &'static str {
        match self {
            SoundEffect::Explosion => "explosion",
            SoundEffect::Coin => "coin",
            SoundEffect::HeartPickup => "heart-pickup",
            SoundEffect::BonusHeart => "bonus-heart",
            SoundEffect::Laser => "laser",
            SoundEffect::Pause => "pause",
            SoundEffect::Resume => "resume",
            SoundEffect::GameOver => "game-over",
            SoundEffect::HighScore => "high-score",
            SoundEffect::Start => "start",
        }
    }

    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ProjectileFired => Some(SoundEffect::Laser),
            GameEvent::EnemyDestroyed { .. } | GameEvent::PlayerHit { .. } => {
                Some(SoundEffect::Explosion)
            }
            GameEvent::CoinCollected { .. } => Some(SoundEffect::Coin),
            GameEvent::HeartCollected { .. } => Some(SoundEffect::HeartPickup),
            GameEvent::BonusHeartSpawned { .. } => Some(SoundEffect::BonusHeart),
            GameEvent::Paused => Some(SoundEffect::Pause),
            GameEvent::Resumed => Some(SoundEffect::Resume),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        }
    }
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Music {
    Menu,
    Game,
}

impl Music {
    pub fn cue(&self) -> &'static str {
        match self {
            Music::Menu => "menu-theme",
            Music::Game => "game-theme",
        }
    }
}

/// Playback backend
pub trait CueSink {
    /// Play a one-shot cue at `volume` (0.0 - 1.0)
    fn play_cue(&mut self, cue: &'static str, volume: f32);
    /// Switch background music; `None` stops it
    fn play_music(&mut self, track: Option<&'static str>, volume: f32);
}

/// Backend that only logs cues (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl CueSink for LogSink {
    fn play_cue(&mut self, cue: &'static str, volume: f32) {
        log::debug!("cue {} @ {:.2}", cue, volume);
    }

    fn play_music(&mut self, track: Option<&'static str>, volume: f32) {
        match track {
            Some(track) => log::debug!("music {} @ {:.2}", track, volume),
            None => log::debug!("music stopped"),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager<S: CueSink = LogSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music: Option<Music>,
}

impl Default for AudioManager<LogSink> {
    fn default() -> Self {
        Self::new(LogSink)
    }
}

impl<S: CueSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music: None,
        }
    }

    /// Build a manager with the volumes from `settings`
    pub fn from_settings(settings: &Settings, sink: S) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.muted = settings.muted;
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        let track = if muted { None } else { self.music.map(|m| m.cue()) };
        let vol = self.music_effective_volume();
        self.sink.play_music(track, vol);
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn music_effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play_cue(effect.cue(), vol);
    }

    /// Play the sound for a simulation event
    pub fn on_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }

    /// Switch background music (no-op if already playing `music`)
    pub fn set_music(&mut self, music: Option<Music>) {
        if self.music == music {
            return;
        }
        self.music = music;
        if self.muted {
            return;
        }
        let vol = self.music_effective_volume();
        self.sink.play_music(music.map(|m| m.cue()), vol);
    }

    pub fn music(&self) -> Option<Music> {
        self.music
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Sink that records everything it is asked to play
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub cues: Vec<(&'static str, f32)>,
        pub music: Vec<Option<&'static str>>,
    }

    impl CueSink for RecordingSink {
        fn play_cue(&mut self, cue: &'static str, volume: f32) {
            self.cues.push((cue, volume));
        }

        fn play_music(&mut self, track: Option<&'static str>, _volume: f32) {
            self.music.push(track);
        }
    }

    #[test]
    fn test_event_cues() {
        let mut audio = AudioManager::new(RecordingSink::default());
        audio.on_event(&GameEvent::CoinCollected { score: 1 });
        audio.on_event(&GameEvent::HeartCollected { health: 2 });
        audio.on_event(&GameEvent::PlayerHit { health: 1 });
        let cues: Vec<_> = audio.sink().cues.iter().map(|(c, _)| *c).collect();
        assert_eq!(cues, vec!["coin", "heart-pickup", "explosion"]);
    }

    #[test]
    fn test_volume_and_mute() {
        let mut audio = AudioManager::new(RecordingSink::default());
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0); // clamped to 1.0
        audio.play(SoundEffect::Laser);
        assert_eq!(audio.sink().cues[0], ("laser", 0.5));

        audio.set_muted(true);
        audio.play(SoundEffect::Laser);
        assert_eq!(audio.sink().cues.len(), 1);
    }

    #[test]
    fn test_music_switching() {
        let mut audio = AudioManager::new(RecordingSink::default());
        audio.set_music(Some(Music::Menu));
        audio.set_music(Some(Music::Menu));
        audio.set_music(Some(Music::Game));
        audio.set_muted(true);
        audio.set_muted(false);
        audio.set_music(None);
        assert_eq!(
            audio.sink().music,
            vec![
                Some("menu-theme"),
                Some("game-theme"),
                None,
                Some("game-theme"),
                None
            ]
        );
    }
}
