//! Audio boundary
//!
//! The simulation only names sound events; synthesis lives behind
//! [`AudioSink`]. Playback is fire-and-forget: failures are logged and
//! dropped, never propagated into the game loop.

use crate::error::AudioError;
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ground jump taken
    Jump,
    /// Airborne second jump taken
    DoubleJump,
    /// Player took damage
    Hit,
    /// Item collected
    Collect,
    /// Checkpoint activated
    Checkpoint,
    /// Enemy stomped
    EnemyDeath,
    /// Launched by a bouncy platform
    Bounce,
    /// Goal reached
    LevelComplete,
    /// Lives exhausted or time ran out
    GameOver,
}

impl SoundEffect {
    /// Event name handed to the sink
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::DoubleJump => "doubleJump",
            SoundEffect::Hit => "hit",
            SoundEffect::Collect => "collect",
            SoundEffect::Checkpoint => "checkpoint",
            SoundEffect::EnemyDeath => "enemyDeath",
            SoundEffect::Bounce => "bounce",
            SoundEffect::LevelComplete => "levelComplete",
            SoundEffect::GameOver => "gameOver",
        }
    }

    /// Mix level before settings are applied
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Jump | SoundEffect::DoubleJump => 0.3,
            SoundEffect::Hit => 0.5,
            SoundEffect::Collect => 0.4,
            SoundEffect::Checkpoint => 0.5,
            SoundEffect::EnemyDeath => 0.4,
            SoundEffect::Bounce => 0.35,
            SoundEffect::LevelComplete | SoundEffect::GameOver => 0.6,
        }
    }
}

/// Something that can play a named sound
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Sink that discards everything (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sink that reports each sound to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::debug!("sfx {} @ {:.2}", effect.name(), volume);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioDispatcher {
    sink: Box<dyn AudioSink>,
    volume: f32,
}

impl AudioDispatcher {
    pub fn new(sink: Box<dyn AudioSink>, settings: &Settings) -> Self {
        Self {
            sink,
            volume: settings.effective_volume(),
        }
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Play a sound effect; errors are swallowed
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = effect.base_volume() * self.volume;
        if vol <= 0.0 {
            return;
        }
        if let Err(e) = self.sink.play(effect, vol) {
            log::warn!("Failed to play {}: {}", effect.name(), e);
        }
    }
}
