//! Game state and session lifecycle
//!
//! Everything the tick mutates lives here: phase, lives, score, the player,
//! the current level, camera, background and the session RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::background::Background;
use super::camera::Camera;
use super::collectible::CollectibleKind;
use super::level::{Level, LevelData, LevelSource};
use super::levels::generate_level;
use super::player::Player;
use crate::error::InitError;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Core objects being constructed
    Loading,
    /// Title screen, waiting for confirm
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen; last state keeps rendering
    Paused,
    /// Lives exhausted or time ran out
    GameOver,
    /// Goal reached, waiting for confirm
    LevelComplete,
}

/// Something that happened during a tick
///
/// The orchestrator maps these to audio and UI; they carry no behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    LevelLoaded { number: u32 },
    Jumped,
    DoubleJumped,
    PlayerHurt { damage: u32, health: u32 },
    EnemyKilled { points: u64 },
    Collected { kind: CollectibleKind, value: u32 },
    ExtraLife { lives: u8 },
    CheckpointActivated { index: usize },
    PlatformCrumbled { index: usize },
    Bounced,
    PlayerDied { lives_left: u8 },
    Respawned,
    LevelCompleted { number: u32, time_bonus: u64, health_bonus: u64 },
    GameOver { score: u64 },
}

/// Score awarded when a level was completed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionBonus {
    pub time_bonus: u64,
    pub health_bonus: u64,
}

impl CompletionBonus {
    pub fn total(&self) -> u64 {
        self.time_bonus + self.health_bonus
    }
}

/// Complete session state
pub struct GameState {
    /// RNG seed for this session
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub level_number: u32,
    pub lives: u8,
    pub score: u64,
    /// Simulation clock (ms); advances only while playing
    pub time_ms: f64,
    /// Simulation frames stepped while playing
    pub frames: u64,
    pub player: Player,
    pub level: Level,
    pub camera: Camera,
    pub background: Background,
    pub tuning: Tuning,
    pub settings: Settings,
    /// Bonus from the most recent completion
    pub last_bonus: Option<CompletionBonus>,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    source: Box<dyn LevelSource>,
}

impl GameState {
    /// Build a session and load level 1 from `source`
    ///
    /// Fails if level 1 is invalid; later level loads fall back to
    /// generated content instead of failing.
    pub fn new(
        tuning: Tuning,
        settings: Settings,
        mut source: Box<dyn LevelSource>,
    ) -> Result<Self, InitError> {
        tuning.validate()?;
        let seed = tuning.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        log::info!("Session seed {seed}");

        let data = source.level_data(1, &mut rng)?;
        data.validate(1)?;
        let level = Level::from_data(1, data, &tuning);

        let player = Player::new(level.spawn, tuning.player);

        let mut camera = Camera::new(tuning.camera);
        camera.set_bounds(level.width, level.height);
        camera.snap_to(player.body.center());

        Ok(Self {
            seed,
            rng,
            phase: GamePhase::Loading,
            level_number: 1,
            lives: tuning.rules.starting_lives,
            score: 0,
            time_ms: 0.0,
            frames: 0,
            background: Background::new(level.theme),
            player,
            level,
            camera,
            settings,
            last_bonus: None,
            events: Vec::new(),
            source,
            tuning,
        })
    }

    pub fn set_phase(&mut self, to: GamePhase) {
        if self.phase == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, to);
        self.events.push(GameEvent::PhaseChanged {
            from: self.phase,
            to,
        });
        self.phase = to;
    }

    fn fetch_level(&mut self, number: u32) -> LevelData {
        let fetched = self
            .source
            .level_data(number, &mut self.rng)
            .and_then(|data| data.validate(number).map(|()| data));
        match fetched {
            Ok(data) => data,
            Err(e) => {
                log::error!("Level {number} unavailable ({e}); generating one instead");
                generate_level(number, &mut self.rng)
            }
        }
    }

    /// Replace the current level and put the player at its spawn
    pub fn load_level(&mut self, number: u32) {
        let data = self.fetch_level(number);
        self.level = Level::from_data(number, data, &self.tuning);
        self.level_number = number;
        self.last_bonus = None;
        self.background.set_theme(self.level.theme);
        self.place_player_at_spawn();
        self.events.push(GameEvent::LevelLoaded { number });
    }

    fn place_player_at_spawn(&mut self) {
        self.player.reset_to(self.level.spawn);
        self.camera.set_bounds(self.level.width, self.level.height);
        self.camera.snap_to(self.player.body.center());
    }

    /// Fresh session from level 1
    pub fn start_game(&mut self) {
        self.score = 0;
        self.lives = self.tuning.rules.starting_lives;
        self.load_level(1);
        self.set_phase(GamePhase::Playing);
    }

    /// Restart the current level keeping score and lives
    pub fn restart_level(&mut self) {
        self.level.reset();
        self.place_player_at_spawn();
        self.set_phase(GamePhase::Playing);
    }

    pub fn next_level(&mut self) {
        self.load_level(self.level_number + 1);
        self.set_phase(GamePhase::Playing);
    }

    /// Player's camera-follow point
    pub fn focus(&self) -> Vec2 {
        self.player.body.center()
    }
}
