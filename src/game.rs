//! Frame-driven orchestrator
//!
//! Owns the session state, the input snapshot pair and the audio
//! dispatcher. The host calls [`Game::frame`] once per rendered frame with a
//! wall-clock timestamp and the actions held; everything else is derived.

use serde::Serialize;

use crate::audio::{AudioDispatcher, AudioSink, SoundEffect};
use crate::error::InitError;
use crate::input::{ActionSet, InputState};
use crate::settings::Settings;
use crate::sim::camera::ViewTransform;
use crate::sim::collectible::CollectibleKind;
use crate::sim::enemy::{EnemyKind, EnemyState};
use crate::sim::level::{LevelSource, Theme};
use crate::sim::levels::BuiltinLevels;
use crate::sim::platform::{Debris, PlatformKind};
use crate::sim::player::{Facing, PlayerAnim};
use crate::sim::rect::Rect;
use crate::sim::state::{GameEvent, GamePhase, GameState};
use crate::sim::{ParallaxLayer, Solid, tick};
use crate::tuning::Tuning;

/// Extra world margin around the view when culling snapshot entities
const CULL_MARGIN: f32 = 64.0;
/// Invulnerability blink period
const BLINK_MS: f64 = 100.0;

pub struct Game {
    state: GameState,
    input: InputState,
    audio: AudioDispatcher,
    last_frame_ms: Option<f64>,
}

impl Game {
    /// Start a session on the built-in levels
    pub fn new(
        tuning: Tuning,
        settings: Settings,
        sink: Box<dyn AudioSink>,
    ) -> Result<Self, InitError> {
        Self::with_source(tuning, settings, sink, Box::new(BuiltinLevels))
    }

    /// Start a session from JSON tuning and settings documents
    pub fn from_json(
        tuning_json: &str,
        settings_json: &str,
        sink: Box<dyn AudioSink>,
    ) -> Result<Self, InitError> {
        let tuning = Tuning::from_json(tuning_json)?;
        let settings = Settings::from_json(settings_json)?;
        Self::new(tuning, settings, sink)
    }

    /// Start a session on an external level source
    pub fn with_source(
        tuning: Tuning,
        settings: Settings,
        sink: Box<dyn AudioSink>,
        source: Box<dyn LevelSource>,
    ) -> Result<Self, InitError> {
        let audio = AudioDispatcher::new(sink, &settings);
        let mut state = GameState::new(tuning, settings, source)?;
        state.set_phase(GamePhase::Menu);
        state.events.clear();
        log::info!("Game initialized (seed {})", state.seed);
        Ok(Self {
            state,
            input: InputState::new(),
            audio,
            last_frame_ms: None,
        })
    }

    /// Clamp a raw frame delta to the simulation's allowed range
    pub fn clamp_dt(&self, dt_ms: f64) -> f64 {
        let max = self.state.tuning.rules.max_frame_dt_ms;
        if !dt_ms.is_finite() || dt_ms < 0.0 {
            return 0.0;
        }
        if dt_ms > max {
            log::warn!("Frame delta {dt_ms:.1}ms clamped to {max}ms");
            return max;
        }
        dt_ms
    }

    /// Run one frame at wall-clock time `now_ms`
    ///
    /// The first frame uses the nominal frame duration.
    pub fn frame(&mut self, now_ms: f64, held: ActionSet) -> &[GameEvent] {
        let raw = match self.last_frame_ms {
            Some(last) => now_ms - last,
            None => crate::consts::NOMINAL_FRAME_MS,
        };
        self.last_frame_ms = Some(now_ms);
        self.step(raw, held)
    }

    /// Run one frame with an explicit (unclamped) delta
    pub fn step(&mut self, dt_ms: f64, held: ActionSet) -> &[GameEvent] {
        let dt = self.clamp_dt(dt_ms);
        self.input.begin_frame(held);
        tick(&mut self.state, &self.input, dt);
        self.dispatch_audio();
        &self.state.events
    }

    fn dispatch_audio(&mut self) {
        for event in &self.state.events {
            let effect = match event {
                GameEvent::Jumped => SoundEffect::Jump,
                GameEvent::DoubleJumped => SoundEffect::DoubleJump,
                GameEvent::PlayerHurt { .. } => SoundEffect::Hit,
                GameEvent::Collected { .. } => SoundEffect::Collect,
                GameEvent::CheckpointActivated { .. } => SoundEffect::Checkpoint,
                GameEvent::EnemyKilled { .. } => SoundEffect::EnemyDeath,
                GameEvent::Bounced => SoundEffect::Bounce,
                GameEvent::LevelCompleted { .. } => SoundEffect::LevelComplete,
                GameEvent::GameOver { .. } => SoundEffect::GameOver,
                _ => continue,
            };
            self.audio.play(effect);
        }
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        self.state.settings = settings;
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Read-only view of everything the renderer draws this frame
    pub fn snapshot(&self) -> RenderSnapshot {
        let state = &self.state;
        let camera = &state.camera;
        let now = state.time_ms;
        let player = &state.player;

        let blink_hidden = player.invulnerable
            && (player.invulnerable_remaining_ms(now) / BLINK_MS) as u64 % 2 == 1;

        RenderSnapshot {
            phase: state.phase,
            view: camera.view_transform(),
            flash_alpha: camera.flash_alpha(),
            theme: state.level.theme,
            background: state.background.layers.clone(),
            goal: state.level.goal,
            player: PlayerView {
                rect: player.body.rect(),
                facing: player.facing,
                anim: player.anim,
                visible: !blink_hidden,
            },
            platforms: state
                .level
                .platforms
                .iter()
                .filter(|p| camera.is_visible(&p.rect, CULL_MARGIN) || !p.debris().is_empty())
                .map(|p| PlatformView {
                    rect: p.rect,
                    kind: match p.kind {
                        PlatformKind::Static => PlatformTag::Static,
                        PlatformKind::Moving(_) => PlatformTag::Moving,
                        PlatformKind::Crumbling(_) => PlatformTag::Crumbling,
                        PlatformKind::Bouncy(_) => PlatformTag::Bouncy,
                    },
                    solid: p.solid_rect().is_some(),
                    squash: p.squash(),
                    debris: p.debris().to_vec(),
                })
                .collect(),
            enemies: state
                .level
                .enemies
                .iter()
                .filter(|e| camera.is_visible(&e.rect(), CULL_MARGIN))
                .map(|e| EnemyView {
                    rect: e.rect(),
                    kind: e.kind,
                    state: e.state,
                    direction: e.direction,
                })
                .collect(),
            collectibles: state
                .level
                .collectibles
                .iter()
                .filter(|c| c.is_visible() && camera.is_visible(&c.rect, CULL_MARGIN))
                .map(|c| CollectibleView {
                    rect: c.rect,
                    kind: c.kind,
                    collected: c.collected,
                    progress: c.collect_progress,
                })
                .collect(),
            checkpoints: state
                .level
                .checkpoints
                .iter()
                .map(|c| CheckpointView {
                    rect: c.rect,
                    activated: c.activated,
                })
                .collect(),
            hud: Hud {
                score: state.score,
                lives: state.lives,
                level: state.level_number,
                health: player.health,
                max_health: player.max_health,
                time_remaining_s: state.level.time_remaining_ms().map(|ms| (ms / 1000.0).ceil()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlatformTag {
    Static,
    Moving,
    Crumbling,
    Bouncy,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    pub facing: Facing,
    pub anim: PlayerAnim,
    /// False on the off-beat of the invulnerability blink
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformView {
    pub rect: Rect,
    pub kind: PlatformTag,
    pub solid: bool,
    pub squash: f32,
    pub debris: Vec<Debris>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub rect: Rect,
    pub kind: EnemyKind,
    pub state: EnemyState,
    pub direction: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectibleView {
    pub rect: Rect,
    pub kind: CollectibleKind,
    pub collected: bool,
    pub progress: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckpointView {
    pub rect: Rect,
    pub activated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub time_remaining_s: Option<f64>,
}

/// Per-frame renderer input
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub view: ViewTransform,
    pub flash_alpha: f32,
    pub theme: Theme,
    pub background: Vec<ParallaxLayer>,
    pub goal: Rect,
    pub player: PlayerView,
    pub platforms: Vec<PlatformView>,
    pub enemies: Vec<EnemyView>,
    pub collectibles: Vec<CollectibleView>,
    pub checkpoints: Vec<CheckpointView>,
    pub hud: Hud,
}
