//! Level model
//!
//! [`LevelData`] is the serializable description a content source hands
//! over; [`Level`] is the live world built from it. The level owns every
//! platform, enemy, collectible and checkpoint, and is the only place
//! expired enemies are removed.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::checkpoint::Checkpoint;
use super::collectible::{Collectible, CollectibleKind};
use super::collision::carry_rider;
use super::enemy::{Enemy, EnemyKind};
use super::platform::{MoveAxis, Platform, PlatformEvent};
use super::player::{Player, WorldBounds};
use super::rect::Rect;
use super::state::GameEvent;
use crate::consts::{GOAL_HEIGHT, GOAL_WIDTH};
use crate::error::{ConfigError, InitError};
use crate::tuning::Tuning;

/// Visual theme (background layers, palette)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Meadow,
    Cavern,
    Skyline,
    Fortress,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Meadow, Theme::Cavern, Theme::Skyline, Theme::Fortress];
}

/// Platform behavior as authored; unset parameters fall back to tuning
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformBehavior {
    #[default]
    Static,
    Moving {
        axis: MoveAxis,
        #[serde(default)]
        amplitude: Option<f32>,
        #[serde(default)]
        speed: Option<f32>,
    },
    Crumbling {
        #[serde(default)]
        delay_ms: Option<f64>,
    },
    Bouncy {
        #[serde(default)]
        force: Option<f32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub behavior: PlatformBehavior,
}

impl PlatformSpec {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            behavior: PlatformBehavior::Static,
        }
    }

    pub fn with(mut self, behavior: PlatformBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub x: f32,
    pub y: f32,
    pub kind: EnemyKind,
    #[serde(default)]
    pub patrol_distance: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectibleSpec {
    pub x: f32,
    pub y: f32,
    pub kind: CollectibleKind,
    #[serde(default)]
    pub value: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointSpec {
    pub x: f32,
    pub y: f32,
}

/// Serializable level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub theme: Theme,
    /// Player spawn (top-left of the player body)
    pub spawn: Vec2,
    /// Goal marker (top-left corner)
    pub goal: Vec2,
    /// Seconds; `None` means untimed
    #[serde(default)]
    pub time_limit_s: Option<f64>,
    #[serde(default)]
    pub platforms: Vec<PlatformSpec>,
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleSpec>,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointSpec>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject worlds the simulation cannot run in
    pub fn validate(&self, level: u32) -> Result<(), InitError> {
        let invalid = |reason: String| InitError::InvalidLevel { level, reason };
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0)
        {
            return Err(invalid(format!(
                "world size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let world = Rect::new(0.0, 0.0, self.width, self.height);
        if !world.contains_point(self.spawn) {
            return Err(invalid(format!(
                "spawn ({}, {}) is outside the world",
                self.spawn.x, self.spawn.y
            )));
        }
        if let Some(limit) = self.time_limit_s {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(invalid(format!("time limit must be positive, got {limit}")));
            }
        }
        if let Some(p) = self.platforms.iter().find(|p| !(p.width > 0.0 && p.height > 0.0)) {
            return Err(invalid(format!(
                "platform at ({}, {}) has non-positive size",
                p.x, p.y
            )));
        }
        Ok(())
    }
}

/// Supplies level descriptions by level number
pub trait LevelSource {
    fn level_data(&mut self, number: u32, rng: &mut Pcg32) -> Result<LevelData, InitError>;
}

/// A live level
#[derive(Debug, Clone)]
pub struct Level {
    pub number: u32,
    pub width: f32,
    pub height: f32,
    pub theme: Theme,
    pub spawn: Vec2,
    pub goal: Rect,
    pub time_limit_ms: Option<f64>,
    pub elapsed_ms: f64,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub checkpoints: Vec<Checkpoint>,
    /// Goal reached; never reverts within this level's lifetime
    pub completed: bool,
    data: LevelData,
    tuning: Tuning,
}

impl Level {
    pub fn from_data(number: u32, data: LevelData, tuning: &Tuning) -> Self {
        let mut level = Self {
            number,
            width: data.width,
            height: data.height,
            theme: data.theme,
            spawn: data.spawn,
            goal: Rect::new(data.goal.x, data.goal.y, GOAL_WIDTH, GOAL_HEIGHT),
            time_limit_ms: data.time_limit_s.map(|s| s * 1000.0),
            elapsed_ms: 0.0,
            platforms: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            checkpoints: Vec::new(),
            completed: false,
            data,
            tuning: tuning.clone(),
        };
        level.populate();
        log::info!(
            "Level {} loaded: {}x{} {:?}, {} platforms, {} enemies, {} collectibles, {} checkpoints",
            number,
            level.width,
            level.height,
            level.theme,
            level.platforms.len(),
            level.enemies.len(),
            level.collectibles.len(),
            level.checkpoints.len()
        );
        level
    }

    fn populate(&mut self) {
        let t = &self.tuning;
        self.platforms = self
            .data
            .platforms
            .iter()
            .map(|spec| {
                let rect = Rect::new(spec.x, spec.y, spec.width, spec.height);
                match spec.behavior {
                    PlatformBehavior::Static => Platform::new_static(rect),
                    PlatformBehavior::Moving {
                        axis,
                        amplitude,
                        speed,
                    } => Platform::new_moving(
                        rect,
                        axis,
                        amplitude.unwrap_or(t.platform.moving_amplitude),
                        speed.unwrap_or(t.platform.moving_speed),
                    ),
                    PlatformBehavior::Crumbling { delay_ms } => Platform::new_crumbling(
                        rect,
                        delay_ms.unwrap_or(t.platform.crumble_delay_ms),
                        t.platform.debris_count,
                        t.platform.debris_lifetime_ms,
                    ),
                    PlatformBehavior::Bouncy { force } => Platform::new_bouncy(
                        rect,
                        force.unwrap_or(t.platform.bounce_force),
                        t.platform.squash_ms,
                    ),
                }
            })
            .collect();

        self.enemies = self.spawn_enemies();

        self.collectibles = self
            .data
            .collectibles
            .iter()
            .map(|spec| {
                let item = Collectible::new(spec.kind, Vec2::new(spec.x, spec.y), t.collectible);
                match spec.value {
                    Some(v) => item.with_value(v),
                    None => item,
                }
            })
            .collect();

        self.checkpoints = self
            .data
            .checkpoints
            .iter()
            .map(|spec| Checkpoint::new(Vec2::new(spec.x, spec.y), t.checkpoint))
            .collect();
    }

    fn spawn_enemies(&self) -> Vec<Enemy> {
        self.data
            .enemies
            .iter()
            .map(|spec| {
                let enemy = Enemy::new(spec.kind, Vec2::new(spec.x, spec.y), self.tuning.enemy);
                match spec.patrol_distance {
                    Some(d) => enemy.with_patrol_distance(d),
                    None => enemy,
                }
            })
            .collect()
    }

    pub fn data(&self) -> &LevelData {
        &self.data
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds {
            width: self.width,
            height: self.height,
        }
    }

    /// Advance platforms, enemies, collectibles and checkpoints
    ///
    /// `landed_on` is the platform index the player's collision pass reported
    /// this frame. Platform effects on the player (riding, bouncing) are
    /// applied here.
    pub fn update(
        &mut self,
        dt_ms: f64,
        now_ms: f64,
        player: &mut Player,
        landed_on: Option<usize>,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        self.elapsed_ms += dt_ms;

        let mut carry = None;
        for (index, platform) in self.platforms.iter_mut().enumerate() {
            let on_top = player.body.grounded && landed_on == Some(index);
            if let Some(PlatformEvent::Crumbled) = platform.update(dt_ms, on_top, rng) {
                log::debug!("Platform {index} crumbled");
                events.push(GameEvent::PlatformCrumbled { index });
            }
            if !on_top {
                continue;
            }
            if platform.carries_rider() {
                carry = Some((index, platform.delta()));
            }
            if let Some(force) = platform.bounce_force() {
                player.bounce(force);
                platform.trigger_bounce();
                events.push(GameEvent::Bounced);
            }
        }

        // Riders follow their platform but never into other geometry
        if let Some((index, delta)) = carry {
            carry_rider(&mut player.body, delta, &self.platforms, index);
        }

        let target = (!player.is_dead()).then(|| player.body.center());
        for enemy in &mut self.enemies {
            enemy.update(&self.platforms, target, now_ms, dt_ms);
        }
        let before = self.enemies.len();
        self.enemies.retain(|e| !e.is_expired());
        if self.enemies.len() != before {
            log::debug!("Removed {} expired enemies", before - self.enemies.len());
        }

        for item in &mut self.collectibles {
            item.update(dt_ms, target);
        }

        for (index, checkpoint) in self.checkpoints.iter_mut().enumerate() {
            if checkpoint.check_player(player) {
                events.push(GameEvent::CheckpointActivated { index });
            }
        }
    }

    /// Latch completion when the player touches the goal
    ///
    /// Returns true only on the frame completion happens.
    pub fn check_completion(&mut self, player: &Rect) -> bool {
        if self.completed || !self.goal.overlaps(player) {
            return false;
        }
        self.completed = true;
        true
    }

    pub fn is_time_up(&self) -> bool {
        self.time_limit_ms.is_some_and(|limit| self.elapsed_ms >= limit)
    }

    /// Time left, clamped at zero; `None` when untimed
    pub fn time_remaining_ms(&self) -> Option<f64> {
        self.time_limit_ms
            .map(|limit| (limit - self.elapsed_ms).max(0.0))
    }

    /// Restart: platforms, items and checkpoints reset in place, enemies respawn
    pub fn reset(&mut self) {
        for platform in &mut self.platforms {
            platform.reset();
        }
        for item in &mut self.collectibles {
            item.reset();
        }
        for checkpoint in &mut self.checkpoints {
            checkpoint.reset();
        }
        self.enemies = self.spawn_enemies();
        self.elapsed_ms = 0.0;
        self.completed = false;
        log::info!("Level {} reset", self.number);
    }
}
