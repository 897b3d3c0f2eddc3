//! Ridgeway - a side-scrolling platformer simulation core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (physics, collisions, enemy AI, camera, levels)
//! - `game`: Orchestrator that clamps frame deltas and dispatches audio
//! - `input`: Logical action snapshots with just-pressed/just-released edges
//! - `audio`: Fire-and-forget sound sink boundary
//! - `settings`: Player-facing preferences
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod game;
pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{AudioError, ConfigError, InitError};
pub use game::{Game, RenderSnapshot};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// Physics values are per simulation frame (one tick per rendered frame);
/// durations are in milliseconds.
pub mod consts {
    /// Nominal frame duration at 60 Hz
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Upper bound on a single frame delta (tab backgrounding, debugger breaks)
    pub const MAX_FRAME_DT_MS: f64 = 50.0;

    /// Player body
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const PLAYER_ACCELERATION: f32 = 0.8;
    pub const PLAYER_MAX_SPEED: f32 = 6.0;
    pub const PLAYER_JUMP_POWER: f32 = 12.0;
    pub const PLAYER_MAX_HEALTH: u32 = 100;
    /// Damage immunity after a hit
    pub const INVULNERABILITY_MS: f64 = 1000.0;
    /// How far below the world the player may fall before dying
    pub const FALL_DEATH_MARGIN: f32 = 100.0;

    /// Shared physics
    pub const GRAVITY: f32 = 0.5;
    pub const MAX_FALL_SPEED: f32 = 15.0;
    pub const MAX_UP_SPEED: f32 = 20.0;
    /// Horizontal damping while grounded (stronger)
    pub const GROUND_FRICTION: f32 = 0.8;
    /// Horizontal damping while airborne (weaker)
    pub const AIR_RESISTANCE: f32 = 0.95;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 32.0;
    pub const ENEMY_HEIGHT: f32 = 32.0;
    pub const ENEMY_PATROL_SPEED: f32 = 1.0;
    pub const ENEMY_CHASE_SPEED: f32 = 2.5;
    pub const ENEMY_DETECTION_RANGE: f32 = 150.0;
    /// Chase is abandoned beyond detection range times this factor
    pub const CHASE_EXIT_FACTOR: f32 = 1.5;
    pub const ENEMY_PATROL_DISTANCE: f32 = 100.0;
    pub const ENEMY_TURN_COOLDOWN_MS: f64 = 500.0;
    pub const ENEMY_HEALTH: u32 = 30;
    pub const ENEMY_DAMAGE: u32 = 20;
    pub const ENEMY_POINTS: u64 = 100;
    pub const ENEMY_DEATH_MS: f64 = 500.0;
    /// Edge probe: distance ahead of the leading edge and below the feet
    pub const EDGE_LOOKAHEAD: f32 = 5.0;
    pub const EDGE_PROBE_DEPTH: f32 = 10.0;

    /// Stomp rule
    pub const STOMP_TOLERANCE: f32 = 10.0;
    pub const STOMP_BOUNCE: f32 = 8.0;

    /// Platform behaviors
    pub const MOVING_PLATFORM_SPEED: f32 = 1.0;
    pub const MOVING_PLATFORM_AMPLITUDE: f32 = 100.0;
    pub const CRUMBLE_DELAY_MS: f64 = 1000.0;
    pub const CRUMBLE_DEBRIS_COUNT: usize = 8;
    pub const DEBRIS_LIFETIME_MS: f32 = 800.0;
    pub const BOUNCE_FORCE: f32 = 15.0;
    pub const BOUNCE_SQUASH_MS: f32 = 200.0;

    /// Collectibles
    pub const COLLECTIBLE_SIZE: f32 = 20.0;
    pub const BOB_AMPLITUDE: f32 = 5.0;
    /// Radians per millisecond
    pub const BOB_SPEED: f32 = 0.003;
    pub const MAGNET_RADIUS: f32 = 80.0;
    pub const MAGNET_SPEED: f32 = 6.0;
    pub const COLLECT_ANIM_MS: f32 = 400.0;

    /// Checkpoints
    pub const CHECKPOINT_WIDTH: f32 = 32.0;
    pub const CHECKPOINT_HEIGHT: f32 = 64.0;
    pub const CHECKPOINT_RANGE: f32 = 50.0;

    /// Goal marker size (anchored at its top-left corner)
    pub const GOAL_WIDTH: f32 = 48.0;
    pub const GOAL_HEIGHT: f32 = 96.0;

    /// Camera
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    pub const DEADZONE_WIDTH: f32 = 200.0;
    pub const DEADZONE_HEIGHT: f32 = 120.0;
    pub const CAMERA_FOLLOW_SPEED: f32 = 0.1;
    pub const CAMERA_SMOOTHING: f32 = 0.2;
    pub const CAMERA_LOOKAHEAD: f32 = 10.0;
    pub const ZOOM_SPEED: f32 = 0.05;
    pub const MIN_ZOOM: f32 = 0.5;
    pub const MAX_ZOOM: f32 = 2.0;

    /// Session rules
    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 9;
    /// Completion bonus awarded for finishing with the full time limit left
    pub const TIME_BONUS_MAX: f64 = 1000.0;
}

/// Linear interpolation from `a` to `b` by `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Snap tiny magnitudes to zero so damped velocities settle
#[inline]
pub fn approach_zero(value: f32, epsilon: f32) -> f32 {
    if value.abs() < epsilon { 0.0 } else { value }
}
