//! Data-driven game balance
//!
//! Every section defaults to the values in [`crate::consts`], so a JSON
//! document only needs to name what it overrides.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, InitError};

/// Player movement and health
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub acceleration: f32,
    pub max_speed: f32,
    pub jump_power: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub max_up_speed: f32,
    pub ground_friction: f32,
    pub air_resistance: f32,
    pub max_health: u32,
    pub invulnerability_ms: f64,
    pub fall_death_margin: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            acceleration: PLAYER_ACCELERATION,
            max_speed: PLAYER_MAX_SPEED,
            jump_power: PLAYER_JUMP_POWER,
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
            max_up_speed: MAX_UP_SPEED,
            ground_friction: GROUND_FRICTION,
            air_resistance: AIR_RESISTANCE,
            max_health: PLAYER_MAX_HEALTH,
            invulnerability_ms: INVULNERABILITY_MS,
            fall_death_margin: FALL_DEATH_MARGIN,
        }
    }
}

/// Enemy AI thresholds and stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub width: f32,
    pub height: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub detection_range: f32,
    pub chase_exit_factor: f32,
    pub patrol_distance: f32,
    pub turn_cooldown_ms: f64,
    pub health: u32,
    pub damage: u32,
    pub points: u64,
    pub death_ms: f64,
    pub edge_lookahead: f32,
    pub edge_probe_depth: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub stomp_tolerance: f32,
    pub stomp_bounce: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            width: ENEMY_WIDTH,
            height: ENEMY_HEIGHT,
            patrol_speed: ENEMY_PATROL_SPEED,
            chase_speed: ENEMY_CHASE_SPEED,
            detection_range: ENEMY_DETECTION_RANGE,
            chase_exit_factor: CHASE_EXIT_FACTOR,
            patrol_distance: ENEMY_PATROL_DISTANCE,
            turn_cooldown_ms: ENEMY_TURN_COOLDOWN_MS,
            health: ENEMY_HEALTH,
            damage: ENEMY_DAMAGE,
            points: ENEMY_POINTS,
            death_ms: ENEMY_DEATH_MS,
            edge_lookahead: EDGE_LOOKAHEAD,
            edge_probe_depth: EDGE_PROBE_DEPTH,
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
            stomp_tolerance: STOMP_TOLERANCE,
            stomp_bounce: STOMP_BOUNCE,
        }
    }
}

/// Platform behavior defaults (level data may override per platform)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    pub moving_speed: f32,
    pub moving_amplitude: f32,
    pub crumble_delay_ms: f64,
    pub debris_count: usize,
    pub debris_lifetime_ms: f32,
    pub bounce_force: f32,
    pub squash_ms: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            moving_speed: MOVING_PLATFORM_SPEED,
            moving_amplitude: MOVING_PLATFORM_AMPLITUDE,
            crumble_delay_ms: CRUMBLE_DELAY_MS,
            debris_count: CRUMBLE_DEBRIS_COUNT,
            debris_lifetime_ms: DEBRIS_LIFETIME_MS,
            bounce_force: BOUNCE_FORCE,
            squash_ms: BOUNCE_SQUASH_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleTuning {
    pub size: f32,
    pub bob_amplitude: f32,
    pub bob_speed: f32,
    pub magnet_radius: f32,
    pub magnet_speed: f32,
    pub collect_anim_ms: f32,
}

impl Default for CollectibleTuning {
    fn default() -> Self {
        Self {
            size: COLLECTIBLE_SIZE,
            bob_amplitude: BOB_AMPLITUDE,
            bob_speed: BOB_SPEED,
            magnet_radius: MAGNET_RADIUS,
            magnet_speed: MAGNET_SPEED,
            collect_anim_ms: COLLECT_ANIM_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointTuning {
    pub width: f32,
    pub height: f32,
    pub activation_range: f32,
}

impl Default for CheckpointTuning {
    fn default() -> Self {
        Self {
            width: CHECKPOINT_WIDTH,
            height: CHECKPOINT_HEIGHT,
            activation_range: CHECKPOINT_RANGE,
        }
    }
}

/// Camera follow model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub deadzone_width: f32,
    pub deadzone_height: f32,
    pub follow_speed: f32,
    pub smoothing: f32,
    pub lookahead: f32,
    pub zoom_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            deadzone_width: DEADZONE_WIDTH,
            deadzone_height: DEADZONE_HEIGHT,
            follow_speed: CAMERA_FOLLOW_SPEED,
            smoothing: CAMERA_SMOOTHING,
            lookahead: CAMERA_LOOKAHEAD,
            zoom_speed: ZOOM_SPEED,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

/// Session rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesTuning {
    pub starting_lives: u8,
    pub max_lives: u8,
    pub max_frame_dt_ms: f64,
    pub time_bonus_max: f64,
}

impl Default for RulesTuning {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            max_lives: MAX_LIVES,
            max_frame_dt_ms: MAX_FRAME_DT_MS,
            time_bonus_max: TIME_BONUS_MAX,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub platform: PlatformTuning,
    pub collectible: CollectibleTuning,
    pub checkpoint: CheckpointTuning,
    pub camera: CameraTuning,
    pub rules: RulesTuning,
    /// Fixed RNG seed; `None` draws one from OS entropy per session
    pub seed: Option<u64>,
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), InitError> {
        let positive = [
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("player.max_speed", self.player.max_speed),
            ("player.jump_power", self.player.jump_power),
            ("enemy.width", self.enemy.width),
            ("enemy.height", self.enemy.height),
            ("enemy.detection_range", self.enemy.detection_range),
            ("collectible.size", self.collectible.size),
            ("camera.viewport_width", self.camera.viewport_width),
            ("camera.viewport_height", self.camera.viewport_height),
            ("camera.min_zoom", self.camera.min_zoom),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(InitError::InvalidTuning(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.player.max_health == 0 {
            return Err(InitError::InvalidTuning("player.max_health must be > 0".into()));
        }
        if self.enemy.chase_exit_factor < 1.0 {
            return Err(InitError::InvalidTuning(
                "enemy.chase_exit_factor must be >= 1".into(),
            ));
        }
        if self.camera.min_zoom > self.camera.max_zoom {
            return Err(InitError::InvalidTuning(format!(
                "camera zoom range inverted: {} > {}",
                self.camera.min_zoom, self.camera.max_zoom
            )));
        }
        if self.rules.starting_lives == 0 || self.rules.starting_lives > self.rules.max_lives {
            return Err(InitError::InvalidTuning(format!(
                "rules.starting_lives must be in 1..={}",
                self.rules.max_lives
            )));
        }
        if !(self.rules.max_frame_dt_ms > 0.0) {
            return Err(InitError::InvalidTuning(
                "rules.max_frame_dt_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player": { "jump_power": 14.0 }, "seed": 7 }"#)
            .unwrap();
        assert_eq!(tuning.player.jump_power, 14.0);
        assert_eq!(tuning.player.max_speed, PLAYER_MAX_SPEED);
        assert_eq!(tuning.enemy, EnemyTuning::default());
        assert_eq!(tuning.seed, Some(7));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Tuning::from_json("{ player: ").is_err());
    }

    #[test]
    fn test_invalid_zoom_range_rejected() {
        let mut tuning = Tuning::default();
        tuning.camera.min_zoom = 3.0;
        assert!(matches!(tuning.validate(), Err(InitError::InvalidTuning(_))));
    }

    #[test]
    fn test_zero_lives_rejected() {
        let mut tuning = Tuning::default();
        tuning.rules.starting_lives = 0;
        assert!(tuning.validate().is_err());
    }
}
