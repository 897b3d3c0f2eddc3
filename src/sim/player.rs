//! The player character
//!
//! Movement, jumping (with one airborne double jump), health with a
//! post-hit invulnerability window, and checkpoint/respawn bookkeeping.
//! Death is not self-triggered: the orchestrator checks [`Player::is_dead`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Body, CollisionReport, MotionLimits, Solid, resolve_collisions};
use crate::approach_zero;
use crate::input::{Action, InputSource};
use crate::tuning::PlayerTuning;

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Logical animation tag handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnim {
    Idle,
    Run,
    Jump,
    DoubleJump,
    Fall,
    Hurt,
}

/// Movement input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump_held: bool,
    /// Jump went from released to held this frame
    pub jump_pressed: bool,
}

impl PlayerInput {
    pub fn from_source(input: &dyn InputSource) -> Self {
        Self {
            left: input.is_pressed(Action::Left),
            right: input.is_pressed(Action::Right),
            jump_held: input.is_pressed(Action::Jump),
            jump_pressed: input.is_just_pressed(Action::Jump),
        }
    }
}

/// Which jump, if any, was taken this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Double,
}

/// Outcome of one player update
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerStep {
    pub jump: Option<JumpKind>,
    pub collision: CollisionReport,
    /// Fell below the world and was killed
    pub fell_out: bool,
}

/// World extents the player is kept inside
#[derive(Debug, Clone, Copy)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

/// Player state
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    /// An airborne jump is available (granted by a ground jump)
    pub has_double_jump: bool,
    pub double_jump_used: bool,
    pub health: u32,
    pub max_health: u32,
    pub invulnerable: bool,
    /// Simulation time of the hit that started the current window
    invulnerable_since_ms: f64,
    pub checkpoint: Vec2,
    /// Health captured when the checkpoint was set
    pub checkpoint_health: u32,
    pub anim: PlayerAnim,
    input: PlayerInput,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(spawn: Vec2, tuning: PlayerTuning) -> Self {
        Self {
            body: Body::new(spawn, Vec2::new(tuning.width, tuning.height)),
            facing: Facing::Right,
            has_double_jump: false,
            double_jump_used: false,
            health: tuning.max_health,
            max_health: tuning.max_health,
            invulnerable: false,
            invulnerable_since_ms: 0.0,
            checkpoint: spawn,
            checkpoint_health: tuning.max_health,
            anim: PlayerAnim::Idle,
            input: PlayerInput::default(),
            tuning,
        }
    }

    fn limits(&self) -> MotionLimits {
        MotionLimits {
            gravity: self.tuning.gravity,
            max_up_speed: self.tuning.max_up_speed,
            max_fall_speed: self.tuning.max_fall_speed,
            max_speed: self.tuning.max_speed,
        }
    }

    pub fn set_input(&mut self, input: PlayerInput) {
        self.input = input;
    }

    pub fn input(&self) -> PlayerInput {
        self.input
    }

    /// One frame of movement, jumping and collision
    pub fn update<S: Solid>(&mut self, solids: &[S], world: WorldBounds, now_ms: f64) -> PlayerStep {
        let mut step = PlayerStep::default();

        if self.invulnerable && now_ms - self.invulnerable_since_ms >= self.tuning.invulnerability_ms {
            self.invulnerable = false;
        }

        // Horizontal input
        let input = self.input;
        if input.left && !input.right {
            self.body.vel.x -= self.tuning.acceleration;
            self.facing = Facing::Left;
        } else if input.right && !input.left {
            self.body.vel.x += self.tuning.acceleration;
            self.facing = Facing::Right;
        } else {
            let damping = if self.body.grounded {
                self.tuning.ground_friction
            } else {
                self.tuning.air_resistance
            };
            self.body.vel.x = approach_zero(self.body.vel.x * damping, 0.05);
        }

        // Jumping (edge-triggered)
        if input.jump_pressed {
            if self.body.grounded {
                self.body.vel.y = -self.tuning.jump_power;
                self.body.grounded = false;
                self.has_double_jump = true;
                self.double_jump_used = false;
                step.jump = Some(JumpKind::Ground);
            } else if self.has_double_jump && !self.double_jump_used {
                self.body.vel.y = -self.tuning.jump_power;
                self.double_jump_used = true;
                step.jump = Some(JumpKind::Double);
            }
        }

        let limits = self.limits();
        self.body.apply_gravity(&limits);
        let prev = self.body.pos;
        self.body.integrate();
        step.collision = resolve_collisions(&mut self.body, prev, solids);

        if step.collision.grounded {
            self.has_double_jump = false;
            self.double_jump_used = false;
        }

        // World bounds
        let max_x = (world.width - self.body.size.x).max(0.0);
        if self.body.pos.x < 0.0 || self.body.pos.x > max_x {
            self.body.pos.x = self.body.pos.x.clamp(0.0, max_x);
            self.body.vel.x = 0.0;
        }
        if self.body.pos.y > world.height + self.tuning.fall_death_margin && !self.is_dead() {
            self.kill();
            step.fell_out = true;
        }

        self.anim = self.pick_anim(step.jump);
        step
    }

    fn pick_anim(&self, jump: Option<JumpKind>) -> PlayerAnim {
        if self.invulnerable {
            return PlayerAnim::Hurt;
        }
        match jump {
            Some(JumpKind::Double) => return PlayerAnim::DoubleJump,
            Some(JumpKind::Ground) => return PlayerAnim::Jump,
            None => {}
        }
        if !self.body.grounded {
            if self.body.vel.y < 0.0 {
                if self.double_jump_used {
                    PlayerAnim::DoubleJump
                } else {
                    PlayerAnim::Jump
                }
            } else {
                PlayerAnim::Fall
            }
        } else if self.body.vel.x.abs() > 0.5 {
            PlayerAnim::Run
        } else {
            PlayerAnim::Idle
        }
    }

    /// Apply damage unless invulnerable; returns whether health changed
    pub fn take_damage(&mut self, amount: u32, now_ms: f64) -> bool {
        if amount == 0 || self.invulnerable || self.is_dead() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health > 0 {
            self.invulnerable = true;
            self.invulnerable_since_ms = now_ms;
        }
        true
    }

    /// Restore health up to the maximum; the dead stay dead
    pub fn heal(&mut self, amount: u32) {
        if self.is_dead() {
            return;
        }
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Lethal damage that ignores invulnerability (falling out of the world)
    pub fn kill(&mut self) {
        self.health = 0;
        self.invulnerable = false;
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Remaining invulnerability, for blinking
    pub fn invulnerable_remaining_ms(&self, now_ms: f64) -> f64 {
        if self.invulnerable {
            (self.tuning.invulnerability_ms - (now_ms - self.invulnerable_since_ms)).max(0.0)
        } else {
            0.0
        }
    }

    /// Upward impulse after stomping an enemy
    pub fn bounce(&mut self, impulse: f32) {
        self.body.vel.y = -impulse;
        self.body.grounded = false;
    }

    /// Store a respawn point and the current health
    pub fn set_checkpoint(&mut self, pos: Vec2) {
        self.checkpoint = pos;
        self.checkpoint_health = self.health;
    }

    /// Return to the checkpoint with the health captured there
    pub fn respawn(&mut self, now_ms: f64) {
        self.body.teleport(self.checkpoint);
        self.health = self.checkpoint_health.clamp(1, self.max_health);
        self.invulnerable = true;
        self.invulnerable_since_ms = now_ms;
        self.has_double_jump = false;
        self.double_jump_used = false;
        self.anim = PlayerAnim::Idle;
    }

    /// Place at a level's spawn point with full health (level load/restart)
    pub fn reset_to(&mut self, spawn: Vec2) {
        self.body.teleport(spawn);
        self.facing = Facing::Right;
        self.health = self.max_health;
        self.invulnerable = false;
        self.has_double_jump = false;
        self.double_jump_used = false;
        self.checkpoint = spawn;
        self.checkpoint_health = self.max_health;
        self.anim = PlayerAnim::Idle;
        self.input = PlayerInput::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;

    const WORLD: WorldBounds = WorldBounds {
        width: 2000.0,
        height: 600.0,
    };

    fn floor() -> [Rect; 1] {
        [Rect::new(0.0, 500.0, 2000.0, 100.0)]
    }

    fn grounded_player() -> Player {
        let mut p = Player::new(Vec2::new(100.0, 452.0), PlayerTuning::default());
        p.update(&floor(), WORLD, 0.0);
        assert!(p.body.grounded);
        p
    }

    fn press_jump(p: &mut Player) {
        p.set_input(PlayerInput {
            jump_held: true,
            jump_pressed: true,
            ..Default::default()
        });
    }

    #[test]
    fn test_damage_scenario() {
        let mut p = Player::new(Vec2::ZERO, PlayerTuning::default());
        assert!(p.take_damage(30, 0.0));
        assert_eq!(p.health, 70);
        assert!(p.invulnerable);

        assert!(!p.take_damage(30, 10.0));
        assert_eq!(p.health, 70);

        // Window elapses during an update
        p.update(&floor(), WORLD, 1000.0);
        assert!(!p.invulnerable);
        p.take_damage(80, 1000.0);
        assert_eq!(p.health, 0);
        assert!(p.is_dead());
    }

    #[test]
    fn test_heal_clamps() {
        let mut p = Player::new(Vec2::ZERO, PlayerTuning::default());
        p.take_damage(10, 0.0);
        p.heal(500);
        assert_eq!(p.health, p.max_health);
    }

    #[test]
    fn test_heal_does_not_revive() {
        let mut p = Player::new(Vec2::ZERO, PlayerTuning::default());
        p.take_damage(150, 0.0);
        assert!(p.is_dead());
        p.heal(25);
        assert_eq!(p.health, 0);
        assert!(p.is_dead());
    }

    #[test]
    fn test_zero_damage_is_not_a_hit() {
        let mut p = Player::new(Vec2::ZERO, PlayerTuning::default());
        assert!(!p.take_damage(0, 0.0));
        assert!(!p.invulnerable);
        assert_eq!(p.health, p.max_health);
        assert!(p.take_damage(10, 5.0));
    }

    #[test]
    fn test_ground_jump_then_double_jump() {
        let mut p = grounded_player();
        press_jump(&mut p);
        let step = p.update(&floor(), WORLD, 16.0);
        assert_eq!(step.jump, Some(JumpKind::Ground));
        assert!(p.body.vel.y < 0.0);
        assert!(p.has_double_jump);

        // Holding jump does not retrigger
        p.set_input(PlayerInput {
            jump_held: true,
            ..Default::default()
        });
        assert_eq!(p.update(&floor(), WORLD, 32.0).jump, None);

        press_jump(&mut p);
        let step = p.update(&floor(), WORLD, 48.0);
        assert_eq!(step.jump, Some(JumpKind::Double));
        assert!(p.double_jump_used);

        // No third jump
        press_jump(&mut p);
        assert_eq!(p.update(&floor(), WORLD, 64.0).jump, None);
    }

    #[test]
    fn test_landing_resets_double_jump() {
        let mut p = grounded_player();
        press_jump(&mut p);
        p.update(&floor(), WORLD, 0.0);
        p.set_input(PlayerInput::default());
        for i in 0..120 {
            p.update(&floor(), WORLD, i as f64 * 16.0);
        }
        assert!(p.body.grounded);
        assert!(!p.has_double_jump);
        assert!(!p.double_jump_used);
    }

    #[test]
    fn test_no_double_jump_after_walking_off_ledge() {
        let ledge = [Rect::new(0.0, 500.0, 100.0, 100.0)];
        let mut p = Player::new(Vec2::new(200.0, 300.0), PlayerTuning::default());
        p.update(&ledge, WORLD, 0.0);
        press_jump(&mut p);
        assert_eq!(p.update(&ledge, WORLD, 16.0).jump, None);
    }

    #[test]
    fn test_horizontal_speed_clamped() {
        let mut p = grounded_player();
        p.set_input(PlayerInput {
            right: true,
            ..Default::default()
        });
        for i in 0..60 {
            p.update(&floor(), WORLD, i as f64 * 16.0);
        }
        assert!(p.body.vel.x <= PlayerTuning::default().max_speed);
        assert_eq!(p.facing, Facing::Right);
        assert_eq!(p.anim, PlayerAnim::Run);
    }

    #[test]
    fn test_world_bounds_clamp_x() {
        let mut p = grounded_player();
        p.body.pos.x = 3.0;
        p.set_input(PlayerInput {
            left: true,
            ..Default::default()
        });
        for i in 0..30 {
            p.update(&floor(), WORLD, i as f64 * 16.0);
        }
        assert_eq!(p.body.pos.x, 0.0);
    }

    #[test]
    fn test_falling_out_of_world_is_fatal() {
        let none: [Rect; 0] = [];
        let mut p = Player::new(Vec2::new(100.0, 690.0), PlayerTuning::default());
        p.take_damage(10, 0.0); // invulnerability does not save a fall
        let mut fell = false;
        for i in 0..30 {
            fell |= p.update(&none, WORLD, i as f64 * 16.0).fell_out;
        }
        assert!(fell);
        assert!(p.is_dead());
    }

    #[test]
    fn test_checkpoint_restores_snapshot_health() {
        let mut p = Player::new(Vec2::ZERO, PlayerTuning::default());
        p.take_damage(40, 0.0);
        p.set_checkpoint(Vec2::new(500.0, 200.0));
        p.update(&floor(), WORLD, 2000.0);
        p.take_damage(60, 2000.0);
        assert!(p.is_dead());

        p.respawn(3000.0);
        assert_eq!(p.body.pos, Vec2::new(500.0, 200.0));
        assert_eq!(p.health, 60);
        assert!(p.invulnerable);
        assert_eq!(p.body.vel, Vec2::ZERO);
    }
}
