//! Enemy AI
//!
//! Patrol between two bounds, chase the player inside a detection radius
//! (with a wider exit radius), and time out after death. Patrolling enemies
//! turn at ledges and walls, subject to a turn cooldown.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Body, MotionLimits, Solid, point_supported, resolve_collisions};
use super::rect::Rect;
use crate::distance;
use crate::tuning::EnemyTuning;

/// Enemy variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks its beat and never gives chase
    Patroller,
    /// Patrols until the player comes close, then chases
    Chaser,
}

/// AI state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyState {
    Patrol,
    Chase,
    /// Terminal; removed from the level once `elapsed_ms` reaches the death duration
    Dead { elapsed_ms: f64 },
}

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub state: EnemyState,
    /// +1 walking right, -1 walking left
    pub direction: f32,
    /// Center of the patrol beat
    pub start_x: f32,
    pub patrol_distance: f32,
    pub detection_range: f32,
    pub health: u32,
    pub damage: u32,
    last_turn_ms: Option<f64>,
    tuning: EnemyTuning,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, tuning: EnemyTuning) -> Self {
        Self {
            body: Body::new(pos, Vec2::new(tuning.width, tuning.height)),
            kind,
            state: EnemyState::Patrol,
            direction: 1.0,
            start_x: pos.x,
            patrol_distance: tuning.patrol_distance,
            detection_range: tuning.detection_range,
            health: tuning.health,
            damage: tuning.damage,
            last_turn_ms: None,
            tuning,
        }
    }

    pub fn with_patrol_distance(mut self, distance: f32) -> Self {
        self.patrol_distance = distance.max(0.0);
        self
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn is_alive(&self) -> bool {
        !matches!(self.state, EnemyState::Dead { .. })
    }

    /// Death animation finished; the level may drop this enemy
    pub fn is_expired(&self) -> bool {
        matches!(self.state, EnemyState::Dead { elapsed_ms } if elapsed_ms >= self.tuning.death_ms)
    }

    pub fn points(&self) -> u64 {
        self.tuning.points
    }

    /// One frame of AI and physics
    ///
    /// `target` is the player's center; without one the enemy patrols.
    pub fn update<S: Solid>(&mut self, solids: &[S], target: Option<Vec2>, now_ms: f64, dt_ms: f64) {
        if let EnemyState::Dead { elapsed_ms } = &mut self.state {
            *elapsed_ms += dt_ms;
            self.body.vel.x = 0.0;
            self.physics(solids);
            return;
        }

        self.think(target);

        match self.state {
            EnemyState::Patrol => {
                let left = self.start_x - self.patrol_distance;
                let right = self.start_x + self.patrol_distance;
                if (self.body.pos.x <= left && self.direction < 0.0)
                    || (self.body.pos.x >= right && self.direction > 0.0)
                {
                    self.try_turn(now_ms);
                }
                self.body.vel.x = self.direction * self.tuning.patrol_speed;
            }
            EnemyState::Chase => {
                if let Some(target) = target {
                    let dx = target.x - self.body.center().x;
                    if dx.abs() > 1.0 {
                        self.direction = dx.signum();
                    }
                }
                self.body.vel.x = self.direction * self.tuning.chase_speed;
            }
            EnemyState::Dead { .. } => {}
        }

        let report = self.physics(solids);

        if self.state == EnemyState::Patrol {
            if report.hit_wall {
                self.try_turn(now_ms);
            } else if report.grounded && !self.ground_ahead(solids) {
                self.try_turn(now_ms);
            }
        }
    }

    fn physics<S: Solid>(&mut self, solids: &[S]) -> super::collision::CollisionReport {
        let limits = MotionLimits {
            gravity: self.tuning.gravity,
            max_up_speed: self.tuning.max_fall_speed,
            max_fall_speed: self.tuning.max_fall_speed,
            max_speed: self.tuning.chase_speed.max(self.tuning.patrol_speed),
        };
        self.body.apply_gravity(&limits);
        let prev = self.body.pos;
        self.body.integrate();
        resolve_collisions(&mut self.body, prev, solids)
    }

    /// Patrol/chase transitions with a hysteresis band
    fn think(&mut self, target: Option<Vec2>) {
        let next = match (self.kind, target) {
            (EnemyKind::Chaser, Some(target)) => {
                let dist = distance(self.body.center(), target);
                match self.state {
                    EnemyState::Patrol if dist <= self.detection_range => EnemyState::Chase,
                    EnemyState::Chase
                        if dist > self.detection_range * self.tuning.chase_exit_factor =>
                    {
                        EnemyState::Patrol
                    }
                    state => state,
                }
            }
            _ => EnemyState::Patrol,
        };
        if next != self.state {
            log::debug!(
                "Enemy at ({:.0}, {:.0}): {:?} -> {:?}",
                self.body.pos.x,
                self.body.pos.y,
                self.state,
                next
            );
            self.state = next;
        }
    }

    /// Probe ahead of the leading edge, just below the feet
    fn ground_ahead<S: Solid>(&self, solids: &[S]) -> bool {
        let half_width = self.body.size.x / 2.0;
        let probe = Vec2::new(
            self.body.center().x + self.direction * (half_width + self.tuning.edge_lookahead),
            self.body.bottom() + self.tuning.edge_probe_depth,
        );
        point_supported(probe, solids)
    }

    /// Reverse direction unless the cooldown since the last turn is running
    fn try_turn(&mut self, now_ms: f64) {
        let ready = self
            .last_turn_ms
            .is_none_or(|last| now_ms - last >= self.tuning.turn_cooldown_ms);
        if ready {
            self.direction = -self.direction;
            self.last_turn_ms = Some(now_ms);
        }
    }

    /// Apply damage; returns true if this killed the enemy
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.state = EnemyState::Dead { elapsed_ms: 0.0 };
            self.body.vel.x = 0.0;
            return true;
        }
        false
    }

    /// Lethal damage (stomped from above)
    pub fn kill(&mut self) -> bool {
        self.take_damage(self.health.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Vec<Rect> {
        vec![Rect::new(-1000.0, 132.0, 4000.0, 40.0)]
    }

    fn chaser_at(x: f32) -> Enemy {
        let mut e = Enemy::new(EnemyKind::Chaser, Vec2::new(x, 100.0), EnemyTuning::default());
        e.body.grounded = true;
        e
    }

    #[test]
    fn test_chase_hysteresis_scenario() {
        let floor = floor();
        let mut e = chaser_at(0.0);
        let range = e.detection_range;
        let center = e.body.center();

        // Exactly at detection range: inclusive
        e.update(&floor, Some(center + Vec2::new(range, 0.0)), 0.0, 16.0);
        assert_eq!(e.state, EnemyState::Chase);

        let center = e.body.center();
        e.update(&floor, Some(center + Vec2::new(range * 1.4, 0.0)), 16.0, 16.0);
        assert_eq!(e.state, EnemyState::Chase);

        let center = e.body.center();
        e.update(&floor, Some(center + Vec2::new(range * 1.6, 0.0)), 32.0, 16.0);
        assert_eq!(e.state, EnemyState::Patrol);
    }

    #[test]
    fn test_chase_moves_toward_player() {
        let floor = floor();
        let mut e = chaser_at(500.0);
        let start = e.body.pos.x;
        let target = e.body.center() - Vec2::new(100.0, 0.0);
        e.update(&floor, Some(target), 0.0, 16.0);
        assert_eq!(e.state, EnemyState::Chase);
        assert_eq!(e.direction, -1.0);
        assert!(e.body.pos.x < start);
        assert_eq!(e.body.vel.x, -EnemyTuning::default().chase_speed);
    }

    #[test]
    fn test_patroller_never_chases() {
        let floor = floor();
        let mut e = Enemy::new(EnemyKind::Patroller, Vec2::new(0.0, 100.0), EnemyTuning::default());
        let target = e.body.center() + Vec2::new(10.0, 0.0);
        e.update(&floor, Some(target), 0.0, 16.0);
        assert_eq!(e.state, EnemyState::Patrol);
    }

    #[test]
    fn test_missing_target_defaults_to_patrol() {
        let floor = floor();
        let mut e = chaser_at(0.0);
        e.update(&floor, Some(e.body.center()), 0.0, 16.0);
        assert_eq!(e.state, EnemyState::Chase);
        e.update(&floor, None, 16.0, 16.0);
        assert_eq!(e.state, EnemyState::Patrol);
    }

    #[test]
    fn test_patrol_turns_at_bounds() {
        let floor = floor();
        let mut e = Enemy::new(EnemyKind::Patroller, Vec2::new(0.0, 100.0), EnemyTuning::default())
            .with_patrol_distance(20.0);
        let mut now = 0.0;
        let mut max_x = f32::MIN;
        for _ in 0..200 {
            e.update(&floor, None, now, 16.0);
            max_x = max_x.max(e.body.pos.x);
            now += 16.0;
        }
        // Overshoot is bounded by one step per frame during the cooldown
        assert!(max_x <= 20.0 + 1.0 + 1e-3, "max_x = {max_x}");
        assert!(e.body.pos.x >= -21.0 - 1e-3);
    }

    #[test]
    fn test_turn_cooldown_prevents_jitter() {
        let mut e = chaser_at(0.0);
        e.try_turn(0.0);
        assert_eq!(e.direction, -1.0);
        e.try_turn(100.0);
        assert_eq!(e.direction, -1.0);
        e.try_turn(500.0);
        assert_eq!(e.direction, 1.0);
    }

    #[test]
    fn test_patrol_turns_at_ledge() {
        // Narrow ledge; patrol bounds are wider than the ledge
        let ledge = vec![Rect::new(0.0, 132.0, 60.0, 40.0)];
        let mut e = Enemy::new(EnemyKind::Patroller, Vec2::new(10.0, 100.0), EnemyTuning::default())
            .with_patrol_distance(500.0);
        let mut now = 0.0;
        for _ in 0..600 {
            e.update(&ledge, None, now, 16.0);
            now += 16.0;
        }
        assert!(e.body.grounded, "enemy walked off the ledge");
        assert!(e.body.pos.x >= -16.0 && e.body.pos.x <= 60.0);
    }

    #[test]
    fn test_wall_hit_turns_patroller() {
        let solids = vec![
            Rect::new(-1000.0, 132.0, 4000.0, 40.0),
            Rect::new(60.0, 0.0, 20.0, 132.0),
        ];
        let mut e = Enemy::new(EnemyKind::Patroller, Vec2::new(20.0, 100.0), EnemyTuning::default())
            .with_patrol_distance(500.0);
        e.body.grounded = true;
        let mut now = 0.0;
        for _ in 0..30 {
            e.update(&solids, None, now, 16.0);
            now += 16.0;
        }
        assert_eq!(e.direction, -1.0);
        assert!(e.body.pos.x + e.body.size.x <= 60.0);
    }

    #[test]
    fn test_death_freezes_and_expires() {
        let floor = floor();
        let mut e = chaser_at(0.0);
        assert!(e.kill());
        assert!(!e.is_alive());
        assert!(!e.kill());

        let x = e.body.pos.x;
        e.update(&floor, Some(Vec2::new(0.0, 0.0)), 0.0, 250.0);
        assert_eq!(e.body.vel.x, 0.0);
        assert_eq!(e.body.pos.x, x);
        assert!(!e.is_expired());
        e.update(&floor, None, 250.0, 250.0);
        assert!(e.is_expired());
    }
}
