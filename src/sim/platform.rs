//! Platforms: static, moving, crumbling and bouncy
//!
//! A single entity type whose behavior is picked by [`PlatformKind`]. The
//! collision rectangle is shared by all variants; a crumbling platform stops
//! reporting it once it has given way.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Solid;
use super::edge::{Edge, EdgeDetector};
use super::rect::Rect;

/// Axis a moving platform oscillates along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveAxis {
    Horizontal,
    Vertical,
}

impl MoveAxis {
    fn unit(self) -> Vec2 {
        match self {
            MoveAxis::Horizontal => Vec2::X,
            MoveAxis::Vertical => Vec2::Y,
        }
    }
}

/// Oscillation state of a moving platform
#[derive(Debug, Clone, PartialEq)]
pub struct Mover {
    pub axis: MoveAxis,
    pub amplitude: f32,
    /// Pixels per frame
    pub speed: f32,
    direction: f32,
    offset: f32,
}

/// Decorative chunk thrown off a crumbling platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Debris {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub life_ms: f32,
    pub max_life_ms: f32,
}

impl Debris {
    /// Remaining life in 0..=1 (for fading)
    pub fn alpha(&self) -> f32 {
        (self.life_ms / self.max_life_ms).clamp(0.0, 1.0)
    }
}

const DEBRIS_GRAVITY: f32 = 0.3;

/// Decay state of a crumbling platform
#[derive(Debug, Clone, PartialEq)]
pub struct Crumble {
    pub delay_ms: f64,
    standing_ms: f64,
    crumbling: bool,
    occupancy: EdgeDetector,
    debris: Vec<Debris>,
    debris_count: usize,
    debris_lifetime_ms: f32,
}

/// Spring state of a bouncy platform
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    pub force: f32,
    squash_ms: f32,
    squash_total_ms: f32,
}

/// Behavior variant
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformKind {
    Static,
    Moving(Mover),
    Crumbling(Crumble),
    Bouncy(Spring),
}

/// Something a platform update wants the game to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    Crumbled,
}

/// A platform entity
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub rect: Rect,
    /// Resting position the platform resets to (and oscillates around)
    pub anchor: Vec2,
    pub kind: PlatformKind,
    /// Movement applied during the last update
    last_delta: Vec2,
}

impl Platform {
    pub fn new(rect: Rect, kind: PlatformKind) -> Self {
        Self {
            rect,
            anchor: rect.pos(),
            kind,
            last_delta: Vec2::ZERO,
        }
    }

    pub fn new_static(rect: Rect) -> Self {
        Self::new(rect, PlatformKind::Static)
    }

    pub fn new_moving(rect: Rect, axis: MoveAxis, amplitude: f32, speed: f32) -> Self {
        Self::new(
            rect,
            PlatformKind::Moving(Mover {
                axis,
                amplitude: amplitude.abs(),
                speed: speed.abs(),
                direction: 1.0,
                offset: 0.0,
            }),
        )
    }

    pub fn new_crumbling(
        rect: Rect,
        delay_ms: f64,
        debris_count: usize,
        debris_lifetime_ms: f32,
    ) -> Self {
        Self::new(
            rect,
            PlatformKind::Crumbling(Crumble {
                delay_ms,
                standing_ms: 0.0,
                crumbling: false,
                occupancy: EdgeDetector::default(),
                debris: Vec::new(),
                debris_count,
                debris_lifetime_ms,
            }),
        )
    }

    pub fn new_bouncy(rect: Rect, force: f32, squash_ms: f32) -> Self {
        Self::new(
            rect,
            PlatformKind::Bouncy(Spring {
                force,
                squash_ms: 0.0,
                squash_total_ms: squash_ms,
            }),
        )
    }

    /// Advance behavior timers
    ///
    /// `player_on_top` is true when the player is grounded on this platform
    /// this frame.
    pub fn update<R: Rng>(
        &mut self,
        dt_ms: f64,
        player_on_top: bool,
        rng: &mut R,
    ) -> Option<PlatformEvent> {
        self.last_delta = Vec2::ZERO;
        match &mut self.kind {
            PlatformKind::Static => None,

            PlatformKind::Moving(mover) => {
                mover.offset += mover.speed * mover.direction;
                if mover.offset >= mover.amplitude {
                    mover.offset = mover.amplitude;
                    mover.direction = -1.0;
                } else if mover.offset <= -mover.amplitude {
                    mover.offset = -mover.amplitude;
                    mover.direction = 1.0;
                }
                let new_pos = self.anchor + mover.axis.unit() * mover.offset;
                self.last_delta = new_pos - self.rect.pos();
                self.rect.x = new_pos.x;
                self.rect.y = new_pos.y;
                None
            }

            PlatformKind::Crumbling(crumble) => {
                let dt = dt_ms as f32;
                for d in &mut crumble.debris {
                    d.vel.y += DEBRIS_GRAVITY;
                    d.pos += d.vel;
                    d.life_ms -= dt;
                }
                crumble.debris.retain(|d| d.life_ms > 0.0);

                if crumble.crumbling {
                    return None;
                }

                if crumble.occupancy.update(player_on_top) == Edge::Rising {
                    log::debug!(
                        "Crumbling platform at ({}, {}) occupied",
                        self.rect.x,
                        self.rect.y
                    );
                }

                if player_on_top {
                    crumble.standing_ms += dt_ms;
                    if crumble.standing_ms >= crumble.delay_ms {
                        crumble.crumbling = true;
                        let lifetime = crumble.debris_lifetime_ms;
                        let rect = self.rect;
                        crumble.debris.extend((0..crumble.debris_count).map(|_| Debris {
                            pos: Vec2::new(
                                rect.x + rng.random_range(0.0..=rect.width),
                                rect.y + rng.random_range(0.0..=rect.height),
                            ),
                            vel: Vec2::new(rng.random_range(-2.0..=2.0), rng.random_range(-3.0..=0.0)),
                            size: rng.random_range(4.0..=8.0),
                            life_ms: lifetime,
                            max_life_ms: lifetime,
                        }));
                        return Some(PlatformEvent::Crumbled);
                    }
                }
                None
            }

            PlatformKind::Bouncy(spring) => {
                spring.squash_ms = (spring.squash_ms - dt_ms as f32).max(0.0);
                None
            }
        }
    }

    /// Movement applied during the last update
    pub fn delta(&self) -> Vec2 {
        self.last_delta
    }

    /// Movers carry whoever stands on them by their frame delta
    pub fn carries_rider(&self) -> bool {
        matches!(&self.kind, PlatformKind::Moving(_))
    }

    /// Launch impulse for bouncy platforms
    pub fn bounce_force(&self) -> Option<f32> {
        match &self.kind {
            PlatformKind::Bouncy(spring) => Some(spring.force),
            _ => None,
        }
    }

    /// Start the squash animation
    pub fn trigger_bounce(&mut self) {
        if let PlatformKind::Bouncy(spring) = &mut self.kind {
            spring.squash_ms = spring.squash_total_ms;
        }
    }

    /// Squash animation progress in 0..=1 (1 = just hit)
    pub fn squash(&self) -> f32 {
        match &self.kind {
            PlatformKind::Bouncy(spring) if spring.squash_total_ms > 0.0 => {
                spring.squash_ms / spring.squash_total_ms
            }
            _ => 0.0,
        }
    }

    pub fn is_crumbling(&self) -> bool {
        matches!(&self.kind, PlatformKind::Crumbling(c) if c.crumbling)
    }

    pub fn debris(&self) -> &[Debris] {
        match &self.kind {
            PlatformKind::Crumbling(c) => &c.debris,
            _ => &[],
        }
    }

    /// Restore the platform to its level-start state
    pub fn reset(&mut self) {
        self.rect.x = self.anchor.x;
        self.rect.y = self.anchor.y;
        self.last_delta = Vec2::ZERO;
        match &mut self.kind {
            PlatformKind::Static => {}
            PlatformKind::Moving(mover) => {
                mover.offset = 0.0;
                mover.direction = 1.0;
            }
            PlatformKind::Crumbling(crumble) => {
                crumble.standing_ms = 0.0;
                crumble.crumbling = false;
                crumble.occupancy.reset();
                crumble.debris.clear();
            }
            PlatformKind::Bouncy(spring) => spring.squash_ms = 0.0,
        }
    }
}

impl Solid for Platform {
    fn solid_rect(&self) -> Option<Rect> {
        if self.is_crumbling() {
            None
        } else {
            Some(self.rect)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(1)
    }

    #[test]
    fn test_moving_platform_oscillates_within_bounds() {
        let mut rng = rng();
        let mut p = Platform::new_moving(
            Rect::new(100.0, 200.0, 80.0, 16.0),
            MoveAxis::Horizontal,
            10.0,
            3.0,
        );
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for _ in 0..50 {
            p.update(16.0, false, &mut rng);
            min_x = min_x.min(p.rect.x);
            max_x = max_x.max(p.rect.x);
        }
        assert_eq!(min_x, 90.0);
        assert_eq!(max_x, 110.0);
        assert_eq!(p.rect.y, 200.0);
    }

    #[test]
    fn test_moving_platform_reports_delta() {
        let mut rng = rng();
        let mut p = Platform::new_moving(
            Rect::new(0.0, 0.0, 80.0, 16.0),
            MoveAxis::Horizontal,
            50.0,
            2.0,
        );
        p.update(16.0, false, &mut rng);
        assert_eq!(p.delta(), Vec2::new(2.0, 0.0));
        assert!(p.carries_rider());
    }

    #[test]
    fn test_vertical_mover_carries_along_y() {
        let mut rng = rng();
        let mut p = Platform::new_moving(
            Rect::new(0.0, 0.0, 80.0, 16.0),
            MoveAxis::Vertical,
            50.0,
            2.0,
        );
        p.update(16.0, false, &mut rng);
        assert!(p.carries_rider());
        assert_eq!(p.delta(), Vec2::new(0.0, 2.0));
        assert!(!Platform::new_static(Rect::new(0.0, 0.0, 80.0, 16.0)).carries_rider());
    }

    #[test]
    fn test_crumble_delay_boundary() {
        let mut rng = rng();
        let mut p = Platform::new_crumbling(Rect::new(0.0, 0.0, 64.0, 16.0), 1000.0, 6, 500.0);

        assert_eq!(p.update(999.0, true, &mut rng), None);
        assert!(p.solid_rect().is_some());

        assert_eq!(p.update(1.0, true, &mut rng), Some(PlatformEvent::Crumbled));
        assert!(p.solid_rect().is_none());
        assert_eq!(p.debris().len(), 6);
    }

    #[test]
    fn test_crumble_never_reactivates_until_reset() {
        let mut rng = rng();
        let mut p = Platform::new_crumbling(Rect::new(0.0, 0.0, 64.0, 16.0), 100.0, 4, 200.0);
        p.update(150.0, true, &mut rng);
        assert!(p.is_crumbling());

        for _ in 0..20 {
            assert_eq!(p.update(50.0, false, &mut rng), None);
            assert!(p.solid_rect().is_none());
        }
        // Debris has timed out by now
        assert!(p.debris().is_empty());

        p.reset();
        assert!(p.solid_rect().is_some());
    }

    #[test]
    fn test_crumble_timer_only_runs_while_occupied() {
        let mut rng = rng();
        let mut p = Platform::new_crumbling(Rect::new(0.0, 0.0, 64.0, 16.0), 1000.0, 4, 200.0);
        p.update(600.0, true, &mut rng);
        p.update(5000.0, false, &mut rng);
        assert!(!p.is_crumbling());
        p.update(400.0, true, &mut rng);
        assert!(p.is_crumbling());
    }

    #[test]
    fn test_bounce_squash_decays() {
        let mut rng = rng();
        let mut p = Platform::new_bouncy(Rect::new(0.0, 0.0, 64.0, 16.0), 15.0, 200.0);
        assert_eq!(p.bounce_force(), Some(15.0));
        p.trigger_bounce();
        assert_eq!(p.squash(), 1.0);
        p.update(100.0, false, &mut rng);
        assert!((p.squash() - 0.5).abs() < 1e-6);
        p.update(500.0, false, &mut rng);
        assert_eq!(p.squash(), 0.0);
    }
}
