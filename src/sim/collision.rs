//! Collision detection and response for axis-aligned geometry
//!
//! Player and enemies share the same integration and resolution path: a
//! [`Body`] moves, then gets pushed out of every solid it overlaps along the
//! axis of least overlap. Side effects that differ per entity (double-jump
//! reset, patrol turn-around) are driven from the returned
//! [`CollisionReport`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// How far below a platform's top the previous frame's feet may be and still
/// count as landing (covers platforms that moved up into the body)
pub const LANDING_TOLERANCE: f32 = 6.0;

/// Feet within this distance of a top surface count as resting on it
pub const SUPPORT_EPSILON: f32 = 0.5;

/// Anything that may block a body
pub trait Solid {
    /// Collision rectangle, or `None` while the solid is not colliding
    fn solid_rect(&self) -> Option<Rect>;
}

impl Solid for Rect {
    fn solid_rect(&self) -> Option<Rect> {
        Some(*self)
    }
}

/// Movement limits applied before integration
#[derive(Debug, Clone, Copy)]
pub struct MotionLimits {
    pub gravity: f32,
    pub max_up_speed: f32,
    pub max_fall_speed: f32,
    pub max_speed: f32,
}

/// A moving axis-aligned body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Landed on a top surface this frame
    pub grounded: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            grounded: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Gravity (skipped while grounded) followed by velocity clamping
    pub fn apply_gravity(&mut self, limits: &MotionLimits) {
        if !self.grounded {
            self.vel.y += limits.gravity;
        }
        self.vel.y = self.vel.y.clamp(-limits.max_up_speed, limits.max_fall_speed);
        self.vel.x = self.vel.x.clamp(-limits.max_speed, limits.max_speed);
    }

    /// Advance position by one frame of velocity
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Stop and place at `pos`
    pub fn teleport(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.grounded = false;
    }
}

/// Result of resolving a body against the solids of a level
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionReport {
    /// Landed on (or is resting on) a top surface
    pub grounded: bool,
    /// Pushed out sideways
    pub hit_wall: bool,
    /// Pushed down out of a platform's underside
    pub hit_ceiling: bool,
    /// Index of the solid providing ground support
    pub landed_on: Option<usize>,
}

/// Push `body` out of every overlapping solid
///
/// `prev_pos` is the body's position before this frame's integration; it
/// decides whether a vertical hit is a landing or a ceiling bump. Each
/// overlap resolves along the axis with the smaller overlap; on an exact tie
/// the vertical axis wins. Grounding is recomputed from scratch.
pub fn resolve_collisions<S: Solid>(
    body: &mut Body,
    prev_pos: Vec2,
    solids: &[S],
) -> CollisionReport {
    let mut report = CollisionReport::default();
    separate(body, prev_pos.y + body.size.y, solids, None, &mut report);

    // Resting exactly on a surface produces no strict overlap
    if !report.grounded && body.vel.y >= 0.0 {
        let current = body.rect();
        for (i, solid) in solids.iter().enumerate() {
            let Some(rect) = solid.solid_rect() else {
                continue;
            };
            if (current.bottom() - rect.top()).abs() <= SUPPORT_EPSILON
                && current.overlap_x(&rect) > 0.0
            {
                body.pos.y = rect.top() - body.size.y;
                body.vel.y = 0.0;
                report.grounded = true;
                report.landed_on = Some(i);
                break;
            }
        }
    }

    body.grounded = report.grounded;
    report
}

/// Move a body standing on solid `rider` by the rider's displacement, then
/// push it out of any other solid the carry drove it into
///
/// The body keeps its grounded state; only the separation is reported.
pub fn carry_rider<S: Solid>(
    body: &mut Body,
    delta: Vec2,
    solids: &[S],
    rider: usize,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let prev_bottom = body.bottom();
    body.pos += delta;
    separate(body, prev_bottom, solids, Some(rider), &mut report);
    report
}

fn separate<S: Solid>(
    body: &mut Body,
    prev_bottom: f32,
    solids: &[S],
    skip: Option<usize>,
    report: &mut CollisionReport,
) {
    for (i, solid) in solids.iter().enumerate() {
        if skip == Some(i) {
            continue;
        }
        let Some(rect) = solid.solid_rect() else {
            continue;
        };
        let current = body.rect();
        if !current.overlaps(&rect) {
            continue;
        }

        let overlap_x = current.overlap_x(&rect);
        let overlap_y = current.overlap_y(&rect);

        if overlap_x < overlap_y {
            if current.center().x < rect.center().x {
                body.pos.x = rect.left() - body.size.x;
            } else {
                body.pos.x = rect.right();
            }
            body.vel.x = 0.0;
            report.hit_wall = true;
        } else if prev_bottom <= rect.top() + LANDING_TOLERANCE {
            body.pos.y = rect.top() - body.size.y;
            body.vel.y = 0.0;
            report.grounded = true;
            report.landed_on = Some(i);
        } else {
            body.pos.y = rect.bottom();
            body.vel.y = 0.0;
            report.hit_ceiling = true;
        }
    }
}

/// True if any solid covers `point`
pub fn point_supported<S: Solid>(point: Vec2, solids: &[S]) -> bool {
    solids
        .iter()
        .filter_map(Solid::solid_rect)
        .any(|rect| rect.contains_point(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> MotionLimits {
        MotionLimits {
            gravity: 0.5,
            max_up_speed: 20.0,
            max_fall_speed: 15.0,
            max_speed: 6.0,
        }
    }

    fn step(body: &mut Body, solids: &[Rect]) -> CollisionReport {
        body.apply_gravity(&limits());
        let prev = body.pos;
        body.integrate();
        resolve_collisions(body, prev, solids)
    }

    #[test]
    fn test_falling_body_lands() {
        let floor = [Rect::new(0.0, 100.0, 200.0, 20.0)];
        let mut body = Body::new(Vec2::new(50.0, 45.0), Vec2::new(32.0, 48.0));
        body.vel.y = 10.0;

        let report = step(&mut body, &floor);
        assert!(report.grounded);
        assert_eq!(report.landed_on, Some(0));
        assert_eq!(body.bottom(), 100.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_resting_body_is_fixed_point() {
        let floor = [Rect::new(0.0, 100.0, 200.0, 20.0)];
        let mut body = Body::new(Vec2::new(50.0, 52.0), Vec2::new(32.0, 48.0));

        step(&mut body, &floor);
        let settled = body.pos;
        for _ in 0..30 {
            let report = step(&mut body, &floor);
            assert!(report.grounded);
            assert_eq!(body.pos, settled);
        }
        assert_eq!(settled.y + 48.0, 100.0);
    }

    #[test]
    fn test_wall_hit_zeroes_horizontal_velocity() {
        let wall = [Rect::new(100.0, 0.0, 20.0, 200.0)];
        let mut body = Body::new(Vec2::new(66.0, 50.0), Vec2::new(32.0, 48.0));
        body.vel.x = 5.0;
        body.grounded = true;

        let report = step(&mut body, &wall);
        assert!(report.hit_wall);
        assert!(!report.grounded);
        assert_eq!(body.vel.x, 0.0);
        assert_eq!(body.pos.x + 32.0, 100.0);
    }

    #[test]
    fn test_ceiling_bump() {
        let ceiling = [Rect::new(0.0, 0.0, 200.0, 20.0)];
        let mut body = Body::new(Vec2::new(50.0, 30.0), Vec2::new(32.0, 48.0));
        body.vel.y = -12.0;

        let report = step(&mut body, &ceiling);
        assert!(report.hit_ceiling);
        assert_eq!(body.pos.y, 20.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_tie_resolves_vertically() {
        // 4px overlap on both axes
        let block = [Rect::new(28.0, 44.0, 40.0, 40.0)];
        let mut body = Body::new(Vec2::new(0.0, 0.0), Vec2::new(32.0, 48.0));
        let report = resolve_collisions(&mut body, Vec2::new(0.0, -4.0), &block);
        assert!(report.grounded);
        assert!(!report.hit_wall);
    }

    #[test]
    fn test_disabled_solid_is_ignored() {
        struct Gone;
        impl Solid for Gone {
            fn solid_rect(&self) -> Option<Rect> {
                None
            }
        }
        let mut body = Body::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let report = resolve_collisions(&mut body, Vec2::ZERO, &[Gone]);
        assert_eq!(report, CollisionReport::default());
    }

    #[test]
    fn test_point_supported() {
        let floor = [Rect::new(0.0, 100.0, 50.0, 20.0)];
        assert!(point_supported(Vec2::new(25.0, 105.0), &floor));
        assert!(!point_supported(Vec2::new(60.0, 105.0), &floor));
    }

    #[test]
    fn test_carry_stops_at_wall() {
        // Rider platform 0 under the body, wall 1 two pixels to the right
        let solids = [
            Rect::new(0.0, 100.0, 100.0, 16.0),
            Rect::new(82.0, 0.0, 40.0, 100.0),
        ];
        let mut body = Body::new(Vec2::new(48.0, 52.0), Vec2::new(32.0, 48.0));
        body.grounded = true;
        let report = carry_rider(&mut body, Vec2::new(5.0, 0.0), &solids, 0);
        assert!(report.hit_wall);
        assert_eq!(body.pos, Vec2::new(50.0, 52.0));
        assert!(!body.rect().overlaps(&solids[1]));
        assert!(body.grounded);
    }

    #[test]
    fn test_carry_ignores_the_rider() {
        let solids = [Rect::new(0.0, 100.0, 100.0, 16.0)];
        let mut body = Body::new(Vec2::new(10.0, 52.0), Vec2::new(32.0, 48.0));
        let report = carry_rider(&mut body, Vec2::new(0.0, 1.0), &solids, 0);
        assert_eq!(report, CollisionReport::default());
        assert_eq!(body.pos, Vec2::new(10.0, 53.0));
    }
}
