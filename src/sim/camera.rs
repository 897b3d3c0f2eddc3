//! Camera controller
//!
//! Soft deadzone tracking with a low-pass filtered velocity, eased zoom,
//! decaying shake and a full-screen flash. The camera never owns its target:
//! the caller passes a [`CameraTarget`] snapshot every frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::lerp;
use crate::tuning::CameraTuning;

/// What the camera follows this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub center: Vec2,
    pub velocity: Vec2,
}

/// World-to-screen parameters for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// World position drawn at the screen's top-left corner (shake included)
    pub offset: Vec2,
    pub zoom: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Shake {
    intensity: f32,
    duration_ms: f64,
    elapsed_ms: f64,
    offset: Vec2,
}

#[derive(Debug, Clone, Copy, Default)]
struct Flash {
    duration_ms: f64,
    elapsed_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Camera {
    /// Top-left corner of the view in world space (without shake)
    pub pos: Vec2,
    pub vel: Vec2,
    pub zoom: f32,
    pub target_zoom: f32,
    /// World size the view is clamped to
    pub world: Vec2,
    pub viewport: Vec2,
    pub deadzone: Vec2,
    /// Horizontal lean computed from target velocity; not applied to tracking
    lookahead_bias: f32,
    shake: Shake,
    flash: Flash,
    tuning: CameraTuning,
}

impl Camera {
    pub fn new(tuning: CameraTuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            zoom: 1.0_f32.clamp(tuning.min_zoom, tuning.max_zoom),
            target_zoom: 1.0_f32.clamp(tuning.min_zoom, tuning.max_zoom),
            world: Vec2::new(tuning.viewport_width, tuning.viewport_height),
            viewport: Vec2::new(tuning.viewport_width, tuning.viewport_height),
            deadzone: Vec2::new(tuning.deadzone_width, tuning.deadzone_height),
            lookahead_bias: 0.0,
            shake: Shake::default(),
            flash: Flash::default(),
            tuning,
        }
    }

    /// Visible world area at the current zoom
    pub fn view_size(&self) -> Vec2 {
        self.viewport / self.zoom
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.view_size() / 2.0
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.world = Vec2::new(width, height);
        self.clamp_to_bounds();
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.target_zoom = zoom.clamp(self.tuning.min_zoom, self.tuning.max_zoom);
    }

    /// Center on a point immediately (level load, respawn)
    pub fn snap_to(&mut self, center: Vec2) {
        self.pos = center - self.view_size() / 2.0;
        self.vel = Vec2::ZERO;
        self.clamp_to_bounds();
    }

    /// Start a shake; a weaker shake does not cut a stronger one short
    pub fn shake(&mut self, intensity: f32, duration_ms: f64) {
        if self.is_shaking() && self.current_shake_intensity() > intensity {
            return;
        }
        self.shake = Shake {
            intensity,
            duration_ms,
            elapsed_ms: 0.0,
            offset: Vec2::ZERO,
        };
    }

    pub fn flash(&mut self, duration_ms: f64) {
        self.flash = Flash {
            duration_ms,
            elapsed_ms: 0.0,
        };
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.elapsed_ms < self.shake.duration_ms
    }

    fn current_shake_intensity(&self) -> f32 {
        if self.shake.duration_ms <= 0.0 {
            return 0.0;
        }
        let remaining = 1.0 - self.shake.elapsed_ms / self.shake.duration_ms;
        self.shake.intensity * remaining.max(0.0) as f32
    }

    /// Flash opacity in 0..=1
    pub fn flash_alpha(&self) -> f32 {
        if self.flash.duration_ms <= 0.0 {
            return 0.0;
        }
        (1.0 - self.flash.elapsed_ms / self.flash.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn lookahead_bias(&self) -> f32 {
        self.lookahead_bias
    }

    pub fn update<R: Rng>(&mut self, target: Option<CameraTarget>, dt_ms: f64, rng: &mut R) {
        if let Some(target) = target {
            self.follow(target);
        }

        self.zoom = lerp(self.zoom, self.target_zoom, self.tuning.zoom_speed)
            .clamp(self.tuning.min_zoom, self.tuning.max_zoom);

        self.clamp_to_bounds();

        if self.is_shaking() {
            self.shake.elapsed_ms += dt_ms;
            let i = self.current_shake_intensity();
            self.shake.offset = if i > 0.0 {
                Vec2::new(rng.random_range(-i..=i), rng.random_range(-i..=i))
            } else {
                Vec2::ZERO
            };
        } else {
            self.shake.offset = Vec2::ZERO;
        }

        if self.flash.elapsed_ms < self.flash.duration_ms {
            self.flash.elapsed_ms += dt_ms;
        }
    }

    fn follow(&mut self, target: CameraTarget) {
        let center = self.center();

        self.lookahead_bias = target.velocity.x * self.tuning.lookahead;
        let mut desired = Vec2::new(target.center.x + self.lookahead_bias, target.center.y);

        // Deadzone: move only by the excess beyond its edges
        let half = self.deadzone / 2.0;
        let dx = target.center.x - center.x;
        let dy = target.center.y - center.y;
        desired.x = if dx > half.x {
            center.x + dx - half.x
        } else if dx < -half.x {
            center.x + dx + half.x
        } else {
            center.x
        };
        desired.y = if dy > half.y {
            center.y + dy - half.y
        } else if dy < -half.y {
            center.y + dy + half.y
        } else {
            center.y
        };

        let delta = desired - center;
        self.vel = self
            .vel
            .lerp(delta * self.tuning.follow_speed, self.tuning.smoothing);
        self.pos += self.vel;
    }

    fn clamp_to_bounds(&mut self) {
        let max = (self.world - self.view_size()).max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }

    pub fn view_transform(&self) -> ViewTransform {
        ViewTransform {
            offset: self.pos + self.shake.offset,
            zoom: self.zoom,
        }
    }

    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        let view = self.view_transform();
        (point - view.offset) * view.zoom
    }

    /// Culling query: does `rect` intersect the view (plus `margin`)?
    pub fn is_visible(&self, rect: &Rect, margin: f32) -> bool {
        let size = self.view_size();
        let view = Rect::new(
            self.pos.x - margin,
            self.pos.y - margin,
            size.x + margin * 2.0,
            size.y + margin * 2.0,
        );
        view.overlaps(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn camera() -> Camera {
        let mut cam = Camera::new(CameraTuning::default());
        cam.set_bounds(5000.0, 2000.0);
        cam.snap_to(Vec2::new(1000.0, 1000.0));
        cam
    }

    fn still(center: Vec2) -> Option<CameraTarget> {
        Some(CameraTarget {
            center,
            velocity: Vec2::ZERO,
        })
    }

    #[test]
    fn test_target_inside_deadzone_holds_position() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut cam = camera();
        let start = cam.pos;
        for _ in 0..60 {
            cam.update(still(Vec2::new(1080.0, 1040.0)), 16.0, &mut rng);
        }
        assert_eq!(cam.pos, start);
    }

    #[test]
    fn test_target_outside_deadzone_is_approached_softly() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut cam = camera();
        let target = Vec2::new(1400.0, 1000.0);
        cam.update(still(target), 16.0, &mut rng);
        let first_step = cam.pos.x - 600.0;
        // Excess is 300px; first step is excess * follow * smoothing
        assert!((first_step - 300.0 * 0.1 * 0.2).abs() < 1e-3);

        for _ in 0..600 {
            cam.update(still(target), 16.0, &mut rng);
        }
        // Settles with the target on the deadzone edge, not centered
        let dx = target.x - cam.center().x;
        assert!((dx - cam.deadzone.x / 2.0).abs() < 1.0, "dx = {dx}");
    }

    #[test]
    fn test_lookahead_has_no_effect_on_tracking() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut slow = camera();
        let mut fast = camera();
        for _ in 0..30 {
            slow.update(still(Vec2::new(1400.0, 1000.0)), 16.0, &mut rng);
            fast.update(
                Some(CameraTarget {
                    center: Vec2::new(1400.0, 1000.0),
                    velocity: Vec2::new(6.0, 0.0),
                }),
                16.0,
                &mut rng,
            );
        }
        assert_eq!(slow.pos, fast.pos);
        assert_eq!(fast.lookahead_bias(), 60.0);
    }

    #[test]
    fn test_clamped_to_world_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut cam = camera();
        cam.snap_to(Vec2::ZERO);
        assert_eq!(cam.pos, Vec2::ZERO);
        for _ in 0..300 {
            cam.update(still(Vec2::new(6000.0, 3000.0)), 16.0, &mut rng);
        }
        assert_eq!(cam.pos, Vec2::new(5000.0 - 800.0, 2000.0 - 600.0));
    }

    #[test]
    fn test_small_world_pins_to_origin() {
        let mut cam = Camera::new(CameraTuning::default());
        cam.set_bounds(400.0, 300.0);
        cam.snap_to(Vec2::new(200.0, 150.0));
        assert_eq!(cam.pos, Vec2::ZERO);
    }

    #[test]
    fn test_shake_decays_and_stays_out_of_position() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut cam = camera();
        let rest = cam.pos;
        cam.shake(10.0, 300.0);
        cam.update(None, 16.0, &mut rng);
        let offset = cam.view_transform().offset - cam.pos;
        assert!(offset.x.abs() <= 10.0 && offset.y.abs() <= 10.0);
        assert_eq!(cam.pos, rest);

        for _ in 0..30 {
            cam.update(None, 16.0, &mut rng);
        }
        assert!(!cam.is_shaking());
        assert_eq!(cam.view_transform().offset, cam.pos);
    }

    #[test]
    fn test_zoom_eases_and_clamps() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut cam = camera();
        cam.set_zoom(10.0);
        assert_eq!(cam.target_zoom, CameraTuning::default().max_zoom);
        cam.update(None, 16.0, &mut rng);
        assert!(cam.zoom > 1.0 && cam.zoom < 2.0);
        for _ in 0..500 {
            cam.update(None, 16.0, &mut rng);
        }
        assert!((cam.zoom - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_flash_fades() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut cam = camera();
        cam.flash(100.0);
        assert_eq!(cam.flash_alpha(), 1.0);
        cam.update(None, 50.0, &mut rng);
        assert!((cam.flash_alpha() - 0.5).abs() < 1e-6);
        cam.update(None, 50.0, &mut rng);
        assert_eq!(cam.flash_alpha(), 0.0);
    }

    #[test]
    fn test_world_to_screen_and_culling() {
        let cam = camera();
        assert_eq!(cam.world_to_screen(cam.pos), Vec2::ZERO);
        assert!(cam.is_visible(&Rect::new(1000.0, 1000.0, 10.0, 10.0), 0.0));
        assert!(!cam.is_visible(&Rect::new(3000.0, 1000.0, 10.0, 10.0), 50.0));
    }
}
