//! Parallax background
//!
//! Purely cosmetic: each layer scrolls at a fraction of the camera's motion
//! plus an optional ambient drift (clouds, fog). Offsets wrap at the layer's
//! tile width so the renderer can tile a single strip.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::Theme;

/// One scrolling layer, far to near
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    /// Fraction of camera motion applied (0 = fixed to screen, 1 = world)
    pub factor: f32,
    /// Ambient scroll in pixels per millisecond
    pub drift: f32,
    /// Tile width the horizontal offset wraps at
    pub tile_width: f32,
    /// RGB tint, 0xRRGGBB
    pub tint: u32,
    /// Current draw offset (x wrapped to `(-tile_width, 0]`)
    pub offset: Vec2,
}

impl ParallaxLayer {
    const fn new(factor: f32, drift: f32, tile_width: f32, tint: u32) -> Self {
        Self {
            factor,
            drift,
            tile_width,
            tint,
            offset: Vec2::ZERO,
        }
    }
}

fn layers_for(theme: Theme) -> Vec<ParallaxLayer> {
    match theme {
        Theme::Meadow => vec![
            ParallaxLayer::new(0.1, 0.0, 1600.0, 0x87ceeb),
            ParallaxLayer::new(0.2, 0.01, 1200.0, 0xffffff),
            ParallaxLayer::new(0.4, 0.0, 1000.0, 0x6b8e23),
            ParallaxLayer::new(0.7, 0.0, 800.0, 0x228b22),
        ],
        Theme::Cavern => vec![
            ParallaxLayer::new(0.15, 0.0, 1200.0, 0x1b1b2f),
            ParallaxLayer::new(0.35, 0.0, 900.0, 0x2e2e48),
            ParallaxLayer::new(0.6, 0.005, 700.0, 0x44445e),
        ],
        Theme::Skyline => vec![
            ParallaxLayer::new(0.05, 0.0, 2000.0, 0xfdb99b),
            ParallaxLayer::new(0.15, 0.02, 1400.0, 0xffffff),
            ParallaxLayer::new(0.3, 0.04, 1000.0, 0xf0f8ff),
        ],
        Theme::Fortress => vec![
            ParallaxLayer::new(0.1, 0.0, 1600.0, 0x2f1b1b),
            ParallaxLayer::new(0.3, 0.0, 1000.0, 0x4a2c2a),
            ParallaxLayer::new(0.55, 0.008, 800.0, 0x6b3e26),
        ],
    }
}

#[derive(Debug, Clone)]
pub struct Background {
    pub theme: Theme,
    pub layers: Vec<ParallaxLayer>,
    elapsed_ms: f64,
}

impl Background {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            layers: layers_for(theme),
            elapsed_ms: 0.0,
        }
    }

    /// Swap layer sets on level load
    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.theme {
            self.theme = theme;
            self.layers = layers_for(theme);
        }
        self.elapsed_ms = 0.0;
    }

    pub fn update(&mut self, camera_pos: Vec2, dt_ms: f64) {
        self.elapsed_ms += dt_ms;
        let elapsed = self.elapsed_ms as f32;
        for layer in &mut self.layers {
            let x = -(camera_pos.x * layer.factor) - layer.drift * elapsed;
            layer.offset.x = if layer.tile_width > 0.0 {
                -(-x).rem_euclid(layer.tile_width)
            } else {
                x
            };
            layer.offset.y = -(camera_pos.y * layer.factor * 0.5);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_layers_scroll_faster() {
        let mut bg = Background::new(Theme::Cavern);
        bg.update(Vec2::new(100.0, 0.0), 0.0);
        let far = bg.layers[0].offset.x;
        let near = bg.layers[2].offset.x;
        assert!(near < far);
        assert!((far + 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_offset_wraps_at_tile_width() {
        let mut bg = Background::new(Theme::Meadow);
        bg.update(Vec2::new(100_000.0, 0.0), 16.0);
        for layer in &bg.layers {
            assert!(layer.offset.x <= 0.0 && layer.offset.x > -layer.tile_width);
        }
    }

    #[test]
    fn test_drift_moves_without_camera() {
        let mut bg = Background::new(Theme::Skyline);
        bg.update(Vec2::ZERO, 0.0);
        let before = bg.layers[2].offset.x;
        bg.update(Vec2::ZERO, 100.0);
        assert!(bg.layers[2].offset.x != before);
        // Static layer stays put
        assert_eq!(bg.layers[0].offset.x, 0.0);
    }

    #[test]
    fn test_set_theme_swaps_layers() {
        let mut bg = Background::new(Theme::Meadow);
        bg.set_theme(Theme::Fortress);
        assert_eq!(bg.theme, Theme::Fortress);
        assert_eq!(bg.layers.len(), 3);
    }
}
