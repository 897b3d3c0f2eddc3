//! Collectibles: coins, gems, health packs and stars
//!
//! Items bob around their spawn height, drift toward a nearby player, and
//! report their effect exactly once when touched.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::CollectibleTuning;

/// Item variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Gem,
    Health,
    Star,
}

/// What collecting an item does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectEffect {
    /// Adds value to the score
    Score,
    /// Restores value health
    Health,
    /// Adds value to the score and grants an extra life
    Special,
}

impl CollectibleKind {
    pub fn default_value(self) -> u32 {
        match self {
            CollectibleKind::Coin => 10,
            CollectibleKind::Gem => 50,
            CollectibleKind::Health => 25,
            CollectibleKind::Star => 100,
        }
    }

    pub fn effect(self) -> CollectEffect {
        match self {
            CollectibleKind::Coin | CollectibleKind::Gem => CollectEffect::Score,
            CollectibleKind::Health => CollectEffect::Health,
            CollectibleKind::Star => CollectEffect::Special,
        }
    }
}

/// Reported once when an item is picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub kind: CollectibleKind,
    pub value: u32,
    pub effect: CollectEffect,
}

/// A collectible entity
#[derive(Debug, Clone)]
pub struct Collectible {
    pub rect: Rect,
    pub kind: CollectibleKind,
    pub value: u32,
    pub collected: bool,
    /// Post-collection animation progress in 0..=1
    pub collect_progress: f32,
    /// Spawn position
    origin: Vec2,
    /// Resting height the bob oscillates around
    base_y: f32,
    bob_phase: f32,
    elapsed_ms: f32,
    tuning: CollectibleTuning,
}

impl Collectible {
    pub fn new(kind: CollectibleKind, pos: Vec2, tuning: CollectibleTuning) -> Self {
        // Stagger bobbing so neighbouring items don't move in lockstep
        let bob_phase = (pos.x * 0.05 + pos.y * 0.03) % std::f32::consts::TAU;
        Self {
            rect: Rect::new(pos.x, pos.y, tuning.size, tuning.size),
            kind,
            value: kind.default_value(),
            collected: false,
            collect_progress: 0.0,
            origin: pos,
            base_y: pos.y,
            bob_phase,
            elapsed_ms: 0.0,
            tuning,
        }
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Still drawn (uncollected, or collection animation running)
    pub fn is_visible(&self) -> bool {
        !self.collected || self.collect_progress < 1.0
    }

    /// Bob, magnet pull, or collection animation
    pub fn update(&mut self, dt_ms: f64, player_center: Option<Vec2>) {
        let dt = dt_ms as f32;

        if self.collected {
            if self.collect_progress < 1.0 {
                self.collect_progress =
                    (self.collect_progress + dt / self.tuning.collect_anim_ms).min(1.0);
                self.rect.y -= 1.0;
            }
            return;
        }

        self.elapsed_ms += dt;

        if let Some(target) = player_center {
            let to_player = target - self.center();
            let dist = to_player.length();
            if dist > 0.0 && dist < self.tuning.magnet_radius {
                let pull = (1.0 - dist / self.tuning.magnet_radius) * self.tuning.magnet_speed;
                let step = to_player / dist * pull.min(dist);
                self.rect.x += step.x;
                self.base_y += step.y;
            }
        }

        let bob = (self.elapsed_ms * self.tuning.bob_speed + self.bob_phase).sin();
        self.rect.y = self.base_y + bob * self.tuning.bob_amplitude;
    }

    /// Mark collected on overlap; `None` if already collected or not touching
    pub fn check_player_collision(&mut self, player: &Rect) -> Option<Collection> {
        if self.collected || !self.rect.overlaps(player) {
            return None;
        }
        self.collected = true;
        self.collect_progress = 0.0;
        Some(Collection {
            kind: self.kind,
            value: self.value,
            effect: self.kind.effect(),
        })
    }

    /// Back to the spawn state (level restart)
    pub fn reset(&mut self) {
        self.rect.x = self.origin.x;
        self.rect.y = self.origin.y;
        self.base_y = self.origin.y;
        self.collected = false;
        self.collect_progress = 0.0;
        self.elapsed_ms = 0.0;
    }
}
