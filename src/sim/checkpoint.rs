//! Checkpoints
//!
//! Activation is edge-triggered on the player's center entering the
//! activation radius, and fires at most once per level life.

use glam::Vec2;

use super::edge::{Edge, EdgeDetector};
use super::player::Player;
use super::rect::Rect;
use crate::distance;
use crate::tuning::CheckpointTuning;

#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub rect: Rect,
    pub activated: bool,
    pub activation_range: f32,
    proximity: EdgeDetector,
}

impl Checkpoint {
    pub fn new(pos: Vec2, tuning: CheckpointTuning) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, tuning.width, tuning.height),
            activated: false,
            activation_range: tuning.activation_range,
            proximity: EdgeDetector::default(),
        }
    }

    pub fn was_player_near(&self) -> bool {
        self.proximity.is_high()
    }

    /// Respawn point that stands the player on the checkpoint's base
    pub fn respawn_point(&self, player_size: Vec2) -> Vec2 {
        Vec2::new(
            self.rect.x + self.rect.width / 2.0 - player_size.x / 2.0,
            self.rect.y + self.rect.height - player_size.y,
        )
    }

    /// Track proximity; on activation, write the respawn point into the player
    pub fn check_player(&mut self, player: &mut Player) -> bool {
        let near = distance(self.rect.center(), player.body.center()) <= self.activation_range;
        let entered = self.proximity.update(near) == Edge::Rising;
        if !entered || self.activated {
            return false;
        }
        self.activated = true;
        let respawn = self.respawn_point(player.body.size);
        player.set_checkpoint(respawn);
        log::debug!("Checkpoint activated, respawn at ({}, {})", respawn.x, respawn.y);
        true
    }

    pub fn reset(&mut self) {
        self.activated = false;
        self.proximity.reset();
    }
}
