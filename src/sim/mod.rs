//! Simulation core
//!
//! All gameplay logic lives here. This module is pure computation:
//! - One tick per frame, with the frame delta clamped by the caller
//! - Randomness only through the session's `Pcg32`
//! - Fixed update order within a frame
//! - No rendering, audio or platform dependencies

pub mod background;
pub mod camera;
pub mod checkpoint;
pub mod collectible;
pub mod collision;
pub mod edge;
pub mod enemy;
pub mod level;
pub mod levels;
pub mod platform;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use background::{Background, ParallaxLayer};
pub use camera::{Camera, CameraTarget, ViewTransform};
pub use checkpoint::Checkpoint;
pub use collectible::{CollectEffect, Collectible, CollectibleKind, Collection};
pub use collision::{Body, CollisionReport, MotionLimits, Solid, resolve_collisions};
pub use edge::{Edge, EdgeDetector};
pub use enemy::{Enemy, EnemyKind, EnemyState};
pub use level::{Level, LevelData, LevelSource, PlatformBehavior, PlatformSpec, Theme};
pub use levels::{BuiltinLevels, builtin_level, generate_level};
pub use platform::{Debris, MoveAxis, Platform, PlatformKind};
pub use player::{Facing, Player, PlayerAnim, PlayerInput, WorldBounds};
pub use rect::Rect;
pub use state::{CompletionBonus, GameEvent, GamePhase, GameState};
pub use tick::tick;
