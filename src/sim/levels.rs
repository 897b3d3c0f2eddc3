//! Level content
//!
//! Five hand-authored levels, then procedural generation for every level
//! number past them.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collectible::CollectibleKind;
use super::enemy::EnemyKind;
use super::level::{
    CheckpointSpec, CollectibleSpec, EnemySpec, LevelData, LevelSource, PlatformBehavior,
    PlatformSpec, Theme,
};
use super::platform::MoveAxis;
use crate::error::InitError;

/// Number of hand-authored levels
pub const BUILTIN_LEVEL_COUNT: u32 = 5;

/// Ground surface for standard-height levels
const GROUND_Y: f32 = 500.0;
const GROUND_DEPTH: f32 = 100.0;
const LEDGE_HEIGHT: f32 = 20.0;

/// Largest gap generated between ground runs (well inside jump range)
const MAX_GAP: f32 = 180.0;
const CHECKPOINT_SPACING: f32 = 1200.0;

// Authoring helpers. Y values for entities standing on the ground are
// derived from the default body sizes.

fn ground(x: f32, width: f32) -> PlatformSpec {
    PlatformSpec::new(x, GROUND_Y, width, GROUND_DEPTH)
}

fn ledge(x: f32, y: f32, width: f32) -> PlatformSpec {
    PlatformSpec::new(x, y, width, LEDGE_HEIGHT)
}

fn moving(x: f32, y: f32, width: f32, axis: MoveAxis, amplitude: f32) -> PlatformSpec {
    ledge(x, y, width).with(PlatformBehavior::Moving {
        axis,
        amplitude: Some(amplitude),
        speed: None,
    })
}

fn crumbling(x: f32, y: f32, width: f32) -> PlatformSpec {
    ledge(x, y, width).with(PlatformBehavior::Crumbling { delay_ms: None })
}

fn bouncy(x: f32, y: f32, width: f32) -> PlatformSpec {
    ledge(x, y, width).with(PlatformBehavior::Bouncy { force: None })
}

fn enemy(kind: EnemyKind, x: f32, surface_y: f32) -> EnemySpec {
    EnemySpec {
        x,
        y: surface_y - crate::consts::ENEMY_HEIGHT,
        kind,
        patrol_distance: None,
    }
}

fn item(kind: CollectibleKind, x: f32, y: f32) -> CollectibleSpec {
    CollectibleSpec {
        x,
        y,
        kind,
        value: None,
    }
}

fn checkpoint(x: f32, surface_y: f32) -> CheckpointSpec {
    CheckpointSpec {
        x,
        y: surface_y - crate::consts::CHECKPOINT_HEIGHT,
    }
}

fn spawn_on(x: f32, surface_y: f32) -> Vec2 {
    Vec2::new(x, surface_y - crate::consts::PLAYER_HEIGHT)
}

fn goal_on(x: f32, surface_y: f32) -> Vec2 {
    Vec2::new(x, surface_y - crate::consts::GOAL_HEIGHT)
}

/// Hand-authored level data, if `number` has any
pub fn builtin_level(number: u32) -> Option<LevelData> {
    use CollectibleKind::*;
    use EnemyKind::*;

    let data = match number {
        // Meadow: basics, one moving platform
        1 => LevelData {
            width: 3000.0,
            height: 600.0,
            theme: Theme::Meadow,
            spawn: spawn_on(50.0, GROUND_Y),
            goal: goal_on(2880.0, GROUND_Y),
            time_limit_s: Some(120.0),
            platforms: vec![
                ground(0.0, 800.0),
                ground(920.0, 700.0),
                ground(1740.0, 1260.0),
                ledge(400.0, 400.0, 120.0),
                ledge(620.0, 330.0, 120.0),
                moving(1000.0, 380.0, 100.0, MoveAxis::Horizontal, 80.0),
                ledge(1300.0, 360.0, 140.0),
                ledge(2100.0, 400.0, 120.0),
            ],
            enemies: vec![
                enemy(Patroller, 1200.0, GROUND_Y),
                enemy(Patroller, 2000.0, GROUND_Y),
                enemy(Chaser, 2500.0, GROUND_Y),
            ],
            collectibles: vec![
                item(Coin, 450.0, 360.0),
                item(Coin, 670.0, 290.0),
                item(Coin, 1040.0, 340.0),
                item(Coin, 1360.0, 320.0),
                item(Health, 1550.0, 450.0),
                item(Gem, 2150.0, 360.0),
                item(Coin, 2400.0, 450.0),
            ],
            checkpoints: vec![checkpoint(1500.0, GROUND_Y)],
        },

        // Cavern: crumbling bridges
        2 => LevelData {
            width: 3600.0,
            height: 600.0,
            theme: Theme::Cavern,
            spawn: spawn_on(50.0, GROUND_Y),
            goal: goal_on(3480.0, GROUND_Y),
            time_limit_s: Some(150.0),
            platforms: vec![
                ground(0.0, 700.0),
                crumbling(760.0, 440.0, 100.0),
                crumbling(920.0, 420.0, 100.0),
                ground(1080.0, 900.0),
                ledge(1300.0, 380.0, 140.0),
                ledge(1560.0, 300.0, 120.0),
                crumbling(2050.0, 430.0, 90.0),
                crumbling(2200.0, 400.0, 90.0),
                crumbling(2350.0, 430.0, 90.0),
                ground(2500.0, 1100.0),
                moving(2800.0, 360.0, 100.0, MoveAxis::Vertical, 60.0),
            ],
            enemies: vec![
                enemy(Patroller, 400.0, GROUND_Y),
                enemy(Chaser, 1400.0, GROUND_Y),
                enemy(Patroller, 1800.0, GROUND_Y),
                enemy(Chaser, 3000.0, GROUND_Y),
            ],
            collectibles: vec![
                item(Coin, 800.0, 400.0),
                item(Coin, 960.0, 380.0),
                item(Gem, 1610.0, 260.0),
                item(Coin, 2090.0, 390.0),
                item(Coin, 2240.0, 360.0),
                item(Coin, 2390.0, 390.0),
                item(Health, 2840.0, 280.0),
            ],
            checkpoints: vec![checkpoint(1150.0, GROUND_Y), checkpoint(2600.0, GROUND_Y)],
        },

        // Skyline: springs and long gaps
        3 => LevelData {
            width: 4000.0,
            height: 600.0,
            theme: Theme::Skyline,
            spawn: spawn_on(50.0, GROUND_Y),
            goal: goal_on(3880.0, GROUND_Y),
            time_limit_s: Some(180.0),
            platforms: vec![
                ground(0.0, 600.0),
                bouncy(520.0, 480.0, 60.0),
                ledge(700.0, 250.0, 160.0),
                moving(950.0, 300.0, 100.0, MoveAxis::Horizontal, 100.0),
                ground(1250.0, 600.0),
                bouncy(1700.0, 480.0, 60.0),
                ledge(1900.0, 220.0, 200.0),
                crumbling(2200.0, 300.0, 100.0),
                ground(2400.0, 500.0),
                moving(2950.0, 420.0, 100.0, MoveAxis::Horizontal, 60.0),
                ground(3200.0, 800.0),
            ],
            enemies: vec![
                enemy(Chaser, 1500.0, GROUND_Y),
                enemy(Patroller, 1950.0, 220.0),
                enemy(Patroller, 2600.0, GROUND_Y),
                enemy(Chaser, 3500.0, GROUND_Y),
            ],
            collectibles: vec![
                item(Coin, 540.0, 400.0),
                item(Gem, 770.0, 200.0),
                item(Coin, 990.0, 260.0),
                item(Star, 1990.0, 160.0),
                item(Coin, 2240.0, 260.0),
                item(Health, 2650.0, 450.0),
                item(Coin, 2990.0, 380.0),
            ],
            checkpoints: vec![checkpoint(1300.0, GROUND_Y), checkpoint(2450.0, GROUND_Y)],
        },

        // Fortress: chasers and mixed platforms
        4 => LevelData {
            width: 4400.0,
            height: 600.0,
            theme: Theme::Fortress,
            spawn: spawn_on(50.0, GROUND_Y),
            goal: goal_on(4280.0, GROUND_Y),
            time_limit_s: Some(200.0),
            platforms: vec![
                ground(0.0, 900.0),
                ledge(500.0, 380.0, 100.0),
                ledge(700.0, 300.0, 100.0),
                crumbling(960.0, 420.0, 100.0),
                ground(1120.0, 800.0),
                bouncy(1500.0, 480.0, 60.0),
                ledge(1600.0, 250.0, 200.0),
                moving(2050.0, 400.0, 100.0, MoveAxis::Horizontal, 90.0),
                ground(2300.0, 1000.0),
                ledge(2600.0, 380.0, 140.0),
                ledge(2900.0, 320.0, 140.0),
                crumbling(3380.0, 430.0, 90.0),
                crumbling(3540.0, 410.0, 90.0),
                ground(3700.0, 700.0),
            ],
            enemies: vec![
                enemy(Chaser, 600.0, GROUND_Y),
                enemy(Patroller, 1300.0, GROUND_Y),
                enemy(Chaser, 1700.0, 250.0),
                enemy(Chaser, 2500.0, GROUND_Y),
                enemy(Patroller, 3000.0, GROUND_Y),
                enemy(Chaser, 4000.0, GROUND_Y),
            ],
            collectibles: vec![
                item(Coin, 540.0, 340.0),
                item(Coin, 740.0, 260.0),
                item(Gem, 1690.0, 210.0),
                item(Health, 2090.0, 360.0),
                item(Coin, 2660.0, 340.0),
                item(Coin, 2960.0, 280.0),
                item(Gem, 3580.0, 370.0),
            ],
            checkpoints: vec![checkpoint(1200.0, GROUND_Y), checkpoint(2400.0, GROUND_Y)],
        },

        // Meadow finale: everything at once
        5 => LevelData {
            width: 5000.0,
            height: 600.0,
            theme: Theme::Meadow,
            spawn: spawn_on(50.0, GROUND_Y),
            goal: goal_on(4880.0, GROUND_Y),
            time_limit_s: Some(240.0),
            platforms: vec![
                ground(0.0, 700.0),
                moving(780.0, 420.0, 100.0, MoveAxis::Horizontal, 60.0),
                ground(1050.0, 600.0),
                bouncy(1400.0, 480.0, 60.0),
                ledge(1550.0, 230.0, 180.0),
                crumbling(1750.0, 350.0, 90.0),
                crumbling(1900.0, 400.0, 90.0),
                ground(2050.0, 700.0),
                moving(2350.0, 330.0, 100.0, MoveAxis::Vertical, 70.0),
                ledge(2550.0, 300.0, 140.0),
                ground(2900.0, 500.0),
                bouncy(3300.0, 480.0, 60.0),
                ledge(3450.0, 220.0, 200.0),
                moving(3700.0, 380.0, 100.0, MoveAxis::Horizontal, 80.0),
                ground(3950.0, 1050.0),
            ],
            enemies: vec![
                enemy(Patroller, 400.0, GROUND_Y),
                enemy(Chaser, 1200.0, GROUND_Y),
                enemy(Patroller, 1600.0, 230.0),
                enemy(Chaser, 2300.0, GROUND_Y),
                enemy(Chaser, 3100.0, GROUND_Y),
                enemy(Patroller, 3500.0, 220.0),
                enemy(Chaser, 4300.0, GROUND_Y),
                enemy(Chaser, 4600.0, GROUND_Y),
            ],
            collectibles: vec![
                item(Coin, 820.0, 380.0),
                item(Gem, 1630.0, 190.0),
                item(Coin, 1780.0, 310.0),
                item(Coin, 1930.0, 360.0),
                item(Health, 2600.0, 260.0),
                item(Star, 3540.0, 180.0),
                item(Coin, 3740.0, 340.0),
                item(Health, 4100.0, 450.0),
            ],
            checkpoints: vec![
                checkpoint(1100.0, GROUND_Y),
                checkpoint(2100.0, GROUND_Y),
                checkpoint(3000.0, GROUND_Y),
                checkpoint(4000.0, GROUND_Y),
            ],
        },

        _ => return None,
    };
    Some(data)
}

/// Procedurally generate a level
///
/// Ground runs separated by jumpable gaps, a row of floating platforms with
/// mixed behaviors, enemies on the wider runs, collectibles above the
/// platforms, and a checkpoint roughly every 1200px. Width, gap size and
/// enemy aggression scale with the level number.
pub fn generate_level<R: Rng>(number: u32, rng: &mut R) -> LevelData {
    let tier = number.saturating_sub(BUILTIN_LEVEL_COUNT) as f32;
    let width = (3000.0 + tier * 400.0).min(8000.0);
    let max_gap = (120.0 + number as f32 * 5.0).min(MAX_GAP);
    let chaser_chance = (0.2 + number as f64 * 0.05).min(0.6);
    let theme = Theme::ALL[(number.saturating_sub(1) as usize) % Theme::ALL.len()];

    let mut platforms = Vec::new();
    let mut enemies = Vec::new();
    let mut collectibles = Vec::new();

    // Ground runs; the first is long enough to spawn on safely
    let mut runs: Vec<(f32, f32)> = Vec::new();
    let mut x = 0.0;
    loop {
        let len = if runs.is_empty() {
            700.0
        } else {
            rng.random_range(400.0..=900.0)
        };
        let remaining = width - x;
        if remaining <= len + 400.0 {
            runs.push((x, remaining));
            break;
        }
        runs.push((x, len));
        x += len + rng.random_range(80.0..=max_gap);
    }

    for (i, &(run_x, run_len)) in runs.iter().enumerate() {
        platforms.push(ground(run_x, run_len));
        if i > 0 && run_len >= 500.0 {
            let kind = if rng.random_bool(chaser_chance) {
                EnemyKind::Chaser
            } else {
                EnemyKind::Patroller
            };
            let mut spec = enemy(kind, run_x + run_len / 2.0, GROUND_Y);
            spec.patrol_distance = Some((run_len / 2.0 - 40.0).min(150.0));
            enemies.push(spec);
        }
    }

    // Floating platforms with an item above each
    let mut px = 300.0;
    let mut count = 0u32;
    while px < width - 500.0 {
        let y = rng.random_range(300.0..=400.0);
        let w = rng.random_range(80.0..=140.0);
        let roll: f32 = rng.random();
        let spec = if roll < 0.5 {
            ledge(px, y, w)
        } else if roll < 0.7 {
            moving(px, y, w, MoveAxis::Horizontal, 60.0)
        } else if roll < 0.85 {
            crumbling(px, y, w)
        } else {
            bouncy(px, y, w)
        };
        platforms.push(spec);

        count += 1;
        let kind = if rng.random_bool(0.05) {
            CollectibleKind::Star
        } else if count % 5 == 0 {
            CollectibleKind::Health
        } else if count % 4 == 0 {
            CollectibleKind::Gem
        } else {
            CollectibleKind::Coin
        };
        collectibles.push(item(kind, px + w / 2.0 - 10.0, y - 40.0));

        px += rng.random_range(250.0..=400.0);
    }

    // Checkpoints land on ground, never over a gap
    let mut checkpoints = Vec::new();
    let mut target = CHECKPOINT_SPACING;
    while target < width - 400.0 {
        let cp_width = crate::consts::CHECKPOINT_WIDTH;
        let placed = runs
            .iter()
            .find(|&&(rx, rl)| rx <= target && target + cp_width <= rx + rl)
            .map(|_| target)
            .or_else(|| {
                runs.iter()
                    .find(|&&(rx, rl)| rx >= target && rl >= cp_width + 20.0)
                    .map(|&(rx, _)| rx + 20.0)
            });
        if let Some(cx) = placed {
            if cx < width - 400.0 {
                checkpoints.push(checkpoint(cx, GROUND_Y));
            }
        }
        target += CHECKPOINT_SPACING;
    }

    let time_limit_s = (width / 20.0).round() as f64;

    log::info!(
        "Generated level {}: {:?}, width {}, {} runs, {} platforms, {} enemies, {} checkpoints",
        number,
        theme,
        width,
        runs.len(),
        platforms.len(),
        enemies.len(),
        checkpoints.len()
    );

    LevelData {
        width,
        height: 600.0,
        theme,
        spawn: spawn_on(50.0, GROUND_Y),
        goal: goal_on(width - 120.0, GROUND_Y),
        time_limit_s: Some(time_limit_s),
        platforms,
        enemies,
        collectibles,
        checkpoints,
    }
}

/// Built-in levels, generated past the last authored one
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLevels;

impl LevelSource for BuiltinLevels {
    fn level_data(&mut self, number: u32, rng: &mut Pcg32) -> Result<LevelData, InitError> {
        let data = match builtin_level(number) {
            Some(data) => data,
            None => generate_level(number, rng),
        };
        data.validate(number)?;
        Ok(data)
    }
}
