//! Ridgeway headless runner
//!
//! Plays a scripted session natively and logs what happened. Useful as a
//! smoke test of the full frame pipeline; set `RUST_LOG=debug` for
//! entity-level detail. An optional first argument is a tuning JSON file.

use ridgeway::audio::LogAudio;
use ridgeway::input::{Action, ActionSet};
use ridgeway::sim::{GameEvent, GamePhase};
use ridgeway::{Game, InitError, Settings, Tuning};

/// Ten simulated minutes at 60 fps
const MAX_FRAMES: u32 = 36_000;
const FRAME_MS: f64 = ridgeway::consts::NOMINAL_FRAME_MS;

fn main() {
    env_logger::init();
    log::info!("Ridgeway (headless) starting...");

    let game = match load_tuning().and_then(|tuning| {
        Game::new(tuning, Settings::default(), Box::new(LogAudio))
    }) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Initialization failed: {e}");
            std::process::exit(1);
        }
    };

    run(game);
}

fn load_tuning() -> Result<Tuning, InitError> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).map_err(|e| {
                InitError::InvalidTuning(format!("cannot read {path}: {e}"))
            })?;
            Ok(Tuning::from_json(&json)?)
        }
        None => Ok(Tuning::default()),
    }
}

/// Scripted input: run right, hop every so often, confirm through menus
fn script(frame: u32, phase: GamePhase) -> ActionSet {
    match phase {
        GamePhase::Menu | GamePhase::LevelComplete if frame % 20 == 0 => {
            ActionSet::EMPTY.with(Action::Confirm)
        }
        GamePhase::Playing => {
            let mut held = ActionSet::EMPTY.with(Action::Right);
            // Short tap, then a second tap mid-air for the double jump
            if matches!(frame % 45, 0..=2 | 14..=16) {
                held.insert(Action::Jump);
            }
            held
        }
        _ => ActionSet::EMPTY,
    }
}

fn run(mut game: Game) {
    let mut now = 0.0;
    let mut kills = 0u32;
    let mut items = 0u32;
    let mut deaths = 0u32;
    let mut levels_cleared = 0u32;

    for frame in 0..MAX_FRAMES {
        now += FRAME_MS;
        let held = script(frame, game.phase());
        for event in game.frame(now, held) {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::Collected { .. } => items += 1,
                GameEvent::PlayerDied { .. } => deaths += 1,
                GameEvent::LevelCompleted { .. } => levels_cleared += 1,
                _ => {}
            }
        }
        if game.phase() == GamePhase::GameOver {
            break;
        }
    }

    let state = game.state();
    log::info!(
        "Session over after {:.1}s simulated: phase {:?}, level {}, score {}",
        state.time_ms / 1000.0,
        state.phase,
        state.level_number,
        state.score
    );
    log::info!(
        "Levels cleared {levels_cleared}, enemies stomped {kills}, items {items}, deaths {deaths}"
    );
}
