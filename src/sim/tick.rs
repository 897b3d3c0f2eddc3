//! Per-frame simulation tick
//!
//! Drives the phase machine and, while playing, runs one frame in a fixed
//! order: player, level, background, interactions, win/lose rules, camera.

use super::camera::CameraTarget;
use super::collectible::CollectEffect;
use super::player::{JumpKind, PlayerInput};
use super::state::{CompletionBonus, GameEvent, GamePhase, GameState};
use crate::input::{Action, InputSource};

/// Camera shake applied when the player is hit
const HIT_SHAKE_INTENSITY: f32 = 8.0;
const HIT_SHAKE_MS: f64 = 300.0;
const HIT_FLASH_MS: f64 = 150.0;
const COMPLETE_FLASH_MS: f64 = 400.0;

/// Advance the game by one frame of `dt_ms` milliseconds
///
/// `dt_ms` is expected to be clamped by the caller. Events for this frame
/// replace the previous frame's in `state.events`.
pub fn tick(state: &mut GameState, input: &dyn InputSource, dt_ms: f64) {
    state.events.clear();

    match state.phase {
        GamePhase::Loading => {}
        GamePhase::Menu => {
            if input.is_just_pressed(Action::Confirm) {
                state.start_game();
            }
        }
        GamePhase::Paused => {
            if input.is_just_pressed(Action::Pause) {
                state.set_phase(GamePhase::Playing);
            } else if input.is_just_pressed(Action::Restart) {
                state.restart_level();
            }
        }
        GamePhase::GameOver => {
            if input.is_just_pressed(Action::Confirm) {
                state.set_phase(GamePhase::Menu);
            }
        }
        GamePhase::LevelComplete => {
            if input.is_just_pressed(Action::Confirm) {
                state.next_level();
            } else if input.is_just_pressed(Action::Pause) {
                state.set_phase(GamePhase::Menu);
            }
        }
        GamePhase::Playing => {
            if input.is_just_pressed(Action::Pause) {
                state.set_phase(GamePhase::Paused);
            } else if input.is_just_pressed(Action::Restart) {
                state.restart_level();
            } else {
                step_playing(state, input, dt_ms);
            }
        }
    }
}

fn step_playing(state: &mut GameState, input: &dyn InputSource, dt_ms: f64) {
    state.time_ms += dt_ms;
    state.frames += 1;
    let now = state.time_ms;

    // Player
    state.player.set_input(PlayerInput::from_source(input));
    let step = state
        .player
        .update(&state.level.platforms, state.level.bounds(), now);
    match step.jump {
        Some(JumpKind::Ground) => state.events.push(GameEvent::Jumped),
        Some(JumpKind::Double) => state.events.push(GameEvent::DoubleJumped),
        None => {}
    }

    // Level: platforms, enemies, collectibles, checkpoints
    state.level.update(
        dt_ms,
        now,
        &mut state.player,
        step.collision.landed_on,
        &mut state.rng,
        &mut state.events,
    );

    state.background.update(state.camera.pos, dt_ms);

    resolve_enemy_contacts(state, now);
    collect_items(state);

    // Win/lose rules
    if state.player.is_dead() {
        handle_death(state, now);
    } else if state.level.check_completion(&state.player.body.rect()) {
        complete_level(state);
    } else if state.level.is_time_up() {
        log::info!("Time up on level {}", state.level_number);
        end_game(state);
    }

    let target = CameraTarget {
        center: state.focus(),
        velocity: state.player.body.vel,
    };
    state.camera.update(Some(target), dt_ms, &mut state.rng);
}

/// Stomp from above kills; any other touch hurts the player
fn resolve_enemy_contacts(state: &mut GameState, now: f64) {
    let stomp_tolerance = state.tuning.enemy.stomp_tolerance;
    let stomp_bounce = state.tuning.enemy.stomp_bounce;

    for enemy in state.level.enemies.iter_mut().filter(|e| e.is_alive()) {
        let player_rect = state.player.body.rect();
        let enemy_rect = enemy.rect();
        if !player_rect.overlaps(&enemy_rect) {
            continue;
        }

        let falling = state.player.body.vel.y > 0.0;
        if falling && player_rect.bottom() <= enemy_rect.top() + stomp_tolerance {
            enemy.kill();
            state.player.bounce(stomp_bounce);
            let points = enemy.points();
            state.score += points;
            state.events.push(GameEvent::EnemyKilled { points });
        } else if state.player.take_damage(enemy.damage, now) {
            state.events.push(GameEvent::PlayerHurt {
                damage: enemy.damage,
                health: state.player.health,
            });
            if state.settings.effective_screen_shake() {
                state.camera.shake(HIT_SHAKE_INTENSITY, HIT_SHAKE_MS);
            }
            if state.settings.effective_flash() {
                state.camera.flash(HIT_FLASH_MS);
            }
        }
    }
}

fn collect_items(state: &mut GameState) {
    let player_rect = state.player.body.rect();
    for item in &mut state.level.collectibles {
        let Some(collection) = item.check_player_collision(&player_rect) else {
            continue;
        };
        match collection.effect {
            CollectEffect::Score => state.score += u64::from(collection.value),
            CollectEffect::Health => state.player.heal(collection.value),
            CollectEffect::Special => {
                state.score += u64::from(collection.value);
                if state.lives < state.tuning.rules.max_lives {
                    state.lives += 1;
                    state.events.push(GameEvent::ExtraLife { lives: state.lives });
                }
            }
        }
        state.events.push(GameEvent::Collected {
            kind: collection.kind,
            value: collection.value,
        });
    }
}

fn handle_death(state: &mut GameState, now: f64) {
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::PlayerDied {
        lives_left: state.lives,
    });
    if state.lives == 0 {
        end_game(state);
        return;
    }
    state.player.respawn(now);
    state.camera.snap_to(state.player.body.center());
    state.events.push(GameEvent::Respawned);
    log::info!("Respawned with {} lives left", state.lives);
}

fn end_game(state: &mut GameState) {
    state.events.push(GameEvent::GameOver { score: state.score });
    state.set_phase(GamePhase::GameOver);
}

/// Award the time and health bonus exactly once
fn complete_level(state: &mut GameState) {
    let time_bonus = match (state.level.time_remaining_ms(), state.level.time_limit_ms) {
        (Some(remaining), Some(limit)) if limit > 0.0 => {
            (remaining / limit * state.tuning.rules.time_bonus_max).floor() as u64
        }
        _ => 0,
    };
    let bonus = CompletionBonus {
        time_bonus,
        health_bonus: u64::from(state.player.health),
    };
    state.score += bonus.total();
    state.last_bonus = Some(bonus);
    state.events.push(GameEvent::LevelCompleted {
        number: state.level_number,
        time_bonus: bonus.time_bonus,
        health_bonus: bonus.health_bonus,
    });
    log::info!(
        "Level {} complete: time bonus {}, health bonus {}, score {}",
        state.level_number,
        bonus.time_bonus,
        bonus.health_bonus,
        state.score
    );
    if state.settings.effective_flash() {
        state.camera.flash(COMPLETE_FLASH_MS);
    }
    state.set_phase(GamePhase::LevelComplete);
}
