//! Property tests for the simulation invariants

use glam::Vec2;
use proptest::prelude::*;

use ridgeway::sim::collision::{Body, MotionLimits, resolve_collisions};
use ridgeway::sim::{
    Collectible, CollectibleKind, Enemy, EnemyKind, EnemyState, Player, Rect,
};
use ridgeway::tuning::{CollectibleTuning, EnemyTuning, PlayerTuning};

fn limits() -> MotionLimits {
    let t = PlayerTuning::default();
    MotionLimits {
        gravity: t.gravity,
        max_up_speed: t.max_up_speed,
        max_fall_speed: t.max_fall_speed,
        max_speed: t.max_speed,
    }
}

proptest! {
    #[test]
    fn health_stays_in_bounds(
        ops in proptest::collection::vec((any::<bool>(), 0u32..250, 0.0f64..1500.0), 1..60)
    ) {
        let mut player = Player::new(Vec2::ZERO, PlayerTuning::default());
        let mut now = 0.0;
        for (damage, amount, advance) in ops {
            now += advance;
            if damage {
                player.take_damage(amount, now);
            } else {
                player.heal(amount);
            }
            prop_assert!(player.health <= player.max_health);
        }
    }

    #[test]
    fn damage_is_ignored_while_invulnerable(
        first in 1u32..99,
        second in 0u32..500,
        wait in 0.0f64..999.0
    ) {
        let mut player = Player::new(Vec2::ZERO, PlayerTuning::default());
        prop_assert!(player.take_damage(first, 0.0));
        let health = player.health;
        prop_assert!(player.invulnerable);
        prop_assert!(!player.take_damage(second, wait));
        prop_assert_eq!(player.health, health);
    }

    #[test]
    fn resolved_body_never_overlaps_platform(
        x in -100.0f32..300.0,
        y in 0.0f32..200.0,
        vx in -6.0f32..6.0,
        vy in -15.0f32..15.0
    ) {
        let platform = [Rect::new(0.0, 100.0, 200.0, 20.0)];
        let mut body = Body::new(Vec2::new(x, y), Vec2::new(32.0, 48.0));
        body.vel = Vec2::new(vx, vy);
        body.apply_gravity(&limits());
        let prev = body.pos;
        body.integrate();
        resolve_collisions(&mut body, prev, &platform);
        prop_assert!(
            !body.rect().overlaps(&platform[0]),
            "body {:?} overlaps {:?}",
            body.rect(),
            platform[0]
        );
    }

    #[test]
    fn resting_body_is_a_fixed_point(x in 0.0f32..168.0, frames in 1usize..120) {
        let platform = [Rect::new(0.0, 100.0, 200.0, 20.0)];
        let mut body = Body::new(Vec2::new(x, 52.0), Vec2::new(32.0, 48.0));
        for _ in 0..frames {
            body.apply_gravity(&limits());
            let prev = body.pos;
            body.integrate();
            resolve_collisions(&mut body, prev, &platform);
            prop_assert_eq!(body.pos, Vec2::new(x, 52.0));
            prop_assert!(body.grounded);
        }
    }

    #[test]
    fn chase_holds_inside_hysteresis_band(
        offsets in proptest::collection::vec(151.0f32..224.0, 1..40)
    ) {
        let floor = [Rect::new(-5000.0, 132.0, 10000.0, 40.0)];
        let mut enemy = Enemy::new(EnemyKind::Chaser, Vec2::new(0.0, 100.0), EnemyTuning::default());
        let target = enemy.body.center() + Vec2::new(100.0, 0.0);
        enemy.update(&floor, Some(target), 0.0, 16.0);
        prop_assert_eq!(enemy.state, EnemyState::Chase);

        let mut now = 16.0;
        for d in offsets {
            let target = enemy.body.center() + Vec2::new(d, 0.0);
            enemy.update(&floor, Some(target), now, 16.0);
            prop_assert_eq!(enemy.state, EnemyState::Chase);
            now += 16.0;
        }
    }

    #[test]
    fn collectible_reports_once(
        dx in -15.0f32..15.0,
        dy in -15.0f32..15.0,
        repeats in 1usize..20
    ) {
        let mut item = Collectible::new(
            CollectibleKind::Gem,
            Vec2::new(100.0, 100.0),
            CollectibleTuning::default(),
        );
        let player = Rect::new(100.0 + dx, 100.0 + dy, 32.0, 48.0);
        prop_assert!(item.check_player_collision(&player).is_some());
        for _ in 0..repeats {
            item.update(16.0, Some(player.center()));
            prop_assert!(item.check_player_collision(&player).is_none());
        }
        prop_assert!(item.collected);
    }
}
