//! Per-frame simulation tick
//!
//! Order of operations: player input, spawners, movement and despawn,
//! collisions, then clamping the player back on screen.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::spawn::run_spawners;
use super::state::{EntityKind, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired direction, each axis in [-1, 1]
    pub movement: Vec2,
    /// Fire a projectile (one-shot)
    pub fire: bool,
    /// Idle/demo mode - autopilot flies the ship
    pub idle_mode: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.time_ticks += 1;
    state.elapsed += dt;

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.player.vel = input.movement.clamp(Vec2::NEG_ONE, Vec2::ONE) * PLAYER_SPEED;

    if state.fire_cooldown > 0 {
        state.fire_cooldown -= 1;
    }
    if input.fire && state.fire_cooldown == 0 {
        fire_projectile(state);
    }

    run_spawners(state, dt);
    advance_entities(state);

    resolve_collisions(state);
    state.player.clamp_to_screen();
}

/// Launch a projectile from the ship's nose
pub fn fire_projectile(state: &mut GameState) {
    let player = state.player.aabb();
    let size = EntityKind::Projectile.size();
    let pos = Vec2::new(player.right() + size.x / 2.0, player.center.y);
    state.spawn(EntityKind::Projectile, pos, Vec2::new(PROJECTILE_SPEED, 0.0));
    state.fire_cooldown = FIRE_COOLDOWN_TICKS;
    state.push_event(GameEvent::ProjectileFired);
}

/// Move the player and every entity by one tick of velocity, then drop
/// entities that left the screen or finished animating
pub fn advance_entities(state: &mut GameState) {
    state.player.pos += state.player.vel;

    for list in state.collections_mut() {
        for entity in list.iter_mut() {
            entity.advance();
        }
        list.retain(|e| !e.is_offscreen() && !e.is_expired());
    }
}

/// How far ahead the autopilot looks for threats
const LOOKAHEAD: f32 = 320.0;

/// Demo-mode steering: dodge enemies in the lane, chase pickups, shoot
fn autopilot(state: &GameState, input: &mut TickInput) {
    let ship = state.player.aabb();
    let margin = 12.0;

    // Enemies ahead whose vertical span overlaps the ship's lane
    let threat = state
        .enemies
        .iter()
        .filter(|e| {
            let b = e.aabb();
            b.right() > ship.left()
                && b.bottom() < ship.top() + margin
                && b.top() > ship.bottom() - margin
        })
        .min_by(|a, b| {
            a.pos
                .x
                .partial_cmp(&b.pos.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    input.fire = threat.is_some();

    if let Some(enemy) = threat.filter(|e| e.aabb().left() - ship.right() < LOOKAHEAD) {
        // Move away from the enemy's center, unless pinned against an edge
        let mut dir = if enemy.pos.y > ship.center.y { -1.0 } else { 1.0 };
        if dir < 0.0 && ship.bottom() <= PLAYER_SPEED {
            dir = 1.0;
        } else if dir > 0.0 && ship.top() >= SCREEN_HEIGHT - PLAYER_SPEED {
            dir = -1.0;
        }
        input.movement = Vec2::new(0.0, dir);
        return;
    }

    // Go grab the nearest pickup
    let pickup = state
        .coins
        .iter()
        .chain(state.hearts.iter())
        .filter(|p| p.pos.x > ship.left())
        .min_by(|a, b| {
            a.pos
                .distance_squared(ship.center)
                .partial_cmp(&b.pos.distance_squared(ship.center))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target = match pickup {
        Some(p) => Vec2::new(p.pos.x.min(SCREEN_WIDTH / 3.0), p.pos.y),
        None => Vec2::new(ship.center.x, SCREEN_HEIGHT / 2.0),
    };
    let delta = target - ship.center;
    input.movement = Vec2::new(steer(delta.x), steer(delta.y));
}

/// -1, 0 or 1 with a small dead band to avoid jitter
fn steer(delta: f32) -> f32 {
    if delta.abs() < PLAYER_SPEED {
        0.0
    } else {
        delta.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{DifficultyPolicy, Theme};
    use proptest::prelude::*;

    fn new_state() -> GameState {
        let mut state = GameState::new(12345, Theme::Day, DifficultyPolicy::Fixed);
        // Tests that don't want spawns start with an empty table
        state.spawners.clear();
        state
    }

    #[test]
    fn test_tick_moves_entities() {
        let mut state = new_state();
        state.spawn(EntityKind::Cloud, Vec2::new(500.0, 500.0), Vec2::new(-3.0, 1.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.clouds[0].pos, Vec2::new(497.0, 501.0));
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_removed_only_after_right_edge_passes_zero() {
        let mut state = new_state();
        // Enemy is 50 wide: right edge starts at 10
        state.spawn(EntityKind::Enemy, Vec2::new(-15.0, 580.0), Vec2::new(-5.0, 0.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        // Right edge now exactly 5
        assert_eq!(state.enemies.len(), 1);
        tick(&mut state, &TickInput::default(), SIM_DT);
        // Right edge 0.0, not yet past
        assert_eq!(state.enemies.len(), 1);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_paused_freezes_everything() {
        let mut state = GameState::new(5, Theme::Day, DifficultyPolicy::Fixed);
        state.spawn(EntityKind::Coin, Vec2::new(600.0, 100.0), Vec2::new(-2.0, 0.0));
        state.toggle_pause();

        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.entity_count(), 1);
        assert_eq!(state.coins[0].pos, Vec2::new(600.0, 100.0));
        assert!(state.spawners.iter().all(|s| s.accumulated() == 0.0));
    }

    #[test]
    fn test_spawners_run_while_playing() {
        let mut state = GameState::new(5, Theme::Day, DifficultyPolicy::Fixed);
        // 0.5 s at 60 Hz
        for _ in 0..31 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(!state.enemies.is_empty());
    }

    #[test]
    fn test_player_movement_and_clamp() {
        let mut state = new_state();
        let start = state.player.pos;
        let input = TickInput {
            movement: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.player.pos, start + Vec2::new(0.0, PLAYER_SPEED));

        // Run into the left edge
        let input = TickInput {
            movement: Vec2::new(-1.0, 0.0),
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.player.aabb().left(), 0.0);

        // Out-of-range movement is clamped to full speed
        let input = TickInput {
            movement: Vec2::new(0.0, -4.0),
            ..Default::default()
        };
        let y = state.player.pos.y;
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.player.pos.y, y - PLAYER_SPEED);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = new_state();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].vel, Vec2::new(PROJECTILE_SPEED, 0.0));

        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.projectiles.len(), 1);

        for _ in 0..FIRE_COOLDOWN_TICKS {
            tick(&mut state, &fire, SIM_DT);
        }
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_collision_scenario_health_one() {
        let mut state = new_state();
        state.player.health = 1;
        state.score = 17;
        let pos = state.player.pos + Vec2::new(40.0, 0.0);
        state.spawn(EntityKind::Enemy, pos, Vec2::new(-10.0, 0.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 17);

        // Terminal: further ticks do nothing
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_projectile_kill_through_tick() {
        let mut state = new_state();
        let ahead = state.player.pos + Vec2::new(120.0, 0.0);
        state.spawn(EntityKind::Enemy, ahead, Vec2::ZERO);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.kills, 1);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Theme::Night, DifficultyPolicy::Escalating);
        let mut state2 = GameState::new(99999, Theme::Night, DifficultyPolicy::Escalating);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..900 {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.enemies, state2.enemies);
        assert_eq!(state1.player, state2.player);
    }

    #[test]
    fn test_idle_mode_keeps_invariants() {
        let mut state = GameState::new(2024, Theme::Day, DifficultyPolicy::Escalating);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut last_score = 0;
        let mut last_kills = 0;
        for _ in 0..3600 {
            tick(&mut state, &input, SIM_DT);
            assert!(state.player.health <= MAX_HEALTH);
            assert!(state.score >= last_score);
            assert!(state.kills >= last_kills);
            let ship = state.player.aabb();
            assert!(ship.left() >= 0.0 && ship.right() <= SCREEN_WIDTH);
            assert!(ship.bottom() >= 0.0 && ship.top() <= SCREEN_HEIGHT);
            last_score = state.score;
            last_kills = state.kills;
        }
    }

    proptest! {
        #[test]
        fn prop_constant_velocity_is_linear(
            x in 100.0f32..700.0,
            y in 100.0f32..500.0,
            vx in -3i32..=3,
            vy in -3i32..=3,
            n in 0u32..20,
        ) {
            let mut state = new_state();
            let start = Vec2::new(x, y);
            let vel = Vec2::new(vx as f32, vy as f32);
            state.spawn(EntityKind::Star, start, vel);

            for _ in 0..n {
                tick(&mut state, &TickInput::default(), SIM_DT);
            }
            let expected = start + vel * n as f32;
            prop_assert!((state.stars[0].pos - expected).length() < 1e-3);
        }

        #[test]
        fn prop_health_stays_in_bounds(
            health in 0u8..=4,
            enemies in 0usize..4,
            hearts in 0usize..6,
        ) {
            let mut state = new_state();
            state.player.health = health.max(1);
            let pos = state.player.pos;
            for _ in 0..enemies {
                state.spawn(EntityKind::Enemy, pos, Vec2::ZERO);
            }
            for _ in 0..hearts {
                state.spawn(EntityKind::Heart, pos, Vec2::ZERO);
            }
            tick(&mut state, &TickInput::default(), SIM_DT);
            prop_assert!(state.player.health <= MAX_HEALTH);
            if state.player.health == 0 {
                prop_assert_eq!(state.phase, GamePhase::GameOver);
            }
        }
    }
}
