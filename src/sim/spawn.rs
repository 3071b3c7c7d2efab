//! Timed entity spawning
//!
//! Each spawner owns an accumulator advanced by the frame delta; it fires
//! once per elapsed interval of simulated time. Nothing here looks at the
//! wall clock.

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EntityKind, GameState};
use crate::consts::*;
use crate::settings::{DifficultyPolicy, Theme};

/// Fires every `interval` seconds of simulated time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub kind: EntityKind,
    /// Seconds between spawns
    pub interval: f32,
    accumulator: f32,
}

impl Spawner {
    pub fn new(kind: EntityKind, interval: f32) -> Self {
        Self {
            kind,
            interval,
            accumulator: 0.0,
        }
    }

    /// Add `dt` seconds and return how many spawns are due
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.interval <= 0.0 {
            return 0;
        }
        self.accumulator += dt.max(0.0);
        let mut due = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            due += 1;
        }
        due
    }

    /// Seconds accumulated toward the next spawn
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }
}

/// Spawn table for a theme
pub fn spawners_for(theme: Theme) -> Vec<Spawner> {
    let mut spawners = vec![
        Spawner::new(EntityKind::Enemy, 0.5),
        Spawner::new(EntityKind::Coin, 5.0),
        Spawner::new(EntityKind::Heart, 15.0),
    ];
    match theme {
        Theme::Day => spawners.push(Spawner::new(EntityKind::Cloud, 1.5)),
        Theme::Night => {
            spawners.push(Spawner::new(EntityKind::Star, 0.8));
            spawners.push(Spawner::new(EntityKind::Moon, 40.0));
        }
    }
    spawners
}

/// Horizontal speed range (px/tick) for entities spawned off the right edge
pub fn velocity_range(kind: EntityKind) -> RangeInclusive<i32> {
    match kind {
        EntityKind::Enemy => -13..=-5,
        EntityKind::Cloud | EntityKind::Coin | EntityKind::Heart => -5..=-2,
        EntityKind::Star => -3..=-1,
        EntityKind::Moon => -1..=-1,
        // Projectiles and explosions are never spawned off-screen
        EntityKind::Projectile | EntityKind::ExplosionFrame => 0..=0,
    }
}

/// Extra enemies that accompany a coin spawn under the escalating policy
///
/// `floor((score + elapsed^0.7) / 10 / 0.5)`
pub fn escalation_extra(score: u64, elapsed: f32) -> u32 {
    let pressure = (score as f32 + elapsed.max(0.0).powf(0.7)) / 10.0 / 0.5;
    pressure.floor() as u32
}

/// Random horizontal velocity for `kind`
fn random_velocity(rng: &mut impl Rng, kind: EntityKind) -> Vec2 {
    Vec2::new(rng.random_range(velocity_range(kind)) as f32, 0.0)
}

/// Spawn one entity just past the right edge at a random height
pub fn spawn_offscreen(state: &mut GameState, kind: EntityKind) -> u32 {
    let size = kind.size();
    let max_left = SCREEN_WIDTH as i32 + SPAWN_X_JITTER;
    let left = state.rng.random_range(SCREEN_WIDTH as i32..=max_left) as f32;
    let half_h = size.y / 2.0;
    let y = state.rng.random_range(half_h..=SCREEN_HEIGHT - half_h);
    let vel = random_velocity(&mut state.rng, kind);
    state.spawn(kind, Vec2::new(left + size.x / 2.0, y), vel)
}

/// Spawn an entity at a fixed position with its kind's random velocity
pub fn spawn_at(state: &mut GameState, kind: EntityKind, pos: Vec2) -> u32 {
    let vel = random_velocity(&mut state.rng, kind);
    state.spawn(kind, pos, vel)
}

/// Advance every spawner by `dt` and create whatever came due
pub fn run_spawners(state: &mut GameState, dt: f32) {
    let mut due: Vec<(EntityKind, u32)> = Vec::new();
    for spawner in &mut state.spawners {
        let count = spawner.advance(dt);
        if count > 0 {
            due.push((spawner.kind, count));
        }
    }

    for (kind, count) in due {
        for _ in 0..count {
            spawn_offscreen(state, kind);

            if kind == EntityKind::Coin && state.policy == DifficultyPolicy::Escalating {
                let extra = escalation_extra(state.score, state.elapsed);
                if extra > 0 {
                    log::debug!("Escalation: {} extra enemies with coin", extra);
                }
                for _ in 0..extra {
                    spawn_offscreen(state, EntityKind::Enemy);
                }
            }
        }
    }
}
