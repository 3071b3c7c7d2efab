//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, velocities in pixels per tick
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering, audio or platform dependencies

pub mod aabb;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::resolve_collisions;
pub use spawn::{Spawner, escalation_extra, spawners_for};
pub use state::{Entity, EntityKind, GameEvent, GamePhase, GameState, Hud, Player};
pub use tick::{TickInput, tick};
