//! Game state and core simulation types
//!
//! Everything the update tick mutates lives here. Entities are a single
//! tagged record; each kind has its own collection on `GameState` and
//! `GameState::insert` is the only way an entity enters one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::spawn::{Spawner, spawners_for};
use crate::consts::*;
use crate::settings::{DifficultyPolicy, Theme};

/// Current phase of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen
    Paused,
    /// Health exhausted, run ended
    GameOver,
}

/// Entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Enemy,
    Cloud,
    Coin,
    Heart,
    Projectile,
    Star,
    Moon,
    ExplosionFrame,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Enemy,
        EntityKind::Cloud,
        EntityKind::Coin,
        EntityKind::Heart,
        EntityKind::Projectile,
        EntityKind::Star,
        EntityKind::Moon,
        EntityKind::ExplosionFrame,
    ];

    /// Bounding box size in pixels
    pub fn size(&self) -> Vec2 {
        match self {
            EntityKind::Enemy => Vec2::new(50.0, 30.0),
            EntityKind::Cloud => Vec2::new(100.0, 50.0),
            EntityKind::Coin => Vec2::new(20.0, 20.0),
            EntityKind::Heart => Vec2::new(24.0, 24.0),
            EntityKind::Projectile => Vec2::new(16.0, 6.0),
            EntityKind::Star => Vec2::new(6.0, 6.0),
            EntityKind::Moon => Vec2::new(60.0, 60.0),
            EntityKind::ExplosionFrame => Vec2::new(48.0, 48.0),
        }
    }
}

/// A moving, position-tracked game object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Center of the bounding box
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub size: Vec2,
    /// Ticks since creation
    #[serde(default)]
    pub age_ticks: u32,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            size: kind.size(),
            age_ticks: 0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Move by one tick of velocity
    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.age_ticks += 1;
    }

    /// Fully past the left edge, or far past the right edge
    pub fn is_offscreen(&self) -> bool {
        let aabb = self.aabb();
        aabb.right() < 0.0 || aabb.left() > SCREEN_WIDTH + OFFSCREEN_RIGHT_MARGIN
    }

    /// Explosion animation finished (other kinds never expire)
    pub fn is_expired(&self) -> bool {
        self.kind == EntityKind::ExplosionFrame
            && self.age_ticks >= EXPLOSION_FRAMES * EXPLOSION_TICKS_PER_FRAME
    }

    /// Current animation frame for explosions
    pub fn explosion_frame(&self) -> u32 {
        (self.age_ticks / EXPLOSION_TICKS_PER_FRAME).min(EXPLOSION_FRAMES - 1)
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: u8,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X + PLAYER_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            health: START_HEALTH,
        }
    }
}

impl Player {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Lose one health point. Returns true once health is exhausted.
    pub fn take_hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    /// Gain one health point, capped at `MAX_HEALTH`
    pub fn heal(&mut self) {
        self.health = (self.health + 1).min(MAX_HEALTH);
    }

    /// Keep the whole ship on screen
    pub fn clamp_to_screen(&mut self) {
        self.pos = self.aabb().clamped_center(SCREEN_WIDTH, SCREEN_HEIGHT);
    }
}

/// Things that happened during a tick, drained by the session controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ProjectileFired,
    /// Enemy shot down by a projectile
    EnemyDestroyed { pos: Vec2, kills: u32 },
    /// Enemy rammed the player
    PlayerHit { health: u8 },
    CoinCollected { score: u64 },
    HeartCollected { health: u8 },
    BonusHeartSpawned { kills: u32 },
    Paused,
    Resumed,
    GameOver { score: u64 },
}

/// Scalar values for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub health: u8,
    pub kills: u32,
    /// Seconds of unpaused play
    pub elapsed: f32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub theme: Theme,
    pub policy: DifficultyPolicy,
    pub phase: GamePhase,
    pub score: u64,
    /// Enemies destroyed by projectiles
    pub kills: u32,
    /// Seconds of simulated (unpaused) time
    pub elapsed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub enemies: Vec<Entity>,
    pub clouds: Vec<Entity>,
    pub coins: Vec<Entity>,
    pub hearts: Vec<Entity>,
    pub projectiles: Vec<Entity>,
    pub stars: Vec<Entity>,
    pub moons: Vec<Entity>,
    pub explosions: Vec<Entity>,
    pub spawners: Vec<Spawner>,
    /// Ticks until the player may fire again
    pub fire_cooldown: u32,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, theme: Theme, policy: DifficultyPolicy) -> Self {
        Self {
            seed,
            theme,
            policy,
            phase: GamePhase::Playing,
            score: 0,
            kills: 0,
            elapsed: 0.0,
            time_ticks: 0,
            player: Player::default(),
            enemies: Vec::new(),
            clouds: Vec::new(),
            coins: Vec::new(),
            hearts: Vec::new(),
            projectiles: Vec::new(),
            stars: Vec::new(),
            moons: Vec::new(),
            explosions: Vec::new(),
            spawners: spawners_for(theme),
            fire_cooldown: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Read-only view of one collection
    pub fn entities(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Enemy => &self.enemies,
            EntityKind::Cloud => &self.clouds,
            EntityKind::Coin => &self.coins,
            EntityKind::Heart => &self.hearts,
            EntityKind::Projectile => &self.projectiles,
            EntityKind::Star => &self.stars,
            EntityKind::Moon => &self.moons,
            EntityKind::ExplosionFrame => &self.explosions,
        }
    }

    fn entities_mut(&mut self, kind: EntityKind) -> &mut Vec<Entity> {
        match kind {
            EntityKind::Enemy => &mut self.enemies,
            EntityKind::Cloud => &mut self.clouds,
            EntityKind::Coin => &mut self.coins,
            EntityKind::Heart => &mut self.hearts,
            EntityKind::Projectile => &mut self.projectiles,
            EntityKind::Star => &mut self.stars,
            EntityKind::Moon => &mut self.moons,
            EntityKind::ExplosionFrame => &mut self.explosions,
        }
    }

    /// All collections, for per-tick passes that treat every kind alike
    pub(crate) fn collections_mut(&mut self) -> [&mut Vec<Entity>; 8] {
        [
            &mut self.enemies,
            &mut self.clouds,
            &mut self.coins,
            &mut self.hearts,
            &mut self.projectiles,
            &mut self.stars,
            &mut self.moons,
            &mut self.explosions,
        ]
    }

    /// Add an entity to the collection matching its kind
    pub fn insert(&mut self, entity: Entity) {
        self.entities_mut(entity.kind).push(entity);
    }

    /// Build and insert an entity, returning its ID
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.insert(Entity::new(id, kind, pos, vel));
        id
    }

    /// Stationary explosion animation at `pos`
    pub fn spawn_explosion(&mut self, pos: Vec2) {
        self.spawn(EntityKind::ExplosionFrame, pos, Vec2::ZERO);
    }

    /// Total live entities across all collections
    pub fn entity_count(&self) -> usize {
        EntityKind::ALL.iter().map(|k| self.entities(*k).len()).sum()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            health: self.player.health,
            kills: self.kills,
            elapsed: self.elapsed,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Toggle between Playing and Paused. Returns true if the phase changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.push_event(GameEvent::Paused);
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.push_event(GameEvent::Resumed);
                true
            }
            GamePhase::GameOver => false,
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
