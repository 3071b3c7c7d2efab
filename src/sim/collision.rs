//! Collision resolution
//!
//! Axis-aligned box tests between the player (or its projectiles) and each
//! hostile/collectible collection. Every effect is applied immediately
//! within the tick and reported as a `GameEvent`.

use glam::Vec2;

use super::aabb::Aabb;
use super::spawn::spawn_at;
use super::state::{Entity, EntityKind, GameEvent, GamePhase, GameState};
use crate::consts::BONUS_HEART_EVERY;

/// Run all collision passes in order.
///
/// Returns true if the player's health ran out this tick, in which case the
/// remaining passes are skipped.
pub fn resolve_collisions(state: &mut GameState) -> bool {
    resolve_projectile_hits(state);
    if resolve_player_hits(state) {
        return true;
    }
    collect_coins(state);
    collect_hearts(state);
    false
}

/// IDs (and positions) of entities in `list` overlapping `target`
fn overlapping(target: &Aabb, list: &[Entity]) -> Vec<(u32, Vec2)> {
    list.iter()
        .filter(|e| target.intersects(&e.aabb()))
        .map(|e| (e.id, e.pos))
        .collect()
}

/// Projectiles vs enemies. Each projectile destroys at most one enemy.
pub fn resolve_projectile_hits(state: &mut GameState) {
    let mut spent: Vec<u32> = Vec::new();
    let mut destroyed: Vec<u32> = Vec::new();
    let mut kill_sites: Vec<Vec2> = Vec::new();

    for projectile in &state.projectiles {
        let shot = projectile.aabb();
        let hit = state
            .enemies
            .iter()
            .find(|e| !destroyed.contains(&e.id) && shot.intersects(&e.aabb()));
        if let Some(enemy) = hit {
            spent.push(projectile.id);
            destroyed.push(enemy.id);
            kill_sites.push(enemy.pos);
        }
    }

    if kill_sites.is_empty() {
        return;
    }

    state.projectiles.retain(|p| !spent.contains(&p.id));
    state.enemies.retain(|e| !destroyed.contains(&e.id));

    for pos in kill_sites {
        state.kills += 1;
        state.spawn_explosion(pos);
        state.push_event(GameEvent::EnemyDestroyed {
            pos,
            kills: state.kills,
        });

        if state.kills % BONUS_HEART_EVERY == 0 {
            spawn_at(state, EntityKind::Heart, pos);
            log::debug!("Bonus heart after {} kills", state.kills);
            state.push_event(GameEvent::BonusHeartSpawned { kills: state.kills });
        }
    }
}

/// Player vs enemies. Returns true if this ended the run.
pub fn resolve_player_hits(state: &mut GameState) -> bool {
    let hits = overlapping(&state.player.aabb(), &state.enemies);
    if hits.is_empty() {
        return false;
    }

    let mut consumed: Vec<u32> = Vec::with_capacity(hits.len());
    let mut exhausted = false;

    for (id, pos) in hits {
        consumed.push(id);
        exhausted = state.player.take_hit();
        state.spawn_explosion(pos);
        state.push_event(GameEvent::PlayerHit {
            health: state.player.health,
        });

        if exhausted {
            state.phase = GamePhase::GameOver;
            state.push_event(GameEvent::GameOver { score: state.score });
            log::info!("Game over with score {}", state.score);
            break;
        }
    }

    state.enemies.retain(|e| !consumed.contains(&e.id));
    exhausted
}

/// Player vs coins: one point per coin
pub fn collect_coins(state: &mut GameState) {
    let taken = overlapping(&state.player.aabb(), &state.coins);
    if taken.is_empty() {
        return;
    }
    state.coins.retain(|c| !taken.iter().any(|(id, _)| *id == c.id));
    for _ in &taken {
        state.score += 1;
        state.push_event(GameEvent::CoinCollected { score: state.score });
    }
}

/// Player vs hearts: one health point per heart, capped
pub fn collect_hearts(state: &mut GameState) {
    let taken = overlapping(&state.player.aabb(), &state.hearts);
    if taken.is_empty() {
        return;
    }
    state.hearts.retain(|h| !taken.iter().any(|(id, _)| *id == h.id));
    for _ in &taken {
        state.player.heal();
        state.push_event(GameEvent::HeartCollected {
            health: state.player.health,
        });
    }
}
