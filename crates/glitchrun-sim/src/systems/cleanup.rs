//! End-of-tick sweep: despawns flagged entities and expires temporary weapons.

use hecs::{Entity, World};

use glitchrun_core::components::{Body, Projectile};
use glitchrun_core::events::GameEvent;
use glitchrun_core::player::Player;

use crate::pool::Pool;

/// Despawn every flagged entity, returning projectiles to the pool.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, pool: &mut Pool<Projectile>, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    for (entity, body) in world.query_mut::<&Body>() {
        if body.marked_for_deletion {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        if let Ok(projectile) = world.remove_one::<Projectile>(entity) {
            pool.release(projectile);
        }
        let _ = world.despawn(entity);
    }
}

/// Remove temporary weapons whose expiry tick has passed.
pub fn expire_temporary_weapons(player: &mut Player, tick: u64, events: &mut Vec<GameEvent>) {
    player.weapons.retain(|weapon| match weapon.expires_at_tick {
        Some(expiry) if tick >= expiry => {
            events.push(GameEvent::WeaponExpired {
                weapon: weapon.kind,
            });
            false
        }
        _ => true,
    });
}
