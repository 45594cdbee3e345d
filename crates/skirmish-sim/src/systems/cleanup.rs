//! Cleanup system: removes defeated enemies and spent projectiles.

use hecs::{Entity, World};

use crate::components::{EnemyAgent, Projectile};

/// Despawn finished entities. `despawn_buffer` is reused between ticks.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, agent) in world.query_mut::<&EnemyAgent>() {
        if agent.is_defeated() {
            despawn_buffer.push(entity);
        }
    }

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if projectile.spent || projectile.remaining <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
