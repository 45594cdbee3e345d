//! Entity spawn factories for the arena.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_ai::locomotion::LocomotionController;
use skirmish_core::config::GameConfig;
use skirmish_core::types::Pose;

use crate::arena::Arena;
use crate::components::{actor_id, ContactState, EnemyAgent, NavAgent, Player, RigidBody};
use crate::match_tracker::MatchTracker;

/// Closest a scattered enemy may start to the player.
const MIN_SPAWN_SEPARATION: f32 = 6.0;

/// Attempts per enemy before giving up on a free spot.
const MAX_SPAWN_ATTEMPTS: usize = 32;

/// Spawn the player standing on the floor at `feet`, facing `yaw_degrees`.
pub fn spawn_player(
    world: &mut World,
    config: &GameConfig,
    feet: Vec3,
    yaw_degrees: f32,
) -> Entity {
    let entity = world.reserve_entity();
    let center = feet + Vec3::Y * (config.locomotion.collider_height / 2.0);
    let controller = LocomotionController::new(actor_id(entity), config.locomotion.clone());
    world.spawn_at(
        entity,
        (
            Player,
            Pose::new(center, yaw_degrees),
            RigidBody::default(),
            controller,
        ),
    );
    entity
}

/// Spawn an enemy on the floor at `pose` and count it toward the match.
pub fn spawn_enemy(
    world: &mut World,
    config: &GameConfig,
    tracker: &mut MatchTracker,
    pose: Pose,
) -> Entity {
    let entity = world.reserve_entity();
    let agent = EnemyAgent::new(
        actor_id(entity),
        config.combat.clone(),
        &pose,
        NavAgent::at(pose.position),
    );
    world.spawn_at(entity, (pose, agent, ContactState::default()));
    tracker.register_enemy();
    entity
}

/// Scatter `count` enemies over free walkable ground, keeping clear of
/// `avoid`. Returns the entities actually spawned.
pub fn scatter_enemies(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    arena: &Arena,
    config: &GameConfig,
    tracker: &mut MatchTracker,
    count: usize,
    avoid: Vec3,
) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(count);
    for _ in 0..count {
        let spot = (0..MAX_SPAWN_ATTEMPTS).find_map(|_| {
            let x = rng.gen_range(arena.walkable_min.x..=arena.walkable_max.x);
            let z = rng.gen_range(arena.walkable_min.y..=arena.walkable_max.y);
            let point = Vec3::new(x, arena.floor_y, z);
            let clear = Vec3::new(avoid.x - x, 0.0, avoid.z - z).length() >= MIN_SPAWN_SEPARATION;
            (clear && !arena.is_blocked(point)).then_some(point)
        });
        match spot {
            Some(point) => {
                let yaw = rng.gen_range(0.0..360.0);
                spawned.push(spawn_enemy(world, config, tracker, Pose::new(point, yaw)));
            }
            None => log::warn!("no free spawn point for enemy, skipping"),
        }
    }
    spawned
}
