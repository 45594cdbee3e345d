//! ECS systems run by the engine each tick.
//!
//! Systems are plain functions over `&mut World` plus whatever engine state
//! they need. They keep nothing between calls.

pub mod cleanup;
pub mod combat_ai;
pub mod contact;
pub mod navigation;
pub mod player;
pub mod projectiles;
pub mod snapshot;

use hecs::World;

use skirmish_ai::locomotion::LocomotionController;
use skirmish_core::constants::ACTOR_RADIUS;
use skirmish_core::types::Pose;

use crate::components::{enemy_center, EnemyAgent};
use crate::physics::BodySphere;

/// Gather this tick's actor colliders into `out`. Defeated enemies are
/// left out.
pub fn collect_bodies(world: &World, out: &mut Vec<BodySphere>) {
    out.clear();
    for (_entity, (pose, controller)) in world.query::<(&Pose, &LocomotionController)>().iter() {
        out.push(BodySphere {
            id: controller.id(),
            center: pose.position,
            radius: ACTOR_RADIUS,
        });
    }
    for (_entity, (pose, agent)) in world.query::<(&Pose, &EnemyAgent)>().iter() {
        if !agent.is_defeated() {
            out.push(BodySphere {
                id: agent.id(),
                center: enemy_center(pose),
                radius: ACTOR_RADIUS,
            });
        }
    }
}
