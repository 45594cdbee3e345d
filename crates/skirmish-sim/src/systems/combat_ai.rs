//! Combat AI system: ticks every live enemy agent against the player.

use glam::Vec3;
use hecs::World;
use rand_chacha::ChaCha8Rng;

use skirmish_ai::combat::CombatContext;
use skirmish_ai::locomotion::LocomotionController;
use skirmish_core::events::AgentEvent;
use skirmish_core::types::{Pose, TargetView};

use crate::arena::Arena;
use crate::components::EnemyAgent;
use crate::physics::{BodySphere, PhysicsScene};
use crate::systems::collect_bodies;

pub fn run(
    world: &mut World,
    arena: &Arena,
    rng: &mut ChaCha8Rng,
    bodies: &mut Vec<BodySphere>,
    dt: f32,
    events: &mut Vec<AgentEvent>,
) {
    let target = player_target(world);
    collect_bodies(world, bodies);
    let physics = PhysicsScene::new(arena, bodies.as_slice());

    for (_entity, (pose, agent)) in world.query_mut::<(&Pose, &mut EnemyAgent)>() {
        if agent.is_defeated() {
            continue;
        }
        let mut ctx = CombatContext {
            dt,
            pose,
            target,
            nav_mesh: arena,
            physics: &physics,
            rng: &mut *rng,
            events: &mut *events,
        };
        if let Some(entered) = agent.tick(&mut ctx) {
            log::trace!("enemy {:?} -> {entered:?}", agent.id());
        }
    }
}

/// The player as enemies track it: identity plus the point under its feet.
/// A downed player is no longer a target.
pub fn player_target(world: &World) -> Option<TargetView> {
    world
        .query::<(&Pose, &LocomotionController)>()
        .iter()
        .find(|(_, (_, controller))| !controller.health().is_defeated())
        .map(|(_, (pose, controller))| TargetView {
            id: controller.id(),
            position: pose.position - Vec3::Y * (controller.config().collider_height / 2.0),
        })
}
