//! Navigation system: moves enemies straight toward their destinations.

use glam::Vec3;
use hecs::World;

use skirmish_core::types::Pose;

use crate::arena::Arena;
use crate::components::EnemyAgent;

pub fn run(world: &mut World, arena: &Arena, dt: f32) {
    for (_entity, (pose, agent)) in world.query_mut::<(&mut Pose, &mut EnemyAgent)>() {
        let nav = agent.navigation_mut();
        if let Some(destination) = nav.destination {
            let offset = Vec3::new(
                destination.x - pose.position.x,
                0.0,
                destination.z - pose.position.z,
            );
            let distance = offset.length();
            let step = nav.speed * dt;
            if distance > f32::EPSILON && step > 0.0 {
                pose.face_towards(offset);
                pose.position = if distance <= step {
                    destination
                } else {
                    pose.position + offset / distance * step
                };
            }
        }
        pose.position = arena.clamp_to_walkable(pose.position);
        nav.position = pose.position;
    }
}
