//! Player system: movement, gravity, then the locomotion logic tick.

use glam::Vec3;
use hecs::World;

use skirmish_ai::locomotion::{LocomotionContext, LocomotionController};
use skirmish_ai::services::VelocitySink;
use skirmish_core::constants::GRAVITY;
use skirmish_core::events::AgentEvent;
use skirmish_core::types::{InputSnapshot, Pose};

use crate::arena::Arena;
use crate::components::RigidBody;
use crate::physics::PhysicsScene;

pub fn run(
    world: &mut World,
    arena: &Arena,
    input: &InputSnapshot,
    dt: f32,
    events: &mut Vec<AgentEvent>,
) {
    // Ground probing only looks at static geometry.
    let physics = PhysicsScene::new(arena, &[]);

    for (_entity, (pose, body, controller)) in
        world.query_mut::<(&mut Pose, &mut RigidBody, &mut LocomotionController)>()
    {
        if controller.health().is_defeated() {
            continue;
        }

        controller.fixed_update(pose, input, dt);
        let half_height = controller.config().collider_height / 2.0;
        integrate_vertical(pose, body, arena, half_height, dt);

        let mut ctx = LocomotionContext {
            dt,
            input,
            physics: &physics,
            body,
            events: &mut *events,
        };
        controller.tick(pose, &mut ctx);
    }
}

/// Apply gravity and keep the body inside the arena, resting on the floor.
fn integrate_vertical(
    pose: &mut Pose,
    body: &mut RigidBody,
    arena: &Arena,
    half_height: f32,
    dt: f32,
) {
    let mut velocity = body.velocity();
    velocity.y -= GRAVITY * dt;

    let mut position = pose.position + Vec3::Y * velocity.y * dt;
    let rest_height = arena.floor_y + half_height;
    if position.y <= rest_height {
        position.y = rest_height;
        velocity.y = velocity.y.max(0.0);
    }

    let planar = arena.clamp_to_walkable(position);
    pose.position = Vec3::new(planar.x, position.y, planar.z);
    body.set_velocity(velocity);
}
