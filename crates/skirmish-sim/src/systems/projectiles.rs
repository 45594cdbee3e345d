//! Projectile system: fire on the trigger edge, fly, hit the first thing
//! in the way.

use glam::Vec3;
use hecs::{Entity, World};

use skirmish_ai::locomotion::LocomotionController;
use skirmish_core::config::ProjectileConfig;
use skirmish_core::constants::ACTOR_RADIUS;
use skirmish_core::enums::ContactKind;
use skirmish_core::events::AgentEvent;
use skirmish_core::types::{InputSnapshot, Pose};

use crate::arena::Arena;
use crate::components::{enemy_center, EnemyAgent, Projectile};
use crate::match_tracker::MatchTracker;
use crate::physics::{segment_point_distance, sphere_overlaps_aabb};

pub fn run(
    world: &mut World,
    arena: &Arena,
    config: &ProjectileConfig,
    input: &InputSnapshot,
    dt: f32,
    tracker: &mut MatchTracker,
    events: &mut Vec<AgentEvent>,
) {
    if input.fire_pressed {
        fire(world, config);
    }

    let targets: Vec<(Entity, Vec3)> = world
        .query::<(&Pose, &EnemyAgent)>()
        .iter()
        .filter(|(_, (_, agent))| !agent.is_defeated())
        .map(|(entity, (pose, _))| (entity, enemy_center(pose)))
        .collect();

    let mut hits: Vec<(Entity, Entity)> = Vec::new();
    for (entity, (projectile, pose)) in world.query_mut::<(&mut Projectile, &mut Pose)>() {
        if projectile.spent {
            continue;
        }
        let start = pose.position;
        let end = start + projectile.velocity * dt;
        pose.position = end;
        projectile.remaining -= dt;

        let reach = ACTOR_RADIUS + projectile.radius;
        let struck = targets
            .iter()
            .filter(|(_, center)| segment_point_distance(start, end, *center) <= reach)
            .min_by(|a, b| start.distance(a.1).total_cmp(&start.distance(b.1)));
        if let Some((enemy, _)) = struck {
            hits.push((entity, *enemy));
        } else if arena
            .obstacles
            .iter()
            .any(|o| sphere_overlaps_aabb(end, projectile.radius, o))
        {
            projectile.spent = true;
        }
    }

    for (projectile_entity, enemy) in hits {
        let consumed = match world.get::<&mut EnemyAgent>(enemy) {
            Ok(mut agent) => {
                agent
                    .on_contact(ContactKind::Projectile, tracker, events)
                    .consume_other
            }
            Err(_) => false,
        };
        if consumed {
            if let Ok(mut projectile) = world.get::<&mut Projectile>(projectile_entity) {
                projectile.spent = true;
            }
        }
    }
}

/// Launch one projectile from the player's camera along its view direction.
fn fire(world: &mut World, config: &ProjectileConfig) {
    let muzzle = world
        .query::<(&Pose, &LocomotionController)>()
        .iter()
        .find(|(_, (_, controller))| !controller.health().is_defeated())
        .map(|(_, (pose, controller))| (*pose, controller.view_direction(pose)));
    let Some((pose, direction)) = muzzle else {
        return;
    };

    let origin = pose.position + direction * (ACTOR_RADIUS + config.radius);
    log::debug!("projectile fired from {origin} along {direction}");
    world.spawn((
        Projectile {
            velocity: direction * config.speed,
            remaining: config.lifetime,
            radius: config.radius,
            spent: false,
        },
        Pose::new(origin, pose.yaw_degrees),
    ));
}
