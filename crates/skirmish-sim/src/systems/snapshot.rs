//! Snapshot system: reads the world into a [`WorldSnapshot`].

use hecs::World;

use skirmish_ai::locomotion::LocomotionController;
use skirmish_core::events::AgentEvent;
use skirmish_core::types::{Pose, SimTime};

use crate::components::{EnemyAgent, Projectile, RigidBody};
use crate::match_tracker::MatchTracker;
use crate::snapshot::{EnemyView, MatchView, PlayerView, ProjectileView, WorldSnapshot};

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    tracker: &MatchTracker,
    events: Vec<AgentEvent>,
) -> WorldSnapshot {
    let player = world
        .query::<(&Pose, &RigidBody, &LocomotionController)>()
        .iter()
        .next()
        .map(|(_, (pose, body, controller))| PlayerView {
            id: controller.id(),
            position: pose.position,
            yaw_degrees: pose.yaw_degrees,
            pitch_degrees: controller.pitch_degrees(),
            velocity: body.velocity,
            state: controller.state(),
            grounded: controller.is_grounded(),
            jumps_used: controller.jumps_used(),
            health: controller.health().current(),
            max_health: controller.health().max(),
            health_fraction: controller.health().fraction(),
        });

    let mut enemies: Vec<EnemyView> = world
        .query::<(&Pose, &EnemyAgent)>()
        .iter()
        .map(|(_, (pose, agent))| EnemyView {
            id: agent.id(),
            position: pose.position,
            yaw_degrees: pose.yaw_degrees,
            state: agent.state(),
            health: agent.health().current(),
            max_health: agent.health().max(),
            health_fraction: agent.health().fraction(),
            destination: agent.navigation().destination,
            dash_remaining: agent.dash_remaining(),
        })
        .collect();
    enemies.sort_by_key(|e| e.id);

    let projectiles = world
        .query::<(&Pose, &Projectile)>()
        .iter()
        .map(|(_, (pose, projectile))| ProjectileView {
            position: pose.position,
            velocity: projectile.velocity,
        })
        .collect();

    WorldSnapshot {
        time: *time,
        player,
        enemies,
        projectiles,
        match_state: MatchView {
            total_enemies: tracker.total_enemies(),
            defeated_enemies: tracker.defeated_enemies(),
            time_remaining: tracker.time_remaining(),
            outcome: tracker.outcome(),
        },
        events,
    }
}
