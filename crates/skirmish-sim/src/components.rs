//! ECS components for hecs entities.
//!
//! Agents and controllers from skirmish-ai are stored as components
//! directly; the types here are the host-side glue around them.

use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use skirmish_ai::combat::CombatAgent;
use skirmish_ai::services::{NavigationAgent, VelocitySink};
use skirmish_core::types::{ActorId, Pose};

/// Marker for the player entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Enemy combat agent steering through the host's navigation.
pub type EnemyAgent = CombatAgent<NavAgent>;

/// Straight-line navigation handle. The navigation system moves the owner
/// toward `destination` at `speed` and mirrors its position back here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub position: Vec3,
}

impl NavAgent {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

impl NavigationAgent for NavAgent {
    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
    }

    fn reset_path(&mut self) {
        self.destination = None;
    }

    fn remaining_distance(&self) -> f32 {
        self.destination.map_or(0.0, |d| {
            let offset = d - self.position;
            (offset.x * offset.x + offset.z * offset.z).sqrt()
        })
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

/// Player rigid body velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub velocity: Vec3,
}

impl VelocitySink for RigidBody {
    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}

/// Player-fired projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub velocity: Vec3,
    /// Seconds until the projectile expires.
    pub remaining: f32,
    pub radius: f32,
    /// Hit something and is waiting for cleanup.
    pub spent: bool,
}

/// Whether an enemy is overlapping the player, for contact-onset damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactState {
    pub touching_player: bool,
}

/// Actor identity of an entity, as seen by agents and raycasts.
pub fn actor_id(entity: Entity) -> ActorId {
    ActorId(entity.to_bits().get())
}

/// Height of an enemy's collider center above its feet.
pub const ENEMY_CENTER_HEIGHT: f32 = 1.0;

/// Collider center of an enemy standing at `pose`.
pub fn enemy_center(pose: &Pose) -> Vec3 {
    pose.position + Vec3::Y * ENEMY_CENTER_HEIGHT
}
