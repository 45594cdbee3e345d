//! Collaborator interfaces supplied by the host.
//!
//! Navigation, physics and match bookkeeping live outside this crate. Each
//! call is synchronous and must answer within the current tick.

use glam::Vec3;

use skirmish_core::types::ActorId;

/// Per-agent handle onto the navigation service.
pub trait NavigationAgent {
    fn set_destination(&mut self, point: Vec3);
    /// Stop following the current path.
    fn reset_path(&mut self);
    /// Path length left to the destination; zero when there is none.
    fn remaining_distance(&self) -> f32;
    fn set_speed(&mut self, speed: f32);
}

/// Query side of the navigation service.
pub trait NavMesh {
    /// Nearest walkable point within `max_distance` of `point`, if any.
    fn project_to_navigable(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// What a ray struck first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitIdentity {
    Actor(ActorId),
    /// Level geometry or anything else without an actor identity.
    Static,
}

/// Physics query service.
pub trait PhysicsQuery {
    /// First thing hit by a ray, `direction` being unit length.
    fn raycast_first_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32)
        -> Option<HitIdentity>;

    /// Whether a sphere overlaps any collider on the layers in `layer_mask`.
    fn check_sphere_overlap(&self, center: Vec3, radius: f32, layer_mask: u32) -> bool;
}

/// Rigid body whose velocity the locomotion controller writes.
pub trait VelocitySink {
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
}

/// Match bookkeeping notified of terminal actor events. Each method is called
/// at most once per actor lifetime.
pub trait MatchProgressSink {
    fn on_agent_defeated(&mut self);
    fn on_player_game_over(&mut self);
}
