//! Fundamental geometric and simulation types.
//!
//! World space is Y-up. A yaw of zero faces +Z and positive yaw turns
//! clockwise when seen from above, so +X is to the right of +Z.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Stable identity of an actor, used to match raycast hits against targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

/// World-space pose of an actor (collider center plus heading).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    /// Heading in degrees.
    pub yaw_degrees: f32,
}

impl Pose {
    pub fn new(position: Vec3, yaw_degrees: f32) -> Self {
        Self {
            position,
            yaw_degrees,
        }
    }

    /// Unit vector the actor is facing, on the horizontal plane.
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw_degrees.to_radians();
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Unit vector to the actor's right, on the horizontal plane.
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw_degrees.to_radians();
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }

    /// Straight-line distance to a world point.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    /// Turn to face the horizontal component of `direction`.
    /// A vertical or zero direction leaves the heading unchanged.
    pub fn face_towards(&mut self, direction: Vec3) {
        let planar = Vec3::new(direction.x, 0.0, direction.z);
        if planar.length_squared() > f32::EPSILON {
            self.yaw_degrees = planar.x.atan2(planar.z).to_degrees();
        }
    }

    /// Rotate the heading by `degrees` (clockwise from above).
    pub fn rotate_yaw(&mut self, degrees: f32) {
        self.yaw_degrees = (self.yaw_degrees + degrees).rem_euclid(360.0);
    }
}

/// View direction for a yaw and a pitch (positive pitch looks down).
pub fn look_direction(yaw_degrees: f32, pitch_degrees: f32) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    let pitch = pitch_degrees.to_radians();
    Vec3::new(
        yaw.sin() * pitch.cos(),
        -pitch.sin(),
        yaw.cos() * pitch.cos(),
    )
}

/// Read-only view of the tracked target for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: ActorId,
    pub position: Vec3,
}

/// Snapshot of player input for one frame. Held keys are levels,
/// `*_pressed` fields are edges (true only on the frame the button went down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_forward: bool,
    pub move_back: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub run: bool,
    pub jump_held: bool,
    pub jump_pressed: bool,
    pub fire_pressed: bool,
    /// Raw mouse axes for this frame (x = horizontal, y = vertical, up positive).
    pub mouse_delta: Vec2,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += f64::from(dt);
    }
}
