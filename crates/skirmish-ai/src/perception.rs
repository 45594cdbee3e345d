//! Vision cone with occlusion.

use glam::Vec3;

use skirmish_core::config::CombatConfig;
use skirmish_core::types::{Pose, TargetView};

use crate::services::{HitIdentity, PhysicsQuery};

/// Parameters of an actor's vision test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionProbe {
    /// Maximum distance at which the target can be seen.
    pub range: f32,
    /// Largest angle between facing and target direction that still counts.
    pub half_angle_degrees: f32,
    /// Height of the ray origin above the observer's position.
    pub eye_height: f32,
}

impl VisionProbe {
    pub fn from_config(config: &CombatConfig) -> Self {
        Self {
            range: config.detect_range,
            half_angle_degrees: config.detect_half_angle_degrees,
            eye_height: config.eye_height,
        }
    }

    /// Whether `target` is observable from `observer`: within range, inside
    /// the cone, and the first thing an eye-height ray toward it hits.
    ///
    /// A target at the observer's exact position has no direction to look
    /// along and is reported as not observable.
    pub fn can_see(
        &self,
        observer: &Pose,
        target: &TargetView,
        physics: &dyn PhysicsQuery,
    ) -> bool {
        let to_target = target.position - observer.position;
        let distance = to_target.length();

        if distance > self.range || distance <= f32::EPSILON {
            return false;
        }

        let angle = observer.forward().angle_between(to_target).to_degrees();
        if angle > self.half_angle_degrees {
            return false;
        }

        let origin = observer.position + Vec3::Y * self.eye_height;
        let direction = to_target / distance;
        physics.raycast_first_hit(origin, direction, self.range)
            == Some(HitIdentity::Actor(target.id))
    }
}
