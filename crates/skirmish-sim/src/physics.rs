//! Ray and overlap queries against arena boxes and actor spheres.

use glam::Vec3;

use skirmish_ai::services::{HitIdentity, PhysicsQuery};
use skirmish_core::types::ActorId;

use crate::arena::{Arena, Obstacle};

/// Spherical collider for an actor this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySphere {
    pub id: ActorId,
    pub center: Vec3,
    pub radius: f32,
}

/// Query view combining static geometry with the actors' current spheres.
/// Colliders that contain the ray origin are not reported.
pub struct PhysicsScene<'a> {
    arena: &'a Arena,
    bodies: &'a [BodySphere],
}

impl<'a> PhysicsScene<'a> {
    pub fn new(arena: &'a Arena, bodies: &'a [BodySphere]) -> Self {
        Self { arena, bodies }
    }
}

impl PhysicsQuery for PhysicsScene<'_> {
    fn raycast_first_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<HitIdentity> {
        let statics = self
            .arena
            .obstacles
            .iter()
            .filter_map(|o| ray_aabb(origin, direction, o).map(|t| (t, HitIdentity::Static)));
        let actors = self.bodies.iter().filter_map(|b| {
            ray_sphere(origin, direction, b.center, b.radius).map(|t| (t, HitIdentity::Actor(b.id)))
        });

        statics
            .chain(actors)
            .filter(|(t, _)| *t <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, hit)| hit)
    }

    fn check_sphere_overlap(&self, center: Vec3, radius: f32, layer_mask: u32) -> bool {
        self.arena
            .obstacles
            .iter()
            .filter(|o| layer_mask & (1 << o.layer) != 0)
            .any(|o| sphere_overlaps_aabb(center, radius, o))
    }
}

/// Entry distance of a ray into a box, `None` on a miss or when the origin
/// is already inside.
pub fn ray_aabb(origin: Vec3, direction: Vec3, aabb: &Obstacle) -> Option<f32> {
    if aabb.contains(origin) {
        return None;
    }
    let inv = direction.recip();
    let t1 = (aabb.min - origin) * inv;
    let t2 = (aabb.max - origin) * inv;
    let t_near = t1.min(t2).max_element();
    let t_far = t1.max(t2).min_element();
    (t_near <= t_far && t_far >= 0.0 && t_near >= 0.0).then_some(t_near)
}

/// Entry distance of a ray into a sphere, `None` on a miss or when the
/// origin is already inside.
pub fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return None;
    }
    let b = offset.dot(direction);
    let discriminant = b * b - c;
    if b > 0.0 || discriminant < 0.0 {
        return None;
    }
    Some(-b - discriminant.sqrt())
}

pub fn sphere_overlaps_aabb(center: Vec3, radius: f32, aabb: &Obstacle) -> bool {
    let closest = center.clamp(aabb.min, aabb.max);
    closest.distance_squared(center) <= radius * radius
}

/// Shortest distance from `point` to the segment `start..end`.
pub fn segment_point_distance(start: Vec3, end: Vec3, point: Vec3) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_squared();
    if length_sq <= f32::EPSILON {
        return start.distance(point);
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    (start + segment * t).distance(point)
}
