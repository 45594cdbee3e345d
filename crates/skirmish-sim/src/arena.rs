//! Static level geometry and the navigation surface over it.
//!
//! The walkable surface is a horizontal rectangle at floor height. Boxes on
//! the ground layer are floors; every other box is an obstacle that blocks
//! rays and cannot be stood in.

use glam::{Vec2, Vec3};

use skirmish_ai::services::NavMesh;
use skirmish_core::constants::GROUND_LAYER;

/// Axis-aligned box collider on a physics layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub min: Vec3,
    pub max: Vec3,
    pub layer: u32,
}

impl Obstacle {
    pub fn new(min: Vec3, max: Vec3, layer: u32) -> Self {
        Self { min, max, layer }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Whether the box footprint covers `point` in XZ.
    fn covers_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// Bounded level: one floor slab plus obstacles.
#[derive(Debug, Clone)]
pub struct Arena {
    /// Walkable rectangle corners in XZ.
    pub walkable_min: Vec2,
    pub walkable_max: Vec2,
    /// Height of the walking surface.
    pub floor_y: f32,
    pub obstacles: Vec<Obstacle>,
}

impl Arena {
    /// Square open field of side `2 * half_extent` centered on the origin.
    pub fn open_field(half_extent: f32) -> Self {
        let floor = Obstacle::new(
            Vec3::new(-half_extent, -1.0, -half_extent),
            Vec3::new(half_extent, 0.0, half_extent),
            GROUND_LAYER,
        );
        Self {
            walkable_min: Vec2::splat(-half_extent),
            walkable_max: Vec2::splat(half_extent),
            floor_y: 0.0,
            obstacles: vec![floor],
        }
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    /// Clamp a point onto the walkable rectangle at floor height.
    pub fn clamp_to_walkable(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.walkable_min.x, self.walkable_max.x),
            self.floor_y,
            point.z.clamp(self.walkable_min.y, self.walkable_max.y),
        )
    }

    /// Whether a non-ground obstacle stands on `point`.
    pub fn is_blocked(&self, point: Vec3) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.layer != GROUND_LAYER && o.covers_xz(point) && o.max.y > self.floor_y)
    }
}

impl NavMesh for Arena {
    fn project_to_navigable(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        let projected = self.clamp_to_walkable(point);
        let planar_offset = Vec2::new(projected.x - point.x, projected.z - point.z).length();
        if planar_offset > max_distance || self.is_blocked(projected) {
            return None;
        }
        Some(projected)
    }
}
