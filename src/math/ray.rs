//! Ray type and operations

use crate::core::types::{Mat4, Vec3};
use super::aabb::Aabb;

/// A ray defined by origin and direction
///
/// The direction need not be normalized; the parameter `t` is measured in
/// multiples of it. A zero direction is degenerate and picks nothing.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Precomputed 1/direction for fast AABB intersection
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: Vec3::new(
                1.0 / direction.x,
                1.0 / direction.y,
                1.0 / direction.z,
            ),
        }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray-AABB intersection using slab method
    /// Returns Some((t_near, t_far)) if intersection, None otherwise
    ///
    /// An axis with zero direction is handled as a containment check so
    /// an origin sitting exactly on a slab plane does not poison the
    /// interval with `0 * inf` NaNs.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> Option<(f32, f32)> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            if self.direction[axis] == 0.0 {
                if self.origin[axis] < aabb.min[axis] || self.origin[axis] > aabb.max[axis] {
                    return None;
                }
            } else {
                let t1 = (aabb.min[axis] - self.origin[axis]) * self.inv_direction[axis];
                let t2 = (aabb.max[axis] - self.origin[axis]) * self.inv_direction[axis];
                t_near = t_near.max(t1.min(t2));
                t_far = t_far.min(t1.max(t2));
            }
        }

        if t_near <= t_far && t_far >= 0.0 {
            Some((t_near.max(0.0), t_far))
        } else {
            None
        }
    }

    /// Transform ray by matrix
    ///
    /// The direction is deliberately left unnormalized so that `t` values
    /// keep their meaning across the transform.
    pub fn transform(&self, matrix: &Mat4) -> Ray {
        let new_origin = matrix.transform_point3(self.origin);
        let new_direction = matrix.transform_vector3(self.direction);
        Ray::new(new_origin, new_direction)
    }
}
