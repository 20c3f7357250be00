//! Ordered ray/grid intersection
//!
//! Two strategies produce the same near-to-far cell ordering for any
//! non-degenerate ray: a brute-force scan that tests every cell in the
//! bounds (the reference oracle) and an incremental Amanatides-Woo
//! walk that visits only the cells the ray passes through (the production
//! path).
//!
//! Boundary rule: cell ownership is half-open, so a point lying on a
//! cell's max face belongs to the neighbor past that face. A ray running
//! exactly along a shared cell face therefore visits the cells on the
//! positive side of that face (and misses entirely when it rides the
//! outer max face of the bounds). When the walk crosses a cell corner or
//! edge exactly it steps X first, then Y, then Z, inserting connecting
//! cells the ray only touches at that corner; the oracle reports only
//! cells owning a ray point, so equivalence is stated for rays that do
//! not pass exactly through a cell corner or edge.

use std::cmp::Ordering;

use crate::core::types::{IVec3, Mat4, Vec3};
use crate::math::{Aabb, IBox3, Ray};

/// Cells of `bounds` the world ray passes through, nearest first
///
/// `transform` maps the bounds' cell space to world space (cell `p` spans
/// the local unit box at `p`) and must be invertible. A zero ray
/// direction yields no cells.
pub fn intersect(bounds: IBox3, transform: &Mat4, world_ray: &Ray) -> Vec<IVec3> {
    intersect_walk(bounds, transform, world_ray)
}

/// Reference implementation: test every cell in the bounds against the
/// ray independently, sort by entry parameter
///
/// The sort is stable, so tie entries keep the x-then-y-then-z
/// enumeration order.
pub fn intersect_brute(bounds: IBox3, transform: &Mat4, world_ray: &Ray) -> Vec<IVec3> {
    if bounds.is_empty() || world_ray.direction == Vec3::ZERO {
        return Vec::new();
    }
    let local = world_ray.transform(&transform.inverse());

    let mut hits: Vec<(IVec3, f32)> = Vec::new();
    for x in bounds.min.x..=bounds.max.x {
        for y in bounds.min.y..=bounds.max.y {
            for z in bounds.min.z..=bounds.max.z {
                let cell = IVec3::new(x, y, z);
                if let Some(t_enter) = cell_entry(&local, cell) {
                    hits.push((cell, t_enter));
                }
            }
        }
    }

    hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    hits.into_iter().map(|(cell, _)| cell).collect()
}

/// Parameter at which the ray enters the half-open unit box at `cell`,
/// or `None` when no ray point falls inside it
///
/// Per-axis membership is `cell <= coord < cell + 1`, the same ownership
/// the walk's floor and stepping imply, so cells only grazed at a corner
/// or along a max face own no point and drop out.
fn cell_entry(ray: &Ray, cell: IVec3) -> Option<f32> {
    // t interval with the ray point inside the box; whether each end is
    // attained decides degenerate touch-only contacts
    let mut t_lo = 0.0_f32;
    let mut t_hi = f32::INFINITY;
    let mut lo_closed = true;
    let mut hi_closed = false;

    for axis in 0..3 {
        let near = cell[axis] as f32;
        let far = near + 1.0;
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        if dir == 0.0 {
            if origin < near || origin >= far {
                return None;
            }
            continue;
        }
        // [near, far) maps to a t interval closed on the near-face side
        // and open on the far-face side
        let (lo, lo_c, hi, hi_c) = if dir > 0.0 {
            ((near - origin) / dir, true, (far - origin) / dir, false)
        } else {
            ((far - origin) / dir, false, (near - origin) / dir, true)
        };
        if lo > t_lo || (lo == t_lo && !lo_c) {
            t_lo = lo;
            lo_closed = lo_c;
        }
        if hi < t_hi || (hi == t_hi && !hi_c) {
            t_hi = hi;
            hi_closed = hi_c;
        }
    }

    let occupied = t_lo < t_hi || (t_lo == t_hi && lo_closed && hi_closed);
    occupied.then_some(t_lo)
}

/// Production implementation: 3D DDA walk from where the ray enters the
/// bounds to where it leaves, inherently ordered near-to-far
pub fn intersect_walk(bounds: IBox3, transform: &Mat4, world_ray: &Ray) -> Vec<IVec3> {
    if bounds.is_empty() || world_ray.direction == Vec3::ZERO {
        return Vec::new();
    }
    let local = world_ray.transform(&transform.inverse());

    // a ray riding the outer max face owns no cell; every point on it
    // belongs to the out-of-bounds side
    for axis in 0..3 {
        if local.direction[axis] == 0.0 && local.origin[axis] >= (bounds.max[axis] + 1) as f32 {
            return Vec::new();
        }
    }

    let outer = Aabb::new(bounds.min.as_vec3(), (bounds.max + IVec3::ONE).as_vec3());
    let Some((t_enter, _)) = local.intersects_aabb(&outer) else {
        return Vec::new();
    };

    // starting cell; the clamp pins entry points that sit exactly on the
    // far faces back into range
    let mut cell = local
        .at(t_enter)
        .floor()
        .as_ivec3()
        .clamp(bounds.min, bounds.max);

    let dir = local.direction;
    let mut step = IVec3::ZERO;
    let mut t_max = Vec3::INFINITY;
    let mut t_delta = Vec3::INFINITY;
    for axis in 0..3 {
        if dir[axis] > 0.0 {
            step[axis] = 1;
            t_max[axis] = ((cell[axis] + 1) as f32 - local.origin[axis]) / dir[axis];
            t_delta[axis] = 1.0 / dir[axis];
        } else if dir[axis] < 0.0 {
            step[axis] = -1;
            t_max[axis] = (cell[axis] as f32 - local.origin[axis]) / dir[axis];
            t_delta[axis] = -1.0 / dir[axis];
        }
    }

    let mut out = Vec::new();
    loop {
        out.push(cell);

        // step the axis whose next boundary is closest; ties go X, Y, Z
        let axis = if t_max.x <= t_max.y && t_max.x <= t_max.z {
            0
        } else if t_max.y <= t_max.z {
            1
        } else {
            2
        };

        cell[axis] += step[axis];
        if cell[axis] < bounds.min[axis] || cell[axis] > bounds.max[axis] {
            break;
        }
        t_max[axis] += t_delta[axis];
    }
    out
}
