//! Cell set generators for the region tools
//!
//! These only compute which cells a tool covers; writing the cells and
//! recording undo happens in the tool dispatcher.

use std::collections::HashSet;

use crate::core::types::{IVec3, Mat4};
use crate::math::{IBox3, Ray};
use crate::raycast;
use crate::tools::Axis;
use crate::voxel::{CellValue, Scene, SpriteId};

/// Contiguous region of same-colored cells reachable from `seed`
///
/// Face adjacency only, bounded by the sprite's cell bounds. Colors are
/// compared against the composited read at the seed, so the region can
/// span invisible gaps filled by lower layers the same way the eye sees
/// them.
pub fn flood_cells(scene: &Scene, sprite: SpriteId, seed: IVec3) -> Vec<IVec3> {
    let Some(bounds) = scene.sprite(sprite).map(|s| s.bounds()) else {
        return Vec::new();
    };
    if !bounds.contains(seed) {
        return Vec::new();
    }
    let from = scene.color_at(sprite, seed);

    let mut region = Vec::new();
    let mut seen = HashSet::new();
    let mut work = vec![seed];
    seen.insert(seed);
    while let Some(p) = work.pop() {
        region.push(p);
        for d in [
            IVec3::X,
            IVec3::NEG_X,
            IVec3::Y,
            IVec3::NEG_Y,
            IVec3::Z,
            IVec3::NEG_Z,
        ] {
            let n = p + d;
            if bounds.contains(n) && scene.color_at(sprite, n) == from && seen.insert(n) {
                work.push(n);
            }
        }
    }
    region
}

/// Every cell of the one-cell-thick slice of `bounds` that passes
/// through `through` perpendicular to `axis`
pub fn slab_cells(bounds: IBox3, axis: Axis, through: IVec3) -> Vec<IVec3> {
    if bounds.is_empty() || !bounds.contains(through) {
        return Vec::new();
    }
    let mut cells = Vec::new();
    let (lo, hi) = (bounds.min, bounds.max);
    match axis {
        Axis::X => {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    cells.push(IVec3::new(through.x, y, z));
                }
            }
        }
        Axis::Y => {
            for x in lo.x..=hi.x {
                for z in lo.z..=hi.z {
                    cells.push(IVec3::new(x, through.y, z));
                }
            }
        }
        Axis::Z => {
            for x in lo.x..=hi.x {
                for y in lo.y..=hi.y {
                    cells.push(IVec3::new(x, y, through.z));
                }
            }
        }
    }
    cells
}

/// Axis-aligned solid box spanned by two corner cells, inclusive
pub fn box_cells(a: IVec3, b: IVec3) -> Vec<IVec3> {
    let lo = a.min(b);
    let hi = a.max(b);
    let mut cells = Vec::new();
    for x in lo.x..=hi.x {
        for y in lo.y..=hi.y {
            for z in lo.z..=hi.z {
                cells.push(IVec3::new(x, y, z));
            }
        }
    }
    cells
}

/// Cells of the straight segment between two cells, traced as a ray
/// walk between their centers and cut off once `to` is reached
pub fn line_cells(bounds: IBox3, transform: &Mat4, from: IVec3, to: IVec3) -> Vec<IVec3> {
    if from == to {
        return vec![from];
    }
    let a = transform.transform_point3(from.as_vec3() + 0.5);
    let b = transform.transform_point3(to.as_vec3() + 0.5);
    let ray = Ray::new(a, b - a);
    let mut cells = raycast::intersect(bounds, transform, &ray);
    if let Some(end) = cells.iter().position(|&c| c == to) {
        cells.truncate(end + 1);
    }
    cells
}

/// Extrusion of a surface: empty cells in the plane of `prev` whose
/// neighbor one step back toward the surface is opaque
///
/// `hit` is the surface cell the click landed on and `prev` the empty
/// cell in front of it; their difference is the extrusion direction.
/// The region grows 4-connected within the plane from `prev`.
pub fn extrude_cells(scene: &Scene, sprite: SpriteId, hit: IVec3, prev: IVec3) -> Vec<IVec3> {
    let dir = prev - hit;
    if dir.abs().element_sum() != 1 {
        return Vec::new();
    }
    let Some(bounds) = scene.sprite(sprite).map(|s| s.bounds()) else {
        return Vec::new();
    };

    // the two in-plane step directions
    let steps: Vec<IVec3> = [
        IVec3::X,
        IVec3::NEG_X,
        IVec3::Y,
        IVec3::NEG_Y,
        IVec3::Z,
        IVec3::NEG_Z,
    ]
    .into_iter()
    .filter(|d| d.dot(dir) == 0)
    .collect();

    let mut region = Vec::new();
    let mut seen = HashSet::new();
    let mut work = vec![prev];
    seen.insert(prev);
    while let Some(p) = work.pop() {
        region.push(p);
        for &d in &steps {
            let n = p + d;
            if bounds.contains(n)
                && scene.color_at(sprite, n).is_empty()
                && scene.color_at(sprite, n - dir).is_opaque()
                && seen.insert(n)
            {
                work.push(n);
            }
        }
    }
    region
}
