//! Target cell selection from a ray's cell walk
//!
//! Every click tool starts from the ordered list of cells a ray passes
//! through and reduces it to the one cell it acts on. The reductions
//! differ in how they treat the first opaque cell along the ray.

use crate::core::types::IVec3;
use crate::voxel::{Scene, SpriteId};

/// First cell along the walk that reads opaque, with its position in
/// the list
pub fn first_hit(scene: &Scene, sprite: SpriteId, cells: &[IVec3]) -> Option<(usize, IVec3)> {
    cells
        .iter()
        .enumerate()
        .find(|&(_, &c)| scene.color_at(sprite, c).is_opaque())
        .map(|(i, &c)| (i, c))
}

/// Cell a splat lands on: the empty cell just in front of the first
/// surface, or the far end of the walk when nothing is hit
///
/// A surface in the very first cell means the brush has nowhere to land
/// and the stroke is rejected.
pub fn splat_target(scene: &Scene, sprite: SpriteId, cells: &[IVec3]) -> Option<IVec3> {
    match first_hit(scene, sprite, cells) {
        Some((0, _)) => None,
        Some((i, _)) => Some(cells[i - 1]),
        None => cells.last().copied(),
    }
}

/// Cell anchoring a slab fill
///
/// Unlike splat, a surface in the first cell anchors the slab on that
/// cell rather than rejecting the click, and a miss anchors on the near
/// end of the walk.
pub fn slab_fill_pos(scene: &Scene, sprite: SpriteId, cells: &[IVec3]) -> Option<IVec3> {
    match first_hit(scene, sprite, cells) {
        Some((0, c)) => Some(c),
        Some((i, _)) => Some(cells[i - 1]),
        None => cells.first().copied(),
    }
}
