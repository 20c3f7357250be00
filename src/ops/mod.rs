//! Structural edits: resize, resample, shift, mirror, rotate
//!
//! These reshape whole layers rather than single cells. Except for
//! shift, which records per-cell edits, each op snapshots the sprite
//! before and after so undo restores geometry exactly.

use log::{debug, warn};

pub use crate::tools::Axis;

use crate::core::types::IVec3;
use crate::math::IBox3;
use crate::undo::UndoManager;
use crate::voxel::{
    CellValue, Color, Layer, LayerCells, PaletteIndex, Scene, SpriteId, VoxelGrid,
};

/// Resize the current layer of a sprite to an explicit box
pub fn resize_bounds(scene: &mut Scene, undo: &mut UndoManager, id: SpriteId, new_box: IBox3) {
    with_current_layer(scene, undo, id, |layer| {
        layer.resize(new_box);
    });
}

/// Resample every layer of a sprite by a uniform scale factor
///
/// Each occupied cell is replicated into the block of cells it covers at
/// the new resolution; downscaling keeps whichever source cell lands on
/// a target last. Layer offsets and the model translation scale along so
/// the sprite stays put in world space.
pub fn rerez(scene: &mut Scene, undo: &mut UndoManager, id: SpriteId, scale: f32) {
    if scale <= 0.0 {
        warn!("rerez with non-positive scale {scale}");
        return;
    }
    let Some(mut sprite) = scene.sprite(id).cloned() else {
        debug!("rerez on stale handle {id:?}");
        return;
    };

    let mut any = false;
    for i in 0..sprite.layer_count() {
        if let Some(layer) = sprite.layer_mut(i) {
            if rerez_layer(layer, scale) {
                any = true;
            }
        }
    }
    if !any {
        return;
    }

    let mut m = sprite.transform();
    m.w_axis.x *= scale;
    m.w_axis.y *= scale;
    m.w_axis.z *= scale;
    sprite.set_transform(m);

    undo.replace_sprite(scene, id, sprite);
}

fn rerez_layer(layer: &mut Layer, scale: f32) -> bool {
    let dim = layer.size();
    let new_dim = (dim.as_vec3() * scale).as_ivec3();
    if new_dim.cmple(IVec3::ZERO).any() {
        return false;
    }
    let reps = scale.ceil().max(1.0) as i32;
    let scaled = |p: IVec3| (p.as_vec3() * scale).as_ivec3();

    match layer.cells_mut() {
        LayerCells::Rgb(g) => *g = rerez_grid(g, new_dim, reps, scaled),
        LayerCells::Indexed(g) => *g = rerez_grid(g, new_dim, reps, scaled),
    }
    layer.set_offset(scaled(layer.offset()));
    true
}

fn rerez_grid<T: CellValue>(
    grid: &VoxelGrid<T>,
    new_dim: IVec3,
    reps: i32,
    scaled: impl Fn(IVec3) -> IVec3,
) -> VoxelGrid<T> {
    let mut next = VoxelGrid::new(new_dim);
    let dim = grid.dim();
    for x in 0..dim.x {
        for y in 0..dim.y {
            for z in 0..dim.z {
                let v = grid.get(IVec3::new(x, y, z));
                if v.is_empty() {
                    continue;
                }
                let base = scaled(IVec3::new(x, y, z));
                for xx in 0..reps {
                    for yy in 0..reps {
                        for zz in 0..reps {
                            next.set(base + IVec3::new(xx, yy, zz), v);
                        }
                    }
                }
            }
        }
    }
    next
}

/// Shift the current layer's contents one cell along an axis
///
/// Cells pushed past the layer bounds are dropped, or fed back in on the
/// opposite side when `wrap` is set. Recorded as one undo step.
pub fn shift(
    scene: &mut Scene,
    undo: &mut UndoManager,
    id: SpriteId,
    axis: Axis,
    up: bool,
    wrap: bool,
) {
    let Some(layer) = scene.sprite(id).and_then(|s| s.cur_layer_index()) else {
        debug!("shift without an edit target on {id:?}");
        return;
    };
    let bounds = match scene.sprite(id).and_then(|s| s.layer(layer)) {
        Some(l) => l.bounds(),
        None => return,
    };
    if bounds.is_empty() {
        return;
    }
    let delta = axis.unit() * if up { 1 } else { -1 };

    // snapshot first so the write order cannot matter
    let mut old = std::collections::HashMap::new();
    for p in box_iter(bounds) {
        old.insert(
            p,
            (
                scene.layer_color_at(id, layer, p),
                scene.layer_index_at(id, layer, p),
            ),
        );
    }
    let read = |p: IVec3| old.get(&p).copied().unwrap_or((Color::TRANSPARENT, PaletteIndex::EMPTY));

    undo.begin_macro("Shift");
    for p in box_iter(bounds) {
        let mut src = p - delta;
        if wrap && !bounds.contains(src) {
            let a = axis.index();
            src[a] = if up { bounds.max[a] } else { bounds.min[a] };
        }
        let (color, index) = read(src);
        let (cur_c, cur_i) = read(p);
        if color != cur_c || index != cur_i {
            undo.set_voxel(scene, id, p, color, index);
        }
    }
    undo.end_macro();
}

/// Mirror the current layer in place across the mid-plane of an axis
pub fn mirror(scene: &mut Scene, undo: &mut UndoManager, id: SpriteId, axis: Axis) {
    with_current_layer(scene, undo, id, |layer| {
        let dim = layer.size();
        let a = axis.index();
        let remap = move |p: IVec3| {
            let mut q = p;
            q[a] = dim[a] - 1 - p[a];
            q
        };
        match layer.cells_mut() {
            LayerCells::Rgb(g) => *g = remap_grid(g, dim, remap),
            LayerCells::Indexed(g) => *g = remap_grid(g, dim, remap),
        }
    });
}

/// Rotate the current layer a quarter turn about an axis
///
/// The two perpendicular dimensions swap; the layer stays anchored at
/// its offset corner. Rotation runs counter-clockwise looking down the
/// axis from its positive end.
pub fn rotate(scene: &mut Scene, undo: &mut UndoManager, id: SpriteId, axis: Axis) {
    with_current_layer(scene, undo, id, |layer| {
        let dim = layer.size();
        let (u, v) = match axis {
            Axis::X => (1, 2),
            Axis::Y => (0, 2),
            Axis::Z => (0, 1),
        };
        let mut new_dim = dim;
        new_dim[u] = dim[v];
        new_dim[v] = dim[u];
        let remap = move |p: IVec3| {
            let mut q = p;
            q[u] = p[v];
            q[v] = dim[v] - 1 - p[u];
            q
        };
        match layer.cells_mut() {
            LayerCells::Rgb(g) => *g = remap_grid(g, new_dim, remap),
            LayerCells::Indexed(g) => *g = remap_grid(g, new_dim, remap),
        }
    });
}

/// New grid of `new_dim` where cell `p` reads the source at `remap(p)`
fn remap_grid<T: CellValue>(
    grid: &VoxelGrid<T>,
    new_dim: IVec3,
    remap: impl Fn(IVec3) -> IVec3,
) -> VoxelGrid<T> {
    let mut next = VoxelGrid::new(new_dim);
    for x in 0..new_dim.x {
        for y in 0..new_dim.y {
            for z in 0..new_dim.z {
                let p = IVec3::new(x, y, z);
                next.set(p, grid.get(remap(p)));
            }
        }
    }
    next
}

fn box_iter(b: IBox3) -> impl Iterator<Item = IVec3> {
    (b.min.x..=b.max.x).flat_map(move |x| {
        (b.min.y..=b.max.y)
            .flat_map(move |y| (b.min.z..=b.max.z).map(move |z| IVec3::new(x, y, z)))
    })
}

/// Apply an edit to the sprite's current layer and record it as one
/// sprite replacement
fn with_current_layer(
    scene: &mut Scene,
    undo: &mut UndoManager,
    id: SpriteId,
    edit: impl FnOnce(&mut Layer),
) {
    let Some(mut sprite) = scene.sprite(id).cloned() else {
        debug!("layer op on stale handle {id:?}");
        return;
    };
    let Some(layer) = sprite.cur_layer_mut() else {
        debug!("layer op without an edit target on {id:?}");
        return;
    };
    edit(layer);
    undo.replace_sprite(scene, id, sprite);
}
