//! Interchange boundary
//!
//! File formats never see the in-memory model directly. They exchange
//! `RasterGrid`, a dense color raster in a fixed scan order, and the
//! loaders here build scene objects from it.

pub mod mesh;

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{IVec3, Mat4, Vec3};
use crate::undo::UndoManager;
use crate::voxel::{Color, Layer, Scene, Sprite, SpriteId, VoxelGrid};

/// Dense color raster in interchange scan order
///
/// The scan runs top row first: y descending, then z, then x fastest.
/// Cell count always equals the product of the dimensions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RasterGrid {
    dim: IVec3,
    cells: Vec<Color>,
}

/// Cell positions of `dim` in interchange scan order
pub fn raster_order(dim: IVec3) -> impl Iterator<Item = IVec3> {
    (0..dim.y).rev().flat_map(move |y| {
        (0..dim.z).flat_map(move |z| (0..dim.x).map(move |x| IVec3::new(x, y, z)))
    })
}

impl RasterGrid {
    pub fn new(dim: IVec3, cells: Vec<Color>) -> crate::core::types::Result<Self> {
        let expected = (dim.x.max(0) * dim.y.max(0) * dim.z.max(0)) as usize;
        if cells.len() != expected {
            return Err(Error::RasterSize { expected, got: cells.len() });
        }
        Ok(Self { dim, cells })
    }

    pub fn dim(&self) -> IVec3 {
        self.dim
    }

    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    /// Serialize a grid's cells into interchange order
    pub fn from_grid(grid: &VoxelGrid<Color>) -> Self {
        let dim = grid.dim();
        let cells = raster_order(dim).map(|p| grid.get(p)).collect();
        Self { dim, cells }
    }

    /// Rebuild a grid from the raster, leaving the transform identity
    pub fn to_grid(&self) -> VoxelGrid<Color> {
        let mut grid = VoxelGrid::new(self.dim);
        for (p, &c) in raster_order(self.dim).zip(&self.cells) {
            grid.set(p, c);
        }
        grid
    }
}

/// Model transform that stands a freshly loaded grid on the ground
/// plane, centered on the world origin in x and z
pub fn centered_transform(dim: IVec3) -> Mat4 {
    Mat4::from_translation(Vec3::new(
        -((dim.x / 2) as f32),
        0.0,
        -((dim.z / 2) as f32),
    ))
}

/// Replace the scene's contents with a freshly loaded sprite
///
/// Loading is not an edit: the undo history is dropped and the new
/// document starts clean.
pub fn load_sprite(
    scene: &mut Scene,
    undo: &mut UndoManager,
    name: &str,
    raster: &RasterGrid,
) -> SpriteId {
    let mut layer = Layer::from_rgb(raster.to_grid(), IVec3::ZERO);
    layer.set_name(name);
    let mut sprite = Sprite::from_layer(name, layer);
    sprite.set_transform(centered_transform(raster.dim()));

    for id in scene.sprite_ids().collect::<Vec<_>>() {
        scene.remove_sprite(id);
    }
    let id = scene.add_sprite(sprite);
    undo.clear();
    info!("loaded sprite '{name}' ({} cells)", raster.cells().len());
    id
}
