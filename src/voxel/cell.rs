//! Cell value types stored in voxel grids

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A value a grid cell can hold
///
/// Out-of-bounds reads and erased cells resolve to `EMPTY`; tools use
/// `is_empty` as the opacity test when scanning a ray.
pub trait CellValue: Copy + PartialEq {
    /// The out-of-bounds / erased sentinel
    const EMPTY: Self;

    /// True when the cell reads as unoccupied
    fn is_empty(&self) -> bool;
}

/// RGBA color with 0-1 float channels - 16 bytes, uploadable as-is
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// The empty cell sentinel
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color
    pub fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Anything with nonzero alpha counts as a surface
    pub fn is_opaque(&self) -> bool {
        self.a != 0.0
    }

    /// Squared RGBA distance, the palette matching metric
    pub fn diff(&self, other: &Color) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        let da = self.a - other.a;
        dr * dr + dg * dg + db * db + da * da
    }
}

impl CellValue for Color {
    const EMPTY: Color = Color::TRANSPARENT;

    fn is_empty(&self) -> bool {
        self.a == 0.0
    }
}

/// Index into a palette; negative marks an empty cell
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct PaletteIndex(pub i32);

impl CellValue for PaletteIndex {
    const EMPTY: PaletteIndex = PaletteIndex(-1);

    fn is_empty(&self) -> bool {
        self.0 < 0
    }
}

impl Default for PaletteIndex {
    fn default() -> Self {
        Self::EMPTY
    }
}
