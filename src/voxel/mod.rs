//! The editable voxel model: cell values, grids, palettes, layers,
//! sprites, and the scene arena that hands out stable handles to them.

pub mod cell;
pub mod grid;
pub mod layer;
pub mod palette;
pub mod scene;
pub mod sprite;

pub use cell::{CellValue, Color, PaletteIndex};
pub use grid::VoxelGrid;
pub use layer::{Layer, LayerCells};
pub use palette::Palette;
pub use scene::{PaletteId, PaletteStore, Scene, SpriteId};
pub use sprite::Sprite;
