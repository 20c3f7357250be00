//! A positioned, independently sized grid within a sprite

use crate::core::types::IVec3;
use crate::math::IBox3;
use super::cell::{CellValue, Color, PaletteIndex};
use super::grid::VoxelGrid;
use super::scene::{PaletteId, PaletteStore};

/// Backing storage of a layer: direct RGBA cells or palette indices
#[derive(Clone, Debug, PartialEq)]
pub enum LayerCells {
    Rgb(VoxelGrid<Color>),
    Indexed(VoxelGrid<PaletteIndex>),
}

/// One layer of a sprite: a grid plus its integer offset in sprite space,
/// a visibility flag, a name, and (for indexed layers) a palette handle
///
/// Writing to a cell outside the current bounds grows the grid to include
/// it; the offset absorbs growth toward negative coordinates so existing
/// cells never move in sprite space.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    cells: LayerCells,
    offset: IVec3,
    name: String,
    visible: bool,
    palette: Option<PaletteId>,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            cells: LayerCells::Rgb(VoxelGrid::new(IVec3::ZERO)),
            offset: IVec3::ZERO,
            name: "layer".to_string(),
            visible: true,
            palette: None,
        }
    }
}

impl Layer {
    pub fn from_rgb(grid: VoxelGrid<Color>, offset: IVec3) -> Self {
        Self {
            cells: LayerCells::Rgb(grid),
            offset,
            ..Self::default()
        }
    }

    pub fn from_indexed(
        grid: VoxelGrid<PaletteIndex>,
        palette: Option<PaletteId>,
        offset: IVec3,
    ) -> Self {
        Self {
            cells: LayerCells::Indexed(grid),
            offset,
            palette,
            ..Self::default()
        }
    }

    pub fn cells(&self) -> &LayerCells {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut LayerCells {
        &mut self.cells
    }

    pub fn offset(&self) -> IVec3 {
        self.offset
    }

    pub fn set_offset(&mut self, o: IVec3) {
        self.offset = o;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, v: bool) {
        self.visible = v;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, n: impl Into<String>) {
        self.name = n.into();
    }

    pub fn palette(&self) -> Option<PaletteId> {
        self.palette
    }

    pub fn set_palette(&mut self, p: Option<PaletteId>) {
        self.palette = p;
    }

    /// Grid extents, independent of offset
    pub fn size(&self) -> IVec3 {
        match &self.cells {
            LayerCells::Rgb(g) => g.dim(),
            LayerCells::Indexed(g) => g.dim(),
        }
    }

    /// Inclusive cell bounds in sprite space; empty for a zero-size grid
    pub fn bounds(&self) -> IBox3 {
        IBox3::from_origin_size(self.offset, self.size())
    }

    /// Palette index at a sprite-space cell; the sentinel outside bounds
    /// or on an RGB layer
    pub fn index_at(&self, at: IVec3) -> PaletteIndex {
        if !self.bounds().contains(at) {
            return PaletteIndex::EMPTY;
        }
        match &self.cells {
            LayerCells::Indexed(g) => g.get(at - self.offset),
            LayerCells::Rgb(_) => PaletteIndex::EMPTY,
        }
    }

    /// Color at a sprite-space cell; transparent outside bounds, and on an
    /// indexed layer whose palette handle is unset or stale
    pub fn color_at(&self, at: IVec3, palettes: &PaletteStore) -> Color {
        if !self.bounds().contains(at) {
            return Color::TRANSPARENT;
        }
        match &self.cells {
            LayerCells::Rgb(g) => g.get(at - self.offset),
            LayerCells::Indexed(g) => match self.palette.and_then(|id| palettes.get(id)) {
                Some(pal) => pal.color(g.get(at - self.offset).0),
                None => Color::TRANSPARENT,
            },
        }
    }

    /// Write a cell, growing the grid in whatever direction is needed to
    /// include `at` first
    ///
    /// On an indexed layer an unspecified index is mapped through the
    /// palette's nearest match (0 with no palette attached).
    pub fn set(&mut self, at: IVec3, color: Color, index: PaletteIndex, palettes: &PaletteStore) {
        let mut target = self.bounds();
        target.extend_point(at);
        self.resize(target);

        let local = at - self.offset;
        match &mut self.cells {
            LayerCells::Rgb(g) => g.set(local, color),
            LayerCells::Indexed(g) => {
                let index = if index.0 < 0 {
                    match self.palette.and_then(|id| palettes.get(id)) {
                        Some(pal) => PaletteIndex(pal.best_match(color)),
                        None => PaletteIndex(0),
                    }
                } else {
                    index
                };
                g.set(local, index);
            }
        }
    }

    /// Expand or shrink to an explicit sprite-space box, preserving every
    /// cell that falls inside the new bounds
    pub fn resize(&mut self, new_box: IBox3) {
        if new_box.is_empty() {
            return;
        }
        let new_dim = new_box.size();

        if self.size().cmple(IVec3::ZERO).any() {
            // nothing stored yet - allocate fresh
            match &mut self.cells {
                LayerCells::Rgb(g) => *g = VoxelGrid::new(new_dim),
                LayerCells::Indexed(g) => *g = VoxelGrid::new(new_dim),
            }
            self.offset = new_box.min;
            return;
        }

        let cur = self.bounds();
        if cur == new_box {
            return;
        }
        // old local cell p sits at new local p + (cur.min - new.min)
        let shift = cur.min - new_box.min;
        match &mut self.cells {
            LayerCells::Rgb(g) => g.resize(new_dim, shift, Color::TRANSPARENT),
            LayerCells::Indexed(g) => g.resize(new_dim, shift, PaletteIndex::EMPTY),
        }
        self.offset = new_box.min;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::palette::Palette;

    fn store_with(pal: Palette) -> (PaletteStore, PaletteId) {
        let mut store = PaletteStore::default();
        let id = store.insert(pal);
        (store, id)
    }

    #[test]
    fn test_default_layer_is_empty() {
        let layer = Layer::default();
        assert!(layer.bounds().is_empty());
        assert_eq!(layer.color_at(IVec3::ZERO, &PaletteStore::default()), Color::TRANSPARENT);
    }

    #[test]
    fn test_set_grows_in_any_direction() {
        let store = PaletteStore::default();
        let mut layer = Layer::default();
        let red = Color::opaque(1.0, 0.0, 0.0);
        let blue = Color::opaque(0.0, 0.0, 1.0);

        layer.set(IVec3::new(2, 2, 2), red, PaletteIndex::EMPTY, &store);
        assert_eq!(layer.bounds().min, IVec3::splat(2));
        assert_eq!(layer.bounds().max, IVec3::splat(2));

        // growth toward negative coordinates keeps the old cell in place
        layer.set(IVec3::new(-1, 0, 2), blue, PaletteIndex::EMPTY, &store);
        assert_eq!(layer.bounds().min, IVec3::new(-1, 0, 2));
        assert_eq!(layer.bounds().max, IVec3::splat(2));
        assert_eq!(layer.color_at(IVec3::splat(2), &store), red);
        assert_eq!(layer.color_at(IVec3::new(-1, 0, 2), &store), blue);
        assert_eq!(layer.color_at(IVec3::new(0, 1, 2), &store), Color::TRANSPARENT);
    }

    #[test]
    fn test_indexed_layer_through_palette() {
        let (store, pal_id) = store_with(Palette::from_colors(
            "p",
            vec![
                Color::TRANSPARENT,
                Color::opaque(1.0, 0.0, 0.0),
                Color::opaque(0.0, 1.0, 0.0),
            ],
        ));
        let mut layer = Layer::from_indexed(VoxelGrid::new(IVec3::splat(2)), Some(pal_id), IVec3::ZERO);

        // explicit index wins
        layer.set(IVec3::ZERO, Color::TRANSPARENT, PaletteIndex(2), &store);
        assert_eq!(layer.index_at(IVec3::ZERO), PaletteIndex(2));
        assert_eq!(layer.color_at(IVec3::ZERO, &store), Color::opaque(0.0, 1.0, 0.0));

        // unspecified index resolves via best match
        layer.set(IVec3::ONE, Color::opaque(0.9, 0.05, 0.0), PaletteIndex::EMPTY, &store);
        assert_eq!(layer.index_at(IVec3::ONE), PaletteIndex(1));
    }

    #[test]
    fn test_indexed_layer_without_palette_reads_transparent() {
        let store = PaletteStore::default();
        let mut layer = Layer::from_indexed(VoxelGrid::new(IVec3::splat(2)), None, IVec3::ZERO);
        layer.set(IVec3::ZERO, Color::opaque(1.0, 1.0, 1.0), PaletteIndex(1), &store);
        assert_eq!(layer.index_at(IVec3::ZERO), PaletteIndex(1));
        assert_eq!(layer.color_at(IVec3::ZERO, &store), Color::TRANSPARENT);
    }

    #[test]
    fn test_resize_to_explicit_box() {
        let store = PaletteStore::default();
        let mut layer = Layer::default();
        let red = Color::opaque(1.0, 0.0, 0.0);
        layer.set(IVec3::ZERO, red, PaletteIndex::EMPTY, &store);

        layer.resize(IBox3::new(IVec3::splat(-2), IVec3::splat(2)));
        assert_eq!(layer.offset(), IVec3::splat(-2));
        assert_eq!(layer.size(), IVec3::splat(5));
        assert_eq!(layer.color_at(IVec3::ZERO, &store), red);

        // shrinking away from the content drops it
        layer.resize(IBox3::new(IVec3::ONE, IVec3::splat(2)));
        assert_eq!(layer.color_at(IVec3::ZERO, &store), Color::TRANSPARENT);
    }
}
