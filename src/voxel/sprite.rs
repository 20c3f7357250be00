//! A sprite: an ordered stack of layers forming one editable object

use crate::core::types::{IVec3, Mat4, Vec3};
use crate::math::{Aabb, IBox3, Ray};
use super::cell::{CellValue, Color, PaletteIndex};
use super::layer::Layer;
use super::scene::PaletteStore;

/// An ordered stack of layers plus a local-to-world transform
///
/// Layer 0 is the top of the stack; reads composite top-to-bottom and the
/// first non-transparent color wins. Writes go to the current layer only.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    name: String,
    transform: Mat4,
    layers: Vec<Layer>,
    cur_layer: Option<usize>,
}

impl Sprite {
    /// Sprite with no layers and no edit target
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            layers: Vec::new(),
            cur_layer: None,
        }
    }

    /// Sprite with a single empty RGB layer covering `[0, size)`
    pub fn with_size(name: impl Into<String>, size: IVec3) -> Self {
        let mut layer = Layer::default();
        layer.resize(IBox3::from_origin_size(IVec3::ZERO, size));
        layer.set_name("main layer");
        Self::from_layer(name, layer)
    }

    /// Sprite wrapping one existing layer as the edit target
    pub fn from_layer(name: impl Into<String>, layer: Layer) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            layers: vec![layer],
            cur_layer: Some(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, n: impl Into<String>) {
        self.name = n.into();
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, m: Mat4) {
        self.transform = m;
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, i: usize) -> Option<&Layer> {
        self.layers.get(i)
    }

    pub fn layer_mut(&mut self, i: usize) -> Option<&mut Layer> {
        self.layers.get_mut(i)
    }

    pub fn cur_layer_index(&self) -> Option<usize> {
        self.cur_layer
    }

    /// Select the edit target; out-of-range indices clear it
    pub fn set_cur_layer(&mut self, i: Option<usize>) {
        self.cur_layer = i.filter(|&i| i < self.layers.len());
    }

    pub fn cur_layer(&self) -> Option<&Layer> {
        self.cur_layer.and_then(|i| self.layers.get(i))
    }

    pub fn cur_layer_mut(&mut self) -> Option<&mut Layer> {
        match self.cur_layer {
            Some(i) => self.layers.get_mut(i),
            None => None,
        }
    }

    /// Insert a layer at position `i` (pushing what was there down); the
    /// current-layer index tracks its layer
    pub fn insert_layer(&mut self, i: usize, layer: Layer) {
        let i = i.min(self.layers.len());
        self.layers.insert(i, layer);
        if let Some(cur) = &mut self.cur_layer {
            if *cur >= i {
                *cur += 1;
            }
        } else {
            self.cur_layer = Some(i);
        }
    }

    /// Remove a layer; the current-layer index is adjusted to stay on the
    /// same layer where possible
    pub fn delete_layer(&mut self, i: usize) {
        if i >= self.layers.len() {
            return;
        }
        self.layers.remove(i);
        if let Some(cur) = self.cur_layer {
            if self.layers.is_empty() {
                self.cur_layer = None;
            } else if cur > i {
                self.cur_layer = Some(cur - 1);
            } else if cur >= self.layers.len() {
                self.cur_layer = Some(self.layers.len() - 1);
            }
        }
    }

    pub fn layer_visible(&self, i: usize) -> bool {
        self.layers.get(i).is_some_and(|l| l.is_visible())
    }

    pub fn layer_name(&self, i: usize) -> &str {
        self.layers.get(i).map_or("", |l| l.name())
    }

    /// Union of all layer bounds; resizing one layer never moves another
    pub fn bounds(&self) -> IBox3 {
        let mut out = IBox3::EMPTY;
        for layer in &self.layers {
            out.extend_box(&layer.bounds());
        }
        out
    }

    /// Composited color at a sprite-space cell: topmost visible
    /// non-transparent layer wins
    pub fn color_at(&self, at: IVec3, palettes: &PaletteStore) -> Color {
        for layer in &self.layers {
            if !layer.is_visible() {
                continue;
            }
            let c = layer.color_at(at, palettes);
            if c.a != 0.0 {
                return c;
            }
        }
        Color::TRANSPARENT
    }

    /// Palette index at a cell of the current layer
    pub fn index_at(&self, at: IVec3) -> PaletteIndex {
        self.cur_layer()
            .map_or(PaletteIndex::EMPTY, |l| l.index_at(at))
    }

    /// Write to the current layer; no-op without one
    pub fn set(&mut self, at: IVec3, color: Color, index: PaletteIndex, palettes: &PaletteStore) {
        if let Some(i) = self.cur_layer {
            if let Some(layer) = self.layers.get_mut(i) {
                layer.set(at, color, index, palettes);
            }
        }
    }

    /// Center of a cell in sprite-local space
    pub fn voxel_center(at: IVec3) -> Vec3 {
        at.as_vec3() + Vec3::splat(0.5)
    }

    /// World transform of one voxel of this sprite
    pub fn voxel_transform(&self, at: IVec3) -> Mat4 {
        self.transform * Mat4::from_translation(Self::voxel_center(at))
    }

    /// World-space box enclosing all layers
    pub fn world_bounds(&self) -> Aabb {
        let b = self.bounds();
        if b.is_empty() {
            return Aabb::default();
        }
        Aabb::new(b.min.as_vec3(), (b.max + IVec3::ONE).as_vec3()).transformed(&self.transform)
    }

    /// Ordered near-to-far cells along a world ray through this sprite's
    /// bounds
    pub fn intersect_ray(&self, ray: &Ray) -> Vec<IVec3> {
        crate::raycast::intersect(self.bounds(), &self.transform, ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::scene::PaletteStore;

    fn colored_layer(at: IVec3, color: Color) -> Layer {
        let mut layer = Layer::default();
        layer.set(at, color, PaletteIndex::EMPTY, &PaletteStore::default());
        layer
    }

    #[test]
    fn test_compositing_top_wins() {
        let store = PaletteStore::default();
        let red = Color::opaque(1.0, 0.0, 0.0);
        let blue = Color::opaque(0.0, 0.0, 1.0);

        let mut sprite = Sprite::from_layer("s", colored_layer(IVec3::ZERO, blue));
        sprite.insert_layer(0, colored_layer(IVec3::ZERO, red));

        assert_eq!(sprite.layer_count(), 2);
        assert_eq!(sprite.color_at(IVec3::ZERO, &store), red);
    }

    #[test]
    fn test_invisible_layer_skipped() {
        let store = PaletteStore::default();
        let red = Color::opaque(1.0, 0.0, 0.0);
        let blue = Color::opaque(0.0, 0.0, 1.0);

        let mut sprite = Sprite::from_layer("s", colored_layer(IVec3::ZERO, blue));
        sprite.insert_layer(0, colored_layer(IVec3::ZERO, red));
        if let Some(l) = sprite.layer_mut(0) {
            l.set_visible(false);
        }

        assert_eq!(sprite.color_at(IVec3::ZERO, &store), blue);
    }

    #[test]
    fn test_insert_tracks_current_layer() {
        let mut sprite = Sprite::with_size("s", IVec3::splat(2));
        assert_eq!(sprite.cur_layer_index(), Some(0));

        sprite.insert_layer(0, Layer::default());
        // the original edit target moved down
        assert_eq!(sprite.cur_layer_index(), Some(1));

        sprite.delete_layer(0);
        assert_eq!(sprite.cur_layer_index(), Some(0));
    }

    #[test]
    fn test_delete_last_layer() {
        let mut sprite = Sprite::with_size("s", IVec3::splat(2));
        sprite.delete_layer(0);
        assert_eq!(sprite.layer_count(), 0);
        assert_eq!(sprite.cur_layer_index(), None);

        // editing without a target is a no-op
        sprite.set(
            IVec3::ZERO,
            Color::opaque(1.0, 1.0, 1.0),
            PaletteIndex::EMPTY,
            &PaletteStore::default(),
        );
        assert!(sprite.bounds().is_empty());
    }

    #[test]
    fn test_bounds_union() {
        let blue = Color::opaque(0.0, 0.0, 1.0);
        let mut sprite = Sprite::from_layer("s", colored_layer(IVec3::splat(-2), blue));
        sprite.insert_layer(0, colored_layer(IVec3::splat(3), blue));

        let b = sprite.bounds();
        assert_eq!(b.min, IVec3::splat(-2));
        assert_eq!(b.max, IVec3::splat(3));
    }
}
