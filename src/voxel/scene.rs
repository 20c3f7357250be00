//! Scene arena: stable handles for sprites and palettes
//!
//! Undo commands and tools refer to sprites by `SpriteId`, never by
//! reference, so an undo step can wholesale replace a sprite without
//! dangling anything. Slots are never reused within a session; looking up
//! a removed or stale handle yields `None` and mutation paths treat that
//! as a no-op.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::types::IVec3;
use super::cell::{CellValue, Color, PaletteIndex};
use super::palette::Palette;
use super::sprite::Sprite;

/// Stable handle to a sprite in the scene
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

/// Stable handle to a palette in the scene
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaletteId(pub u32);

/// Arena of palettes
#[derive(Clone, Debug, Default)]
pub struct PaletteStore {
    slots: Vec<Option<Palette>>,
}

impl PaletteStore {
    pub fn insert(&mut self, palette: Palette) -> PaletteId {
        self.slots.push(Some(palette));
        PaletteId(self.slots.len() as u32 - 1)
    }

    pub fn get(&self, id: PaletteId) -> Option<&Palette> {
        self.slots.get(id.0 as usize).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, id: PaletteId) -> Option<&mut Palette> {
        self.slots.get_mut(id.0 as usize).and_then(|s| s.as_mut())
    }

    pub fn remove(&mut self, id: PaletteId) -> Option<Palette> {
        self.slots.get_mut(id.0 as usize).and_then(|s| s.take())
    }
}

/// The whole editable scene: sprites plus shared palettes
#[derive(Clone, Debug, Default)]
pub struct Scene {
    sprites: Vec<Option<Sprite>>,
    pub palettes: PaletteStore,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> SpriteId {
        self.sprites.push(Some(sprite));
        SpriteId(self.sprites.len() as u32 - 1)
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id.0 as usize).and_then(|s| s.as_ref())
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(id.0 as usize).and_then(|s| s.as_mut())
    }

    pub fn remove_sprite(&mut self, id: SpriteId) -> Option<Sprite> {
        self.sprites.get_mut(id.0 as usize).and_then(|s| s.take())
    }

    /// Replace a sprite wholesale, keeping its handle; no-op on a stale
    /// handle (the slot stays empty)
    pub fn put_sprite(&mut self, id: SpriteId, sprite: Sprite) {
        match self.sprites.get_mut(id.0 as usize) {
            Some(slot) if slot.is_some() => *slot = Some(sprite),
            _ => debug!("put_sprite on stale handle {id:?}"),
        }
    }

    /// Live sprite handles in insertion order
    pub fn sprite_ids(&self) -> impl Iterator<Item = SpriteId> + '_ {
        self.sprites
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| SpriteId(i as u32))
    }

    /// Composited color at a cell of a sprite; transparent for stale
    /// handles
    pub fn color_at(&self, id: SpriteId, at: IVec3) -> Color {
        self.sprite(id)
            .map_or(Color::TRANSPARENT, |s| s.color_at(at, &self.palettes))
    }

    /// Current-layer palette index at a cell; sentinel for stale handles
    pub fn index_at(&self, id: SpriteId, at: IVec3) -> PaletteIndex {
        self.sprite(id)
            .map_or(PaletteIndex::EMPTY, |s| s.index_at(at))
    }

    /// Color stored on one specific layer of a sprite
    pub fn layer_color_at(&self, id: SpriteId, layer: usize, at: IVec3) -> Color {
        self.sprite(id)
            .and_then(|s| s.layer(layer))
            .map_or(Color::TRANSPARENT, |l| l.color_at(at, &self.palettes))
    }

    /// Palette index stored on one specific layer of a sprite
    pub fn layer_index_at(&self, id: SpriteId, layer: usize, at: IVec3) -> PaletteIndex {
        self.sprite(id)
            .and_then(|s| s.layer(layer))
            .map_or(PaletteIndex::EMPTY, |l| l.index_at(at))
    }

    /// Write a cell on one specific layer of a sprite, bypassing the
    /// current-layer selection; used by undo commands when they replay
    pub fn set_in_layer(
        &mut self,
        id: SpriteId,
        layer: usize,
        at: IVec3,
        color: Color,
        index: PaletteIndex,
    ) {
        let Scene { sprites, palettes } = self;
        let target = sprites
            .get_mut(id.0 as usize)
            .and_then(|s| s.as_mut())
            .and_then(|s| s.layer_mut(layer));
        match target {
            Some(l) => l.set(at, color, index, palettes),
            None => debug!("set_in_layer on stale target {id:?}/{layer}"),
        }
    }
}
