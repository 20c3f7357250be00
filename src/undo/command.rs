//! Undoable commands over scene sprites

use crate::core::types::IVec3;
use crate::voxel::{Color, PaletteIndex, Scene, Sprite, SpriteId};

/// One cell's worth of recorded (old, new) state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellEdit {
    pub at: IVec3,
    pub old_color: Color,
    pub new_color: Color,
    pub old_index: PaletteIndex,
    pub new_index: PaletteIndex,
}

/// Merge-eligibility key: command kind plus the stable edit target
///
/// Only set-voxel commands carry one, so only they ever merge, and only
/// with edits to the same layer of the same sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeKey {
    pub sprite: SpriteId,
    pub layer: usize,
}

/// An atomic, replayable edit
#[derive(Clone, Debug)]
pub enum Command {
    /// Per-cell edits on one layer of one sprite; mergeable
    SetVoxels {
        sprite: SpriteId,
        layer: usize,
        edits: Vec<CellEdit>,
    },
    /// Wholesale sprite replacement holding deep copies of both states;
    /// never merges
    ReplaceSprite {
        sprite: SpriteId,
        old: Box<Sprite>,
        new: Box<Sprite>,
    },
}

impl Command {
    pub fn merge_key(&self) -> Option<MergeKey> {
        match self {
            Command::SetVoxels { sprite, layer, .. } => Some(MergeKey {
                sprite: *sprite,
                layer: *layer,
            }),
            Command::ReplaceSprite { .. } => None,
        }
    }

    /// Apply the forward diffs in original order
    pub fn redo(&self, scene: &mut Scene) {
        match self {
            Command::SetVoxels { sprite, layer, edits } => {
                for e in edits {
                    scene.set_in_layer(*sprite, *layer, e.at, e.new_color, e.new_index);
                }
            }
            Command::ReplaceSprite { sprite, new, .. } => {
                scene.put_sprite(*sprite, (**new).clone());
            }
        }
    }

    /// Apply the inverse diffs in reverse order
    pub fn undo(&self, scene: &mut Scene) {
        match self {
            Command::SetVoxels { sprite, layer, edits } => {
                for e in edits.iter().rev() {
                    scene.set_in_layer(*sprite, *layer, e.at, e.old_color, e.old_index);
                }
            }
            Command::ReplaceSprite { sprite, old, .. } => {
                scene.put_sprite(*sprite, (**old).clone());
            }
        }
    }
}
