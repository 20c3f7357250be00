//! Paint tools
//!
//! A tool turns a pick ray plus the active color into a set of cell
//! writes, recorded through the undo stack. Each tool is a small state
//! machine: most complete in one click, the line and box tools anchor
//! on the first click and commit on the second.

pub mod shapes;
pub mod targets;

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Vec3};
use crate::math::Ray;
use crate::undo::UndoManager;
use crate::voxel::{CellValue, Color, PaletteIndex, Scene, SpriteId};

/// A grid axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> IVec3 {
        match self {
            Axis::X => IVec3::X,
            Axis::Y => IVec3::Y,
            Axis::Z => IVec3::Z,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes spanning the plane perpendicular to this one
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// The available paint tools
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Splat,
    Replace,
    Flood,
    Eraser,
    Slab,
    Ray,
    Line,
    Box,
    Extrude,
    Dropper,
}

impl ToolKind {
    /// Clicks a full gesture takes
    pub fn clicks(self) -> u32 {
        match self {
            ToolKind::Line | ToolKind::Box => 2,
            _ => 1,
        }
    }

    /// Whether dragging repeats the tool at each cell the cursor crosses
    pub fn supports_drag(self) -> bool {
        matches!(
            self,
            ToolKind::Splat
                | ToolKind::Replace
                | ToolKind::Flood
                | ToolKind::Eraser
                | ToolKind::Slab
        )
    }

    /// Undo step name for a multi-cell application
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Splat => "Splat",
            ToolKind::Replace => "Replace",
            ToolKind::Flood => "Flood Fill",
            ToolKind::Eraser => "Erase",
            ToolKind::Slab => "Fill Slice",
            ToolKind::Ray => "Ray",
            ToolKind::Line => "Line",
            ToolKind::Box => "Box",
            ToolKind::Extrude => "Extrude",
            ToolKind::Dropper => "Dropper",
        }
    }
}

/// Pointer button driving a click
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Left,
    Middle,
    Right,
}

/// Keyboard modifiers held during a click
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
}

/// Tool actually applied for a click, given the selected tool and the
/// input chord
///
/// Middle always samples, right always erases, and control-left swaps
/// in replace. Everything else runs the selected tool.
pub fn effective_tool(active: ToolKind, button: Button, mods: Modifiers) -> ToolKind {
    match button {
        Button::Middle => ToolKind::Dropper,
        Button::Right => ToolKind::Eraser,
        Button::Left if mods.control => ToolKind::Replace,
        Button::Left => active,
    }
}

/// One in-flight tool application
#[derive(Clone, Debug)]
pub struct Tool {
    kind: ToolKind,
    sprite: SpriteId,
    ray: Ray,
    color: Color,
    index: PaletteIndex,
    axis: Axis,
    anchor: Option<IVec3>,
    clicks_remain: u32,
}

impl Tool {
    pub fn new(kind: ToolKind, sprite: SpriteId) -> Self {
        Self {
            kind,
            sprite,
            ray: Ray::new(Vec3::ZERO, Vec3::NEG_Z),
            color: Color::TRANSPARENT,
            index: PaletteIndex::EMPTY,
            axis: Axis::default(),
            anchor: None,
            clicks_remain: kind.clicks(),
        }
    }

    /// Update the pick ray and active color ahead of a click or preview
    pub fn set_input(&mut self, ray: Ray, color: Color, index: PaletteIndex) {
        self.ray = ray;
        self.color = color;
        self.index = index;
    }

    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn sprite(&self) -> SpriteId {
        self.sprite
    }

    /// Anchor cell of a half-finished two-click gesture
    pub fn anchor(&self) -> Option<IVec3> {
        self.anchor
    }

    pub fn supports_drag(&self) -> bool {
        self.kind.supports_drag()
    }

    /// Cells the tool would write with the current input, for previews
    pub fn voxels_affected(&self, scene: &Scene) -> Vec<IVec3> {
        let Some(sprite) = scene.sprite(self.sprite) else {
            return Vec::new();
        };
        let walk = sprite.intersect_ray(&self.ray);
        match self.kind {
            ToolKind::Splat => targets::splat_target(scene, self.sprite, &walk)
                .into_iter()
                .collect(),
            ToolKind::Replace => match targets::first_hit(scene, self.sprite, &walk) {
                // repainting a cell its own color would record a no-op
                Some((_, hit)) if scene.color_at(self.sprite, hit) != self.color => vec![hit],
                _ => Vec::new(),
            },
            ToolKind::Flood => {
                let Some((_, hit)) = targets::first_hit(scene, self.sprite, &walk) else {
                    return Vec::new();
                };
                if scene.color_at(self.sprite, hit) == self.color {
                    return Vec::new();
                }
                shapes::flood_cells(scene, self.sprite, hit)
            }
            ToolKind::Eraser | ToolKind::Dropper => {
                match targets::first_hit(scene, self.sprite, &walk) {
                    Some((_, hit)) => vec![hit],
                    None => Vec::new(),
                }
            }
            ToolKind::Slab => match targets::slab_fill_pos(scene, self.sprite, &walk) {
                Some(pos) => shapes::slab_cells(sprite.bounds(), self.axis, pos),
                None => Vec::new(),
            },
            ToolKind::Ray => walk,
            ToolKind::Line => match (self.anchor, targets::splat_target(scene, self.sprite, &walk))
            {
                (Some(a), Some(t)) => shapes::line_cells(sprite.bounds(), &sprite.transform(), a, t),
                (None, Some(t)) => vec![t],
                _ => Vec::new(),
            },
            ToolKind::Box => match (self.anchor, targets::splat_target(scene, self.sprite, &walk))
            {
                (Some(a), Some(t)) => shapes::box_cells(a, t),
                (None, Some(t)) => vec![t],
                _ => Vec::new(),
            },
            ToolKind::Extrude => match targets::first_hit(scene, self.sprite, &walk) {
                Some((i, hit)) if i > 0 => {
                    shapes::extrude_cells(scene, self.sprite, hit, walk[i - 1])
                }
                _ => Vec::new(),
            },
        }
    }

    /// Apply one click, writing cells through the undo stack
    ///
    /// Only the dropper returns a value: the sampled color and palette
    /// index. A first click of a two-click gesture just records the
    /// anchor. Clicks whose cell set comes up empty do nothing.
    pub fn execute(
        &mut self,
        scene: &mut Scene,
        undo: &mut UndoManager,
    ) -> Option<(Color, PaletteIndex)> {
        if self.kind == ToolKind::Dropper {
            let walk = scene.sprite(self.sprite)?.intersect_ray(&self.ray);
            let (_, hit) = targets::first_hit(scene, self.sprite, &walk)?;
            return Some((
                scene.color_at(self.sprite, hit),
                scene.index_at(self.sprite, hit),
            ));
        }

        if self.kind.clicks() == 2 && self.anchor.is_none() {
            let walk = scene.sprite(self.sprite)?.intersect_ray(&self.ray);
            if let Some(a) = targets::splat_target(scene, self.sprite, &walk) {
                self.anchor = Some(a);
                self.clicks_remain -= 1;
            }
            return None;
        }

        let cells = self.voxels_affected(scene);
        self.apply(scene, undo, &cells);

        self.clicks_remain = self.clicks_remain.saturating_sub(1);
        if self.clicks_remain == 0 {
            // gesture finished, re-arm for the next one
            self.anchor = None;
            self.clicks_remain = self.kind.clicks();
        }
        None
    }

    fn apply(&self, scene: &mut Scene, undo: &mut UndoManager, cells: &[IVec3]) {
        if cells.is_empty() {
            return;
        }
        let (color, index) = if self.kind == ToolKind::Eraser {
            (Color::TRANSPARENT, PaletteIndex::EMPTY)
        } else {
            (self.color, self.index)
        };
        if cells.len() == 1 {
            undo.set_voxel(scene, self.sprite, cells[0], color, index);
            return;
        }
        undo.begin_macro(self.kind.name());
        for &c in cells {
            undo.set_voxel(scene, self.sprite, c, color, index);
        }
        undo.end_macro();
    }
}
