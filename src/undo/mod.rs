//! Linear undo stack with macro grouping and adjacent-command merging
//!
//! The only sanctioned mutation path for voxel cells. Each user-visible
//! step is an `UndoUnit`: either one command, a merged run of compatible
//! set-voxel commands, or everything bracketed by one macro.

pub mod command;

pub use command::{CellEdit, Command, MergeKey};

use log::{debug, warn};

use crate::core::types::IVec3;
use crate::voxel::{Color, PaletteIndex, Scene, Sprite, SpriteId};

/// One undo/redo step: a named, ordered list of commands
#[derive(Clone, Debug)]
struct UndoUnit {
    name: String,
    commands: Vec<Command>,
    /// Closed macros never accept merges, however compatible
    is_macro: bool,
}

/// The undo stack
///
/// `index` counts currently applied units; units past it are the redo
/// history. `clean_index` marks the stack position matching the on-disk
/// document; it is `None` once that position has been truncated away.
#[derive(Debug)]
pub struct UndoManager {
    units: Vec<UndoUnit>,
    index: usize,
    clean_index: Option<usize>,
    open_macro: Option<UndoUnit>,
    /// Depth of ignored nested begin_macro calls
    nested_macros: u32,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoManager {
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            index: 0,
            clean_index: Some(0),
            open_macro: None,
            nested_macros: 0,
        }
    }

    /// Record and apply a single-cell edit on the sprite's current layer
    ///
    /// Old state is captured from that same layer at call time, which is
    /// what makes the inverse diff exact.
    pub fn set_voxel(
        &mut self,
        scene: &mut Scene,
        sprite: SpriteId,
        at: IVec3,
        color: Color,
        index: PaletteIndex,
    ) {
        let Some(layer) = scene.sprite(sprite).and_then(|s| s.cur_layer_index()) else {
            debug!("set_voxel without an edit target on {sprite:?}");
            return;
        };
        let edit = CellEdit {
            at,
            old_color: scene.layer_color_at(sprite, layer, at),
            new_color: color,
            old_index: scene.layer_index_at(sprite, layer, at),
            new_index: index,
        };
        self.push(
            scene,
            "Set voxel",
            Command::SetVoxels { sprite, layer, edits: vec![edit] },
        );
    }

    /// Record and apply a wholesale sprite replacement
    ///
    /// Both states are deep-copied now, not lazily: the live sprite keeps
    /// mutating afterwards and an aliased reference would corrupt history.
    pub fn replace_sprite(&mut self, scene: &mut Scene, sprite: SpriteId, new: Sprite) {
        let Some(old) = scene.sprite(sprite).cloned() else {
            debug!("replace_sprite on stale handle {sprite:?}");
            return;
        };
        self.push(
            scene,
            "Change grid",
            Command::ReplaceSprite {
                sprite,
                old: Box::new(old),
                new: Box::new(new),
            },
        );
    }

    /// Open a macro: every command until `end_macro` becomes one step.
    /// Nesting is not supported; inner pairs are ignored with a warning.
    pub fn begin_macro(&mut self, name: impl Into<String>) {
        if self.open_macro.is_some() {
            warn!("nested undo macros are not supported; ignoring begin_macro");
            self.nested_macros += 1;
            return;
        }
        self.truncate_redo();
        self.open_macro = Some(UndoUnit {
            name: name.into(),
            commands: Vec::new(),
            is_macro: true,
        });
    }

    /// Close the open macro and push it as one unit; an empty macro is
    /// discarded
    pub fn end_macro(&mut self) {
        if self.nested_macros > 0 {
            self.nested_macros -= 1;
            return;
        }
        let Some(unit) = self.open_macro.take() else {
            warn!("end_macro without begin_macro");
            return;
        };
        if unit.commands.is_empty() {
            return;
        }
        self.units.push(unit);
        self.index = self.units.len();
    }

    fn push(&mut self, scene: &mut Scene, name: &str, cmd: Command) {
        cmd.redo(scene);

        if let Some(open) = &mut self.open_macro {
            open.commands.push(cmd);
            return;
        }

        self.truncate_redo();

        // merge a compatible set-voxel run into the top unit, unless that
        // would drag the clean state out from under us
        if self.clean_index != Some(self.index) {
            if let Some(key) = cmd.merge_key() {
                if let Some(top) = self.units.last_mut() {
                    if !top.is_macro
                        && top.commands.len() == 1
                        && top.commands[0].merge_key() == Some(key)
                    {
                        let (Command::SetVoxels { edits: tail, .. }, Command::SetVoxels { edits, .. }) =
                            (&mut top.commands[0], &cmd)
                        else {
                            unreachable!("merge keys only exist on set-voxel commands");
                        };
                        tail.extend_from_slice(edits);
                        return;
                    }
                }
            }
        }

        self.units.push(UndoUnit {
            name: name.to_string(),
            commands: vec![cmd],
            is_macro: false,
        });
        self.index = self.units.len();
    }

    fn truncate_redo(&mut self) {
        if self.units.len() > self.index {
            self.units.truncate(self.index);
            // the clean state is gone for good
            if self.clean_index.is_some_and(|c| c > self.index) {
                self.clean_index = None;
            }
        }
    }

    /// Revert the most recent unit; no-op at the bottom of the stack
    pub fn undo(&mut self, scene: &mut Scene) {
        if self.index == 0 {
            return;
        }
        self.index -= 1;
        for cmd in self.units[self.index].commands.iter().rev() {
            cmd.undo(scene);
        }
    }

    /// Reapply the next unit; no-op at the top of the stack
    pub fn redo(&mut self, scene: &mut Scene) {
        if self.index >= self.units.len() {
            return;
        }
        for cmd in &self.units[self.index].commands {
            cmd.redo(scene);
        }
        self.index += 1;
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.units.len()
    }

    /// Name of the step `undo` would revert
    pub fn undo_name(&self) -> Option<&str> {
        self.index
            .checked_sub(1)
            .map(|i| self.units[i].name.as_str())
    }

    /// Name of the step `redo` would reapply
    pub fn redo_name(&self) -> Option<&str> {
        self.units.get(self.index).map(|u| u.name.as_str())
    }

    /// Drop all history; a fresh document starts clean
    pub fn clear(&mut self) {
        self.units.clear();
        self.index = 0;
        self.clean_index = Some(0);
        self.open_macro = None;
        self.nested_macros = 0;
    }

    /// Declare the current stack position clean (document saved)
    pub fn set_clean(&mut self) {
        self.clean_index = Some(self.index);
    }

    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.index)
    }

    /// Number of undoable units currently on the stack
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::{CellValue, Sprite};

    fn red() -> Color {
        Color::opaque(1.0, 0.0, 0.0)
    }

    fn blue() -> Color {
        Color::opaque(0.0, 0.0, 1.0)
    }

    fn scene_with_sprite() -> (Scene, SpriteId) {
        let mut scene = Scene::new();
        let id = scene.add_sprite(Sprite::with_size("s", IVec3::splat(4)));
        (scene, id)
    }

    #[test]
    fn test_set_voxel_applies_immediately() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();
        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        assert_eq!(scene.color_at(id, IVec3::ZERO), red());
        assert_eq!(undo.len(), 1);
    }

    #[test]
    fn test_round_trip_with_merge() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        // a drag stroke: every sample merges into one unit
        for x in 0..4 {
            undo.set_voxel(&mut scene, id, IVec3::new(x, 0, 0), red(), PaletteIndex::EMPTY);
        }
        assert_eq!(undo.len(), 1);

        undo.undo(&mut scene);
        for x in 0..4 {
            assert!(scene.color_at(id, IVec3::new(x, 0, 0)).is_empty());
        }

        undo.redo(&mut scene);
        for x in 0..4 {
            assert_eq!(scene.color_at(id, IVec3::new(x, 0, 0)), red());
        }
    }

    #[test]
    fn test_round_trip_without_merge() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        undo.begin_macro("Fill");
        undo.set_voxel(&mut scene, id, IVec3::ONE, blue(), PaletteIndex::EMPTY);
        undo.end_macro();

        // a macro boundary splits the history into two steps
        assert_eq!(undo.len(), 2);

        undo.undo(&mut scene);
        undo.undo(&mut scene);
        assert!(scene.color_at(id, IVec3::ZERO).is_empty());
        assert!(scene.color_at(id, IVec3::ONE).is_empty());

        undo.redo(&mut scene);
        undo.redo(&mut scene);
        assert_eq!(scene.color_at(id, IVec3::ZERO), red());
        assert_eq!(scene.color_at(id, IVec3::ONE), blue());
    }

    #[test]
    fn test_overwrite_same_cell_round_trips() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        undo.set_voxel(&mut scene, id, IVec3::ZERO, blue(), PaletteIndex::EMPTY);
        assert_eq!(undo.len(), 1); // merged

        undo.undo(&mut scene);
        assert!(scene.color_at(id, IVec3::ZERO).is_empty());
        undo.redo(&mut scene);
        assert_eq!(scene.color_at(id, IVec3::ZERO), blue());
    }

    #[test]
    fn test_macro_is_single_step() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.begin_macro("Flood Fill");
        for x in 0..4 {
            undo.set_voxel(&mut scene, id, IVec3::new(x, 1, 0), red(), PaletteIndex::EMPTY);
        }
        undo.end_macro();

        assert_eq!(undo.len(), 1);
        undo.undo(&mut scene);
        for x in 0..4 {
            assert!(scene.color_at(id, IVec3::new(x, 1, 0)).is_empty());
        }
    }

    #[test]
    fn test_replace_sprite_never_merges() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        undo.replace_sprite(&mut scene, id, Sprite::with_size("s", IVec3::splat(8)));
        undo.set_voxel(&mut scene, id, IVec3::ZERO, blue(), PaletteIndex::EMPTY);

        assert_eq!(undo.len(), 3);
        assert_eq!(scene.sprite(id).map(|s| s.bounds().size()), Some(IVec3::splat(8)));

        undo.undo(&mut scene);
        undo.undo(&mut scene);
        assert_eq!(scene.sprite(id).map(|s| s.bounds().size()), Some(IVec3::splat(4)));
        assert_eq!(scene.color_at(id, IVec3::ZERO), red());
    }

    #[test]
    fn test_boundary_noops() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.undo(&mut scene); // nothing to undo
        undo.redo(&mut scene); // nothing to redo

        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        undo.undo(&mut scene);
        undo.undo(&mut scene); // second call is a no-op
        assert!(scene.color_at(id, IVec3::ZERO).is_empty());

        undo.redo(&mut scene);
        undo.redo(&mut scene); // second call is a no-op
        assert_eq!(scene.color_at(id, IVec3::ZERO), red());
    }

    #[test]
    fn test_default_matches_new() {
        let undo = UndoManager::default();
        assert!(undo.is_clean());
        assert!(!undo.can_undo());
        assert!(!undo.can_redo());
    }

    #[test]
    fn test_clean_tracking() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        // fresh document is clean
        assert!(undo.is_clean());

        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        assert!(!undo.is_clean());

        undo.undo(&mut scene);
        assert!(undo.is_clean());

        undo.redo(&mut scene);
        undo.set_clean();
        assert!(undo.is_clean());

        undo.set_voxel(&mut scene, id, IVec3::ONE, blue(), PaletteIndex::EMPTY);
        assert!(!undo.is_clean());
        undo.undo(&mut scene);
        assert!(undo.is_clean());
    }

    #[test]
    fn test_edit_at_clean_point_does_not_merge() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        undo.set_clean();

        // merging into the clean unit would make the clean state
        // unreachable, so this must open a new one
        undo.set_voxel(&mut scene, id, IVec3::ONE, red(), PaletteIndex::EMPTY);
        assert_eq!(undo.len(), 2);
        undo.undo(&mut scene);
        assert!(undo.is_clean());
    }

    #[test]
    fn test_truncated_clean_is_permanent() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        undo.set_clean();
        undo.undo(&mut scene);

        // new edit drops the redo unit holding the clean state
        undo.set_voxel(&mut scene, id, IVec3::ONE, blue(), PaletteIndex::EMPTY);
        assert!(!undo.is_clean());
        undo.undo(&mut scene);
        assert!(!undo.is_clean());
    }

    #[test]
    fn test_redo_history_truncated_on_new_edit() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        undo.undo(&mut scene);
        undo.set_voxel(&mut scene, id, IVec3::ONE, blue(), PaletteIndex::EMPTY);

        assert!(!undo.can_redo());
        assert_eq!(undo.len(), 1);
        assert!(scene.color_at(id, IVec3::ZERO).is_empty());
    }

    #[test]
    fn test_clear() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        undo.clear();
        assert!(undo.is_empty());
        assert!(undo.is_clean());
        assert!(!undo.can_undo());
        // the edit itself stays applied; clear drops history, not cells
        assert_eq!(scene.color_at(id, IVec3::ZERO), red());
    }

    #[test]
    fn test_nested_macro_ignored() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.begin_macro("outer");
        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        undo.begin_macro("inner");
        undo.set_voxel(&mut scene, id, IVec3::ONE, red(), PaletteIndex::EMPTY);
        undo.end_macro(); // closes nothing
        undo.set_voxel(&mut scene, id, IVec3::new(2, 0, 0), red(), PaletteIndex::EMPTY);
        undo.end_macro(); // closes the outer macro

        assert_eq!(undo.len(), 1);
        undo.undo(&mut scene);
        assert!(scene.color_at(id, IVec3::ZERO).is_empty());
        assert!(scene.color_at(id, IVec3::ONE).is_empty());
        assert!(scene.color_at(id, IVec3::new(2, 0, 0)).is_empty());
    }

    #[test]
    fn test_undo_names() {
        let (mut scene, id) = scene_with_sprite();
        let mut undo = UndoManager::new();

        undo.begin_macro("Flood Fill");
        undo.set_voxel(&mut scene, id, IVec3::ZERO, red(), PaletteIndex::EMPTY);
        undo.end_macro();

        assert_eq!(undo.undo_name(), Some("Flood Fill"));
        undo.undo(&mut scene);
        assert_eq!(undo.redo_name(), Some("Flood Fill"));
    }
}
