//! Voxpaint - a voxel-art authoring core
//!
//! The editable model is a scene of sprites, each a stack of positioned
//! voxel grid layers. Edits flow one way: a world-space ray is intersected
//! against a sprite, the active paint tool turns the ordered cell list into
//! edits, and the undo engine is the only path that mutates cells.

pub mod core;
pub mod math;
pub mod voxel;
pub mod raycast;
pub mod tools;
pub mod undo;
pub mod io;
pub mod ops;
