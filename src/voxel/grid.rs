//! Dense voxel grid storage and geometric queries

use crate::core::types::{IVec3, Mat4, Vec3};
use crate::math::{Aabb, IBox3, Ray};
use super::cell::CellValue;

/// Dense 3D grid of cell values with a local-to-world transform
///
/// Cell (x, y, z) occupies the local-space unit box [x,x+1]x[y,y+1]x[z,z+1].
/// All access is bounds-checked: reads outside return `T::EMPTY`, writes
/// outside are no-ops. Grids are value types: cloning duplicates storage,
/// which is what the whole-grid-replace undo command relies on.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid<T: CellValue> {
    dim: IVec3,
    transform: Mat4,
    cells: Vec<T>,
}

fn cell_count(dim: IVec3) -> usize {
    (dim.x as usize) * (dim.y as usize) * (dim.z as usize)
}

impl<T: CellValue> VoxelGrid<T> {
    /// Grid of the given extents filled with `T::EMPTY`
    ///
    /// Non-positive extents are clamped to zero, yielding a well-defined
    /// empty grid rather than an error.
    pub fn new(dim: IVec3) -> Self {
        let dim = dim.max(IVec3::ZERO);
        Self {
            dim,
            transform: Mat4::IDENTITY,
            cells: vec![T::EMPTY; cell_count(dim)],
        }
    }

    pub fn dim(&self) -> IVec3 {
        self.dim
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True when any extent is zero
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, m: Mat4) {
        self.transform = m;
    }

    fn index(&self, pos: IVec3) -> Option<usize> {
        if pos.cmpge(IVec3::ZERO).all() && pos.cmplt(self.dim).all() {
            Some(
                ((pos.x as usize) * (self.dim.y as usize) + pos.y as usize)
                    * (self.dim.z as usize)
                    + pos.z as usize,
            )
        } else {
            None
        }
    }

    pub fn contains(&self, pos: IVec3) -> bool {
        self.index(pos).is_some()
    }

    /// Cell value at `pos`; the empty sentinel out of bounds
    pub fn get(&self, pos: IVec3) -> T {
        match self.index(pos) {
            Some(i) => self.cells[i],
            None => T::EMPTY,
        }
    }

    /// Overwrite a cell; no-op out of bounds
    ///
    /// Direct writes bypass history: in the edited path only the undo
    /// engine may call this.
    pub fn set(&mut self, pos: IVec3, value: T) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = value;
        }
    }

    /// Set every cell to `value`
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Reallocate to `new_dim`, moving old cell `p` to `p + offset` where
    /// that lands inside the new extents and filling the rest with `fill`
    ///
    /// Growth works in any of the six directions. All-or-nothing: the old
    /// storage is swapped out only once the new one is fully built.
    pub fn resize(&mut self, new_dim: IVec3, offset: IVec3, fill: T) {
        let new_dim = new_dim.max(IVec3::ZERO);
        let mut next = vec![fill; cell_count(new_dim)];

        // overlap in old-grid coordinates
        let lo = IVec3::ZERO.max(-offset);
        let hi = self.dim.min(new_dim - offset);
        for x in lo.x..hi.x {
            for y in lo.y..hi.y {
                for z in lo.z..hi.z {
                    let p = IVec3::new(x, y, z);
                    let q = p + offset;
                    let src = self
                        .index(p)
                        .unwrap_or_default();
                    let dst = ((q.x as usize) * (new_dim.y as usize) + q.y as usize)
                        * (new_dim.z as usize)
                        + q.z as usize;
                    next[dst] = self.cells[src];
                }
            }
        }

        self.dim = new_dim;
        self.cells = next;
    }

    /// Center of a cell in grid-local space
    pub fn voxel_center(pos: IVec3) -> Vec3 {
        pos.as_vec3() + Vec3::splat(0.5)
    }

    /// World transform of a single voxel: translate to the cell center,
    /// then apply the grid transform. The one conversion point shared by
    /// rendering and geometric queries.
    pub fn voxel_transform(&self, pos: IVec3) -> Mat4 {
        self.transform * Mat4::from_translation(Self::voxel_center(pos))
    }

    /// World-space box enclosing the whole grid
    pub fn world_bounds(&self) -> Aabb {
        Aabb::new(Vec3::ZERO, self.dim.as_vec3()).transformed(&self.transform)
    }

    /// Local cell bounds, for the ray caster
    pub fn cell_bounds(&self) -> IBox3 {
        IBox3::from_origin_size(IVec3::ZERO, self.dim)
    }

    /// Ordered near-to-far cells along a world ray
    pub fn intersect_ray(&self, ray: &Ray) -> Vec<IVec3> {
        crate::raycast::intersect(self.cell_bounds(), &self.transform, ray)
    }
}
