//! Surface mesh extraction for export
//!
//! Emits one quad per exposed voxel face, grouped by color so exporters
//! can write one material per group. Vertices are shared between faces.

use std::collections::HashMap;

use crate::core::types::{IVec3, Vec3};
use crate::voxel::{CellValue, Color, VoxelGrid};

/// Quads sharing one color
#[derive(Clone, Debug)]
pub struct MeshGroup {
    pub color: Color,
    pub material: String,
    /// Vertex indices, counter-clockwise seen from outside
    pub quads: Vec<[u32; 4]>,
}

/// An extracted surface mesh
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub groups: Vec<MeshGroup>,
}

impl Mesh {
    pub fn quad_count(&self) -> usize {
        self.groups.iter().map(|g| g.quads.len()).sum()
    }
}

// Face corner offsets per direction, counter-clockwise from outside.
// Order matches FACE_DIRS.
const FACE_CORNERS: [[IVec3; 4]; 6] = [
    // +X
    [
        IVec3::new(1, 0, 0),
        IVec3::new(1, 1, 0),
        IVec3::new(1, 1, 1),
        IVec3::new(1, 0, 1),
    ],
    // -X
    [
        IVec3::new(0, 0, 0),
        IVec3::new(0, 0, 1),
        IVec3::new(0, 1, 1),
        IVec3::new(0, 1, 0),
    ],
    // +Y
    [
        IVec3::new(0, 1, 0),
        IVec3::new(0, 1, 1),
        IVec3::new(1, 1, 1),
        IVec3::new(1, 1, 0),
    ],
    // -Y
    [
        IVec3::new(0, 0, 0),
        IVec3::new(1, 0, 0),
        IVec3::new(1, 0, 1),
        IVec3::new(0, 0, 1),
    ],
    // +Z
    [
        IVec3::new(0, 0, 1),
        IVec3::new(1, 0, 1),
        IVec3::new(1, 1, 1),
        IVec3::new(0, 1, 1),
    ],
    // -Z
    [
        IVec3::new(0, 0, 0),
        IVec3::new(0, 1, 0),
        IVec3::new(1, 1, 0),
        IVec3::new(1, 0, 0),
    ],
];

const FACE_DIRS: [IVec3; 6] = [
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
];

fn color_key(c: &Color) -> [u32; 4] {
    [c.r.to_bits(), c.g.to_bits(), c.b.to_bits(), c.a.to_bits()]
}

/// Extract the exposed surface of a grid as quads grouped by color
///
/// A face is exposed when the neighbor across it is empty or outside the
/// grid. Positions are in grid-local space; the caller applies the model
/// transform.
pub fn mesh_from_grid(grid: &VoxelGrid<Color>) -> Mesh {
    let mut mesh = Mesh::default();
    let mut vert_ids: HashMap<(i32, i32, i32), u32> = HashMap::new();
    let mut group_ids: HashMap<[u32; 4], usize> = HashMap::new();

    let dim = grid.dim();
    for x in 0..dim.x {
        for y in 0..dim.y {
            for z in 0..dim.z {
                let pos = IVec3::new(x, y, z);
                let color = grid.get(pos);
                if color.is_empty() {
                    continue;
                }

                let group = *group_ids.entry(color_key(&color)).or_insert_with(|| {
                    mesh.groups.push(MeshGroup {
                        color,
                        material: format!("mat_{}", mesh.groups.len()),
                        quads: Vec::new(),
                    });
                    mesh.groups.len() - 1
                });

                for (dir, corners) in FACE_DIRS.iter().zip(&FACE_CORNERS) {
                    if !grid.get(pos + *dir).is_empty() {
                        continue;
                    }
                    let mut quad = [0u32; 4];
                    for (slot, corner) in quad.iter_mut().zip(corners) {
                        let v = pos + *corner;
                        *slot = *vert_ids.entry((v.x, v.y, v.z)).or_insert_with(|| {
                            mesh.positions.push(v.as_vec3());
                            mesh.positions.len() as u32 - 1
                        });
                    }
                    mesh.groups[group].quads.push(quad);
                }
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white() -> Color {
        Color::opaque(1.0, 1.0, 1.0)
    }

    #[test]
    fn test_single_voxel_cube() {
        let mut grid = VoxelGrid::new(IVec3::splat(3));
        grid.set(IVec3::ONE, white());

        let mesh = mesh_from_grid(&grid);
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.positions.len(), 8);
        assert_eq!(mesh.groups.len(), 1);
        assert_eq!(mesh.groups[0].material, "mat_0");
    }

    #[test]
    fn test_shared_face_culled() {
        let mut grid = VoxelGrid::new(IVec3::splat(4));
        grid.set(IVec3::new(1, 1, 1), white());
        grid.set(IVec3::new(2, 1, 1), white());

        // two cubes minus the two touching faces
        let mesh = mesh_from_grid(&grid);
        assert_eq!(mesh.quad_count(), 10);
        assert_eq!(mesh.groups.len(), 1);
    }

    #[test]
    fn test_one_group_per_color() {
        let mut grid = VoxelGrid::new(IVec3::splat(4));
        grid.set(IVec3::new(0, 0, 0), white());
        grid.set(IVec3::new(2, 0, 0), Color::opaque(1.0, 0.0, 0.0));
        grid.set(IVec3::new(2, 2, 0), Color::opaque(1.0, 0.0, 0.0));

        let mesh = mesh_from_grid(&grid);
        assert_eq!(mesh.groups.len(), 2);
        assert_eq!(mesh.quad_count(), 18);
        let mats: Vec<&str> = mesh.groups.iter().map(|g| g.material.as_str()).collect();
        assert_eq!(mats, ["mat_0", "mat_1"]);
    }

    #[test]
    fn test_grid_edge_faces_exposed() {
        let mut grid = VoxelGrid::new(IVec3::ONE);
        grid.set(IVec3::ZERO, white());
        assert_eq!(mesh_from_grid(&grid).quad_count(), 6);
    }

    #[test]
    fn test_quads_wind_outward() {
        let mut grid = VoxelGrid::new(IVec3::ONE);
        grid.set(IVec3::ZERO, white());
        let mesh = mesh_from_grid(&grid);

        // cross product of the first two edges must point away from the
        // cube center for every face
        let center = Vec3::splat(0.5);
        for quad in &mesh.groups[0].quads {
            let [a, b, c, _] = quad.map(|i| mesh.positions[i as usize]);
            let normal = (b - a).cross(c - b);
            let outward = a + (b - a) / 2.0 + (c - b) / 2.0 - center;
            assert!(normal.dot(outward) > 0.0, "inward-facing quad {quad:?}");
        }
    }

    #[test]
    fn test_empty_grid_empty_mesh() {
        let grid: VoxelGrid<Color> = VoxelGrid::new(IVec3::splat(3));
        let mesh = mesh_from_grid(&grid);
        assert_eq!(mesh.quad_count(), 0);
        assert!(mesh.positions.is_empty());
    }
}
