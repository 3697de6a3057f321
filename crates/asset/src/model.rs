//! Face-indexed OBJ geometry as produced by the parser.

use corelib::{Bounds, Vec2, Vec3};

/// One corner of a face: 0-based indices into the position, texcoord and
/// normal pools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceCorner {
    pub position: u32,
    pub tex_coord: u32,
    pub normal: u32,
}

impl FaceCorner {
    pub fn new(position: u32, tex_coord: u32, normal: u32) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }
}

/// Raw pools plus the per-corner index stream of a parsed OBJ file.
///
/// The `*_flat` arrays are keyed by position index: slot `i` holds the
/// attributes of the *last* corner that referenced position `i`. A position
/// shared by corners with different texcoords or normals keeps only the
/// latest pairing. Slots never referenced by a face stay zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjModel {
    pub positions: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    /// Resolved face corners in traversal order, three per triangle.
    pub corners: Vec<FaceCorner>,
    /// Position index of every corner in `corners`.
    pub indices: Vec<u32>,
    pub positions_flat: Vec<f32>,
    pub tex_coords_flat: Vec<f32>,
    pub normals_flat: Vec<f32>,
    /// Zero-anchored box over every declared position, referenced or not.
    pub bounds: Bounds,
}

impl ObjModel {
    /// Wrap complete pools; flat arrays are sized by the position count.
    pub fn from_pools(
        positions: Vec<Vec3>,
        tex_coords: Vec<Vec2>,
        normals: Vec<Vec3>,
        bounds: Bounds,
    ) -> Self {
        let count = positions.len();
        Self {
            positions,
            tex_coords,
            normals,
            corners: Vec::new(),
            indices: Vec::new(),
            positions_flat: vec![0.0; count * 3],
            tex_coords_flat: vec![0.0; count * 2],
            normals_flat: vec![0.0; count * 3],
            bounds,
        }
    }

    /// Append a corner and overwrite the position-keyed flat slots.
    ///
    /// The corner must reference existing pool entries.
    pub(crate) fn push_corner(&mut self, corner: FaceCorner) {
        let slot = corner.position as usize;
        let p = self.positions[slot];
        let t = self.tex_coords[corner.tex_coord as usize];
        let n = self.normals[corner.normal as usize];

        self.positions_flat[slot * 3..slot * 3 + 3].copy_from_slice(&p.to_array());
        self.tex_coords_flat[slot * 2..slot * 2 + 2].copy_from_slice(&t.to_array());
        self.normals_flat[slot * 3..slot * 3 + 3].copy_from_slice(&n.to_array());

        self.indices.push(corner.position);
        self.corners.push(corner);
    }

    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }

    /// `true` when the file declared no positions and no faces.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.corners.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}
