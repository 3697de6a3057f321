//! GPU-ready mesh: parallel flat attribute arrays read through one index stream.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use corelib::{Bounds, Vec3};

use crate::model::{FaceCorner, ObjModel};

/// Interleaved view of one mesh vertex. Values are in object space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }
}

/// Indexed triangle list with one flat array per attribute.
///
/// `tangents` and `bitangents` are empty unless the mesh came from the
/// scene importer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub tex_coords: Vec<f32>,
    pub normals: Vec<f32>,
    pub tangents: Vec<f32>,
    pub bitangents: Vec<f32>,
    pub indices: Vec<u32>,
    pub bounds: Bounds,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    /// Returns `true` if the mesh can be drawn as a triangle list: buffers
    /// are non-empty, attribute arrays agree on the vertex count and every
    /// index is in range.
    pub fn is_valid(&self) -> bool {
        let count = self.vertex_count();
        let tangents_ok = !self.has_tangents()
            || (self.tangents.len() == count * 3 && self.bitangents.len() == count * 3);
        count > 0
            && !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self.positions.len() == count * 3
            && self.tex_coords.len() == count * 2
            && self.normals.len() == count * 3
            && tangents_ok
            && self.indices.iter().all(|&i| (i as usize) < count)
    }

    pub fn vertex(&self, index: usize) -> Option<MeshVertex> {
        let p = self.positions.get(index * 3..index * 3 + 3)?;
        let t = self.tex_coords.get(index * 2..index * 2 + 2)?;
        let n = self.normals.get(index * 3..index * 3 + 3)?;
        Some(MeshVertex::new([p[0], p[1], p[2]], [t[0], t[1]], [n[0], n[1], n[2]]))
    }

    /// All vertices packed for a single interleaved vertex buffer.
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        (0..self.vertex_count()).filter_map(|i| self.vertex(i)).collect()
    }
}

/// How corners are mapped to output vertices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexMode {
    /// One output vertex per distinct `(position, texcoord, normal)` triple.
    #[default]
    Deduplicated,
    /// One output vertex per position, using the parser's flat arrays.
    /// A position shared by corners with different texcoords or normals
    /// keeps only the last pairing.
    PositionKeyed,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MeshBuilder {
    indexing: IndexMode,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indexing(mut self, mode: IndexMode) -> Self {
        self.indexing = mode;
        self
    }

    pub fn build(&self, model: &ObjModel) -> Mesh {
        let mesh = match self.indexing {
            IndexMode::Deduplicated => build_deduplicated(model),
            IndexMode::PositionKeyed => Mesh {
                positions: model.positions_flat.clone(),
                tex_coords: model.tex_coords_flat.clone(),
                normals: model.normals_flat.clone(),
                indices: model.indices.clone(),
                bounds: model.bounds,
                ..Default::default()
            },
        };
        log::debug!(
            "Built mesh ({:?}): {} vertices, {} triangles",
            self.indexing,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        mesh
    }
}

/// Corners pointing outside the pools (only possible for hand-built models)
/// read zero attributes.
fn build_deduplicated(model: &ObjModel) -> Mesh {
    debug_assert!(
        model.corners.iter().all(|c| (c.position as usize) < model.positions.len()
            && (c.tex_coord as usize) < model.tex_coords.len()
            && (c.normal as usize) < model.normals.len()),
        "face corner references a missing pool entry"
    );
    let mut unique: HashMap<FaceCorner, u32> = HashMap::with_capacity(model.corners.len());
    let mut mesh = Mesh {
        indices: Vec::with_capacity(model.corners.len()),
        bounds: model.bounds,
        ..Default::default()
    };

    for corner in &model.corners {
        let index = *unique.entry(*corner).or_insert_with(|| {
            let p = model
                .positions
                .get(corner.position as usize)
                .copied()
                .unwrap_or(Vec3::ZERO);
            let t = model
                .tex_coords
                .get(corner.tex_coord as usize)
                .copied()
                .unwrap_or_default();
            let n = model
                .normals
                .get(corner.normal as usize)
                .copied()
                .unwrap_or(Vec3::ZERO);

            let idx = mesh.vertex_count() as u32;
            mesh.positions.extend_from_slice(&p.to_array());
            mesh.tex_coords.extend_from_slice(&t.to_array());
            mesh.normals.extend_from_slice(&n.to_array());
            idx
        });
        mesh.indices.push(index);
    }

    mesh
}
