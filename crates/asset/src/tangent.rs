//! Per-vertex normal and tangent generation for indexed triangle lists.
//!
//! Inputs are flat arrays (3 floats per position/normal, 2 per texcoord).
//! Triangles referencing a vertex outside the arrays are skipped.

use corelib::{Vec2, Vec3};

const EPSILON: f32 = 1e-12;

fn read3(flat: &[f32], i: usize) -> Option<Vec3> {
    flat.get(i * 3..i * 3 + 3).map(Vec3::from_slice)
}

fn read2(flat: &[f32], i: usize) -> Option<Vec2> {
    flat.get(i * 2..i * 2 + 2).map(Vec2::from_slice)
}

fn triangles(indices: &[u32]) -> impl Iterator<Item = [usize; 3]> + '_ {
    indices
        .chunks_exact(3)
        .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
}

fn flatten(vectors: &[Vec3]) -> Vec<f32> {
    vectors.iter().flat_map(|v| v.to_array()).collect()
}

/// Area-weighted smooth normals, one per vertex.
///
/// Vertices not used by any triangle (or only by degenerate ones) get a
/// zero normal.
pub fn smooth_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let count = positions.len() / 3;
    let mut acc = vec![Vec3::ZERO; count];

    for [a, b, c] in triangles(indices) {
        let (Some(p0), Some(p1), Some(p2)) = (read3(positions, a), read3(positions, b), read3(positions, c)) else {
            continue;
        };
        // Cross product length is twice the area: larger faces weigh more.
        let face = (p1 - p0).cross(p2 - p0);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }

    let normals: Vec<Vec3> = acc.into_iter().map(Vec3::normalize_or_zero).collect();
    flatten(&normals)
}

/// Tangent and bitangent arrays, same length as the normal array.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TangentFrames {
    pub tangents: Vec<f32>,
    pub bitangents: Vec<f32>,
}

/// Derive tangent space from UV gradients.
///
/// Per-triangle tangents are summed per vertex, then orthogonalized against
/// the vertex normal. Where UVs are degenerate the tangent falls back to an
/// arbitrary unit vector perpendicular to the normal.
pub fn tangent_frames(positions: &[f32], tex_coords: &[f32], normals: &[f32], indices: &[u32]) -> TangentFrames {
    let count = positions.len() / 3;
    let mut tan = vec![Vec3::ZERO; count];
    let mut bitan = vec![Vec3::ZERO; count];

    for [a, b, c] in triangles(indices) {
        let (Some(p0), Some(p1), Some(p2)) = (read3(positions, a), read3(positions, b), read3(positions, c)) else {
            continue;
        };
        let (Some(uv0), Some(uv1), Some(uv2)) = (read2(tex_coords, a), read2(tex_coords, b), read2(tex_coords, c)) else {
            continue;
        };

        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let d1 = uv1 - uv0;
        let d2 = uv2 - uv0;
        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let t = (e1 * d2.y - e2 * d1.y) * r;
        let bt = (e2 * d1.x - e1 * d2.x) * r;

        for i in [a, b, c] {
            tan[i] += t;
            bitan[i] += bt;
        }
    }

    let mut tangents = Vec::with_capacity(count);
    let mut bitangents = Vec::with_capacity(count);
    for i in 0..count {
        let n = read3(normals, i).unwrap_or(Vec3::ZERO).normalize_or_zero();
        let (t, b) = orthonormal_frame(n, tan[i], bitan[i]);
        tangents.push(t);
        bitangents.push(b);
    }

    TangentFrames {
        tangents: flatten(&tangents),
        bitangents: flatten(&bitangents),
    }
}

fn orthonormal_frame(n: Vec3, t: Vec3, b: Vec3) -> (Vec3, Vec3) {
    if n == Vec3::ZERO {
        return (t.normalize_or_zero(), b.normalize_or_zero());
    }
    // Gram-Schmidt
    let mut tangent = (t - n * n.dot(t)).normalize_or_zero();
    if tangent == Vec3::ZERO {
        tangent = n.any_orthonormal_vector();
    }
    let mut bitangent = n.cross(tangent);
    if bitangent.dot(b) < 0.0 {
        bitangent = -bitangent;
    }
    (tangent, bitangent)
}
