//! Library-assisted import path built on `tobj`.
//!
//! The importer triangulates, merges the per-attribute index streams into a
//! single one, fills in smooth normals when the file has none and derives
//! tangent frames for normal mapping. Only files holding exactly one mesh
//! are accepted.

use std::path::{Path, PathBuf};

use corelib::{Bounds, Vec3};

use crate::{
    error::{AssetError, AssetResult},
    mesh::Mesh,
    tangent::{smooth_normals, tangent_frames},
};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Import a single-mesh OBJ file.
pub fn import_scene(path: impl AsRef<Path>) -> AssetResult<Mesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| AssetError::io(path, e))?;
    let mesh = import_scene_bytes(&bytes).map_err(|e| match e {
        AssetError::Import(msg) => AssetError::Import(format!("{}: {msg}", path.display())),
        other => other,
    })?;
    log::info!(
        "Imported {:?}: {} vertices, {} triangles",
        path,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Import from raw OBJ bytes. Material libraries are not resolved.
pub fn import_scene_bytes(bytes: &[u8]) -> AssetResult<Mesh> {
    let (models, _materials) = tobj::load_obj_buf(&mut &bytes[..], &load_options(), |_| {
        Ok((Vec::new(), Default::default()))
    })
    .map_err(|e| AssetError::Import(e.to_string()))?;

    let mut meshes: Vec<tobj::Mesh> = models
        .into_iter()
        .map(|m| m.mesh)
        .filter(|m| !m.indices.is_empty())
        .collect();

    match meshes.len() {
        0 => Err(AssetError::UnsupportedScene("no meshes found".into())),
        1 => Ok(mesh_from_import(meshes.remove(0))),
        n => Err(AssetError::UnsupportedScene(format!(
            "found {n} meshes, expected exactly one"
        ))),
    }
}

/// Run [`import_scene`] on the blocking thread pool so the caller's thread
/// (typically the render loop) stays responsive.
pub async fn import_scene_async(path: impl Into<PathBuf>) -> AssetResult<Mesh> {
    let path = path.into();
    tokio::task::spawn_blocking(move || import_scene(&path))
        .await
        .map_err(|e| AssetError::Background(e.to_string()))?
}

fn mesh_from_import(imported: tobj::Mesh) -> Mesh {
    let tobj::Mesh {
        positions,
        normals,
        texcoords,
        indices,
        ..
    } = imported;
    let count = positions.len() / 3;

    let normals = if normals.len() == count * 3 {
        normals
    } else {
        log::debug!("Imported mesh has no normals; generating smooth normals");
        smooth_normals(&positions, &indices)
    };
    let tex_coords = if texcoords.len() == count * 2 {
        texcoords
    } else {
        vec![0.0; count * 2]
    };
    let frames = tangent_frames(&positions, &tex_coords, &normals, &indices);
    let bounds = Bounds::from_points(positions.chunks_exact(3).map(Vec3::from_slice));

    Mesh {
        positions,
        tex_coords,
        normals,
        tangents: frames.tangents,
        bitangents: frames.bitangents,
        indices,
        bounds,
    }
}
