//! Asset loading: OBJ parsing, GPU-ready mesh building, scene import and
//! CPU-side texture decoding.

pub mod error;
pub mod layout;
pub mod mesh;
pub mod model;
pub mod obj;
pub mod scene;
pub mod tangent;
pub mod texture;

pub use error::{AssetError, AssetResult};
pub use layout::{AttributeKind, VertexAttribute};
pub use mesh::{IndexMode, Mesh, MeshBuilder, MeshVertex};
pub use model::{FaceCorner, ObjModel};
pub use obj::{
    ObjParseOptions, PolygonMode, parse_obj_bytes, parse_obj_bytes_with, parse_obj_file,
    parse_obj_file_with, parse_obj_reader, parse_obj_reader_with, parse_obj_str,
    parse_obj_str_with,
};
pub use scene::{import_scene, import_scene_async, import_scene_bytes};
pub use tangent::{TangentFrames, smooth_normals, tangent_frames};
pub use texture::{TextureData, TextureFormat};

#[cfg(test)]
mod tests {
    #[test]
    fn loaders_are_reachable_from_crate_root() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n";
        let options = crate::ObjParseOptions::default();
        let from_str = crate::parse_obj_str_with(src, options).unwrap();
        let from_bytes = crate::parse_obj_bytes_with(src.as_bytes(), options).unwrap();
        let from_reader = crate::parse_obj_reader(src.as_bytes()).unwrap();
        assert_eq!(from_str, from_bytes);
        assert_eq!(from_str, from_reader);

        let mesh = crate::import_scene_bytes(src.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }
}
