//! OBJ parser for triangle meshes with positions, texture coordinates and normals.
//!
//! Accepted records: `v x y z`, `vt u v`, `vn x y z` and
//! `f v/t/n v/t/n v/t/n ...` with 1-based positive indices. Tokens are
//! separated by exactly one space; anything else on a record line is a
//! format error. Unknown records (`#`, `o`, `g`, `s`, `usemtl`, ...) are
//! skipped.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use corelib::{Bounds, Vec2, Vec3, vec2, vec3};

use crate::{
    error::{AssetError, AssetResult},
    model::{FaceCorner, ObjModel},
};

/// How faces with more than three corners are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PolygonMode {
    /// Split n-gons into a triangle fan around their first corner.
    #[default]
    Triangulate,
    /// Keep the first three corners and drop the rest.
    Truncate,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjParseOptions {
    pub polygons: PolygonMode,
}

impl ObjParseOptions {
    pub fn with_polygons(mut self, polygons: PolygonMode) -> Self {
        self.polygons = polygons;
        self
    }
}

/// Parse an OBJ file from a path.
pub fn parse_obj_file(path: impl AsRef<Path>) -> AssetResult<ObjModel> {
    parse_obj_file_with(path, ObjParseOptions::default())
}

pub fn parse_obj_file_with(path: impl AsRef<Path>, options: ObjParseOptions) -> AssetResult<ObjModel> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AssetError::io(path, e))?;
    let model = parse_obj(BufReader::new(file), options, path)?;
    log::info!(
        "Loaded OBJ {:?}: {} positions, {} texcoords, {} normals, {} triangles",
        path,
        model.positions.len(),
        model.tex_coords.len(),
        model.normals.len(),
        model.triangle_count()
    );
    Ok(model)
}

/// Parse OBJ text from any [`BufRead`] implementation.
pub fn parse_obj_reader<R: BufRead>(reader: R) -> AssetResult<ObjModel> {
    parse_obj_reader_with(reader, ObjParseOptions::default())
}

pub fn parse_obj_reader_with<R: BufRead>(reader: R, options: ObjParseOptions) -> AssetResult<ObjModel> {
    parse_obj(reader, options, Path::new("<reader>"))
}

/// Convenience helper to parse an OBJ string literal.
pub fn parse_obj_str(contents: &str) -> AssetResult<ObjModel> {
    parse_obj_str_with(contents, ObjParseOptions::default())
}

pub fn parse_obj_str_with(contents: &str, options: ObjParseOptions) -> AssetResult<ObjModel> {
    parse_obj(io::Cursor::new(contents), options, Path::new("<string>"))
}

/// Parse raw file bytes. The bytes must be UTF-8.
pub fn parse_obj_bytes(bytes: &[u8]) -> AssetResult<ObjModel> {
    parse_obj_bytes_with(bytes, ObjParseOptions::default())
}

pub fn parse_obj_bytes_with(bytes: &[u8], options: ObjParseOptions) -> AssetResult<ObjModel> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        let line = bytes[..e.valid_up_to()].iter().filter(|&&b| b == b'\n').count() + 1;
        AssetError::format(line, "line is not valid UTF-8")
    })?;
    parse_obj_str_with(text, options)
}

/// A face line whose corners are syntactically valid but not yet checked
/// against the pools. Indices are still 1-based.
struct PendingFace {
    line: usize,
    corners: Vec<[u32; 3]>,
}

fn parse_obj<R: BufRead>(reader: R, options: ObjParseOptions, origin: &Path) -> AssetResult<ObjModel> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut tex_coords: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut bounds = Bounds::ZERO;
    let mut faces: Vec<PendingFace> = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => AssetError::format(line_no, "line is not valid UTF-8"),
            _ => AssetError::io(origin, e),
        })?;
        let text = line.trim_end();
        if text.is_empty() {
            continue;
        }

        let mut tokens = text.split(' ');
        let tag = tokens.next().unwrap_or_default();

        match tag {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no, tag)?;
                let p = vec3(x, y, z);
                positions.push(p);
                bounds.include(p);
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&mut tokens, line_no, tag)?;
                tex_coords.push(vec2(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no, tag)?;
                normals.push(vec3(x, y, z));
            }
            "f" => faces.push(parse_face(tokens, line_no, options.polygons)?),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("{:?}: ignored {} unsupported OBJ records", origin, skipped);
    }

    // Pools are complete here, so flat arrays get their final size even
    // when declarations and faces are interleaved.
    let mut model = ObjModel::from_pools(positions, tex_coords, normals, bounds);
    for face in faces {
        let resolved = face
            .corners
            .iter()
            .map(|raw| resolve_corner(*raw, &model, face.line))
            .collect::<AssetResult<Vec<_>>>()?;
        for tri in 1..resolved.len() - 1 {
            model.push_corner(resolved[0]);
            model.push_corner(resolved[tri]);
            model.push_corner(resolved[tri + 1]);
        }
    }

    Ok(model)
}

fn parse_floats<const N: usize>(
    tokens: &mut std::str::Split<'_, char>,
    line: usize,
    tag: &str,
) -> AssetResult<[f32; N]> {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| {
            AssetError::format(line, format!("'{tag}' expects {N} values, found {i}"))
        })?;
        *slot = token
            .parse::<f32>()
            .map_err(|e| AssetError::format(line, format!("invalid number '{token}' in '{tag}': {e}")))?;
    }
    Ok(out)
}

fn parse_face(
    tokens: std::str::Split<'_, char>,
    line: usize,
    polygons: PolygonMode,
) -> AssetResult<PendingFace> {
    let tokens: Vec<&str> = tokens.collect();
    if tokens.len() < 3 {
        return Err(AssetError::format(
            line,
            format!("face needs at least 3 corners, found {}", tokens.len()),
        ));
    }

    let used = match polygons {
        PolygonMode::Triangulate => tokens.len(),
        PolygonMode::Truncate => {
            if tokens.len() > 3 {
                log::warn!(
                    "OBJ line {}: dropping {} extra face corners",
                    line,
                    tokens.len() - 3
                );
            }
            3
        }
    };

    let corners = tokens[..used]
        .iter()
        .map(|token| parse_corner(token, line))
        .collect::<AssetResult<Vec<_>>>()?;
    Ok(PendingFace { line, corners })
}

/// Decode `v/t/n` into three 1-based indices.
fn parse_corner(token: &str, line: usize) -> AssetResult<[u32; 3]> {
    let mut fields = token.split('/');
    let mut out = [0u32; 3];
    for (slot, what) in out.iter_mut().zip(["position", "texcoord", "normal"]) {
        let field = fields.next().ok_or_else(|| {
            AssetError::format(line, format!("face corner '{token}' is missing its {what} index"))
        })?;
        if field.starts_with('-') {
            return Err(AssetError::format(
                line,
                format!("relative index '{field}' in '{token}' is not supported"),
            ));
        }
        let raw = field.parse::<u32>().map_err(|_| {
            AssetError::format(line, format!("invalid {what} index '{field}' in '{token}'"))
        })?;
        if raw == 0 {
            return Err(AssetError::format(line, "OBJ indices are 1-based; found 0"));
        }
        *slot = raw;
    }
    if fields.next().is_some() {
        return Err(AssetError::format(
            line,
            format!("face corner '{token}' has more than 3 components"),
        ));
    }
    Ok(out)
}

fn resolve_corner(raw: [u32; 3], model: &ObjModel, line: usize) -> AssetResult<FaceCorner> {
    let [v, t, n] = raw;
    let check = |index: u32, len: usize, what: &str| -> AssetResult<u32> {
        if index as usize > len {
            return Err(AssetError::format(
                line,
                format!("{what} index {index} out of bounds (len={len})"),
            ));
        }
        Ok(index - 1)
    };
    Ok(FaceCorner::new(
        check(v, model.positions.len(), "position")?,
        check(t, model.tex_coords.len(), "texcoord")?,
        check(n, model.normals.len(), "normal")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 1.0 0.0
vn 1.0 0.0 0.0
f 1/1/1 2/2/2 3/3/3
";

    #[test]
    fn parse_simple_triangle() {
        let model = parse_obj_str(TRIANGLE).expect("parse triangle");
        assert_eq!(model.indices, vec![0, 1, 2]);
        assert_eq!(model.triangle_count(), 1);
        assert_eq!(&model.positions_flat[0..3], &model.positions[0].to_array());
        assert_eq!(&model.positions_flat[3..6], &[1.0, 0.0, 0.0]);
        assert_eq!(&model.tex_coords_flat[4..6], &[0.0, 1.0]);
        assert_eq!(&model.normals_flat[6..9], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn size_invariants_hold() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\n\
                   f 1/1/1 2/1/1 3/1/1\nf 1/1/1 3/1/1 4/1/1\n";
        let model = parse_obj_str(src).unwrap();
        assert_eq!(model.indices.len() % 3, 0);
        assert!(model.indices.iter().all(|&i| (i as usize) < model.positions.len()));
        assert_eq!(model.positions_flat.len(), model.positions.len() * 3);
        assert_eq!(model.tex_coords_flat.len(), model.positions.len() * 2);
        assert_eq!(model.normals_flat.len(), model.positions.len() * 3);
    }

    #[test]
    fn bounds_are_zero_anchored() {
        let model = parse_obj_str("v 1 2 3\nv 4 -5 6\n").unwrap();
        assert_eq!(model.bounds.min, vec3(0.0, -5.0, 0.0));
        assert_eq!(model.bounds.max, vec3(4.0, 2.0, 6.0));
    }

    #[test]
    fn nan_vertex_keeps_bounds_finite() {
        let model = parse_obj_str("v nan 0 0\nv 2 -3 1\n").unwrap();
        assert!(model.positions[0].x.is_nan());
        assert_eq!(model.bounds.min, vec3(0.0, -3.0, 0.0));
        assert_eq!(model.bounds.max, vec3(2.0, 0.0, 1.0));
    }

    #[test]
    fn later_corner_overwrites_position_slot() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nvt 0 0\n\
                   vn 1 0 0\nvn 0 1 0\n\
                   f 1/1/1 2/1/1 3/1/1\nf 1/1/2 3/1/2 4/1/2\n";
        let model = parse_obj_str(src).unwrap();
        assert_eq!(&model.normals_flat[0..3], &[0.0, 1.0, 0.0]);
        // Both pairings survive in the corner stream.
        assert_eq!(model.corners[0].normal, 0);
        assert_eq!(model.corners[3].normal, 1);
    }

    #[test]
    fn two_corner_face_is_rejected() {
        let src = "v 0 0 0\nv 1 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1\n";
        let err = parse_obj_str(src).unwrap_err();
        assert!(matches!(err, AssetError::Format { line: 5, .. }), "{err}");
    }

    #[test]
    fn short_vertex_is_rejected() {
        let err = parse_obj_str("v 1.0 2.0\n").unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn doubled_space_is_rejected() {
        let err = parse_obj_str("v 1.0  2.0 3.0\n").unwrap_err();
        assert!(matches!(err, AssetError::Format { line: 1, .. }));
    }

    #[test]
    fn empty_input_yields_empty_model() {
        let model = parse_obj_str("").unwrap();
        assert!(model.is_empty());
        assert!(model.indices.is_empty());
        assert_eq!(model.bounds, Bounds::ZERO);
    }

    #[test]
    fn comments_and_groups_are_ignored() {
        let src = format!("# exported\no Tree\ng trunk\ns 1\nusemtl bark\n{TRIANGLE}");
        let model = parse_obj_str(&src).unwrap();
        assert_eq!(model.triangle_count(), 1);
    }

    #[test]
    fn crlf_and_trailing_space_are_tolerated() {
        let src = TRIANGLE.replace('\n', " \r\n");
        let model = parse_obj_str(&src).unwrap();
        assert_eq!(model.indices, vec![0, 1, 2]);
    }

    #[test]
    fn quad_is_fan_triangulated() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\n\
                   f 1/1/1 2/1/1 3/1/1 4/1/1\n";
        let model = parse_obj_str(src).unwrap();
        assert_eq!(model.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn quad_is_truncated_in_legacy_mode() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\n\
                   f 1/1/1 2/1/1 3/1/1 4/1/1\n";
        let options = ObjParseOptions::default().with_polygons(PolygonMode::Truncate);
        let model = parse_obj_str_with(src, options).unwrap();
        assert_eq!(model.indices, vec![0, 1, 2]);
        // The dropped corner never reaches its flat slot.
        assert_eq!(&model.positions_flat[9..12], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn interleaved_declarations_are_sized_correctly() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\n\
                   f 1/1/1 2/1/1 3/1/1\nv 5 5 5\nf 1/1/1 3/1/1 4/1/1\n";
        let model = parse_obj_str(src).unwrap();
        assert_eq!(model.positions_flat.len(), 12);
        assert_eq!(&model.positions_flat[9..12], &[5.0, 5.0, 5.0]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let src = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 1/1/1 2/1/1\n";
        let err = parse_obj_str(src).unwrap_err();
        assert!(matches!(err, AssetError::Format { line: 4, .. }), "{err}");
    }

    #[test]
    fn zero_relative_and_partial_indices_are_rejected() {
        let pools = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\n";
        for face in ["f 0/1/1 2/1/1 3/1/1", "f -1/1/1 2/1/1 3/1/1", "f 1 2 3", "f 1//1 2//1 3//1"] {
            let err = parse_obj_str(&format!("{pools}{face}\n")).unwrap_err();
            assert!(err.is_format(), "{face}: {err}");
        }
    }

    #[test]
    fn invalid_utf8_bytes_report_line() {
        let mut bytes = b"v 0 0 0\nv 1 0 0\n".to_vec();
        bytes.extend_from_slice(&[b'#', 0xff, b'\n']);
        let err = parse_obj_bytes(&bytes).unwrap_err();
        assert!(matches!(err, AssetError::Format { line: 3, .. }), "{err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_obj_file(dir.path().join("missing.obj")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn parse_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, TRIANGLE).unwrap();
        let model = parse_obj_file(&path).unwrap();
        assert_eq!(model.triangle_count(), 1);
    }
}
