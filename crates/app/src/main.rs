//! `meshinfo`: load an OBJ mesh (and optionally its texture) the way the
//! renderer does at startup and report what would be uploaded.

use std::path::PathBuf;

use anyhow::{Context, Result};
use asset::{
    IndexMode, Mesh, MeshBuilder, ObjParseOptions, PolygonMode, TextureData, import_scene_async,
    parse_obj_file_with,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "meshinfo", version, about = "Load an OBJ mesh and summarize its GPU buffers")]
struct Cli {
    /// OBJ file to load
    obj: PathBuf,

    /// Color texture to decode alongside the mesh
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Key vertices by position index (legacy layout) instead of by unique corner
    #[arg(long)]
    legacy_index: bool,

    /// Keep only the first three corners of each face instead of triangulating
    #[arg(long)]
    truncate_polygons: bool,

    /// Use the library importer on a background task (adds tangent frames)
    #[arg(long)]
    import: bool,
}

async fn load_mesh(cli: &Cli) -> Result<Mesh> {
    if cli.import {
        return import_scene_async(cli.obj.clone())
            .await
            .with_context(|| format!("Failed to import {}", cli.obj.display()));
    }

    let polygons = if cli.truncate_polygons {
        PolygonMode::Truncate
    } else {
        PolygonMode::Triangulate
    };
    let indexing = if cli.legacy_index {
        IndexMode::PositionKeyed
    } else {
        IndexMode::Deduplicated
    };

    let model = parse_obj_file_with(&cli.obj, ObjParseOptions::default().with_polygons(polygons))
        .with_context(|| format!("Failed to parse {}", cli.obj.display()))?;
    Ok(MeshBuilder::new().indexing(indexing).build(&model))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Loading {:?} (import={}, legacy_index={})", cli.obj, cli.import, cli.legacy_index);

    let mesh = load_mesh(&cli).await?;
    if !mesh.is_valid() {
        log::warn!("{:?} produced no drawable triangles", cli.obj);
    }

    log::info!(
        "Mesh: {} vertices, {} triangles, {} index bytes",
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.index_bytes().len()
    );
    for attr in mesh.layout() {
        log::info!(
            "  slot {:>2} {:?}: {} bytes (stride {})",
            attr.slot,
            attr.kind,
            mesh.attribute_bytes(*attr).len(),
            attr.stride()
        );
    }
    log::info!(
        "Bounds: min={:?} max={:?} size={:?}",
        mesh.bounds.min,
        mesh.bounds.max,
        mesh.bounds.size()
    );

    let texture = match &cli.texture {
        Some(path) => TextureData::load(path)
            .with_context(|| format!("Failed to load texture {}", path.display()))?
            .flipped_vertically(),
        None => TextureData::checkerboard(64),
    };
    log::info!("Texture: {}x{} {:?}", texture.width, texture.height, texture.format);

    Ok(())
}
