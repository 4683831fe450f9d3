// src/loader/json_loader.rs
use crate::error::MapError;
use crate::ir_map::*;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" expected here
}

fn default_true() -> bool {
    true
}

/// Entry of the map's tileset table: either embedded or a `source` reference.
#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(flatten)]
    embedded: JsonTileset,
}

#[derive(Deserialize, Default)]
struct JsonTileset {
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    columns: u32,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
}

#[derive(Deserialize)]
struct JsonMap {
    #[serde(default)]
    tilewidth: Option<u32>,
    #[serde(default)]
    tileheight: Option<u32>,
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
}

const MAP_EXTENSIONS: [&str; 2] = ["json", "tmj"];
const TILESET_EXTENSIONS: [&str; 2] = ["json", "tsj"];

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| allowed.contains(&ext))
}

/// Read and decode a Tiled JSON map from disk.
///
/// Returns the IR together with the map's directory, against which tileset
/// images are resolved. The tileset table is only followed when
/// `read_tilesets` is set.
pub fn decode_map_file_to_ir(path: &Path, read_tilesets: bool) -> Result<(IrMap, PathBuf), MapError> {
    if !has_extension(path, &MAP_EXTENSIONS) {
        return Err(MapError::UnsupportedFormat(path.display().to_string()));
    }

    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let map_dir = path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    let ir = decode_map_str_to_ir(&txt, path, &map_dir, read_tilesets)?;
    Ok((ir, map_dir))
}

/// Decode map JSON already in memory. `origin` only labels errors.
pub fn decode_map_str_to_ir(
    txt: &str,
    origin: &Path,
    map_dir: &Path,
    read_tilesets: bool,
) -> Result<IrMap, MapError> {
    let j: JsonMap = serde_json::from_str(txt).map_err(|source| MapError::Json {
        path: origin.to_path_buf(),
        source,
    })?;

    let mut ir_tilesets = Vec::new();
    if read_tilesets {
        ir_tilesets.reserve(j.tilesets.len());
        for ts in j.tilesets {
            ir_tilesets.push(tileset_to_ir(ts, map_dir)?);
        }
        ir_tilesets.sort_by_key(IrTileset::first_gid);
    }

    let mut ir_layers = Vec::with_capacity(j.layers.len());
    for l in j.layers {
        let kind = match l.kind.as_deref().unwrap_or("tilelayer") {
            "tilelayer" => IrLayerKind::Tiles {
                width: l.width,
                height: l.height,
                data: l.data,
            },
            other => {
                debug!("skipping {other} layer '{}'", l.name);
                IrLayerKind::Unsupported(other.to_owned())
            }
        };
        ir_layers.push(IrLayer {
            name: l.name,
            visible: l.visible,
            kind,
        });
    }

    Ok(IrMap {
        tile_w: j.tilewidth,
        tile_h: j.tileheight,
        tilesets: ir_tilesets,
        layers: ir_layers,
    })
}

fn tileset_to_ir(ts: JsonTilesetRef, map_dir: &Path) -> Result<IrTileset, MapError> {
    let def = match &ts.source {
        Some(source) => read_external_tileset(source, map_dir)?,
        None => ts.embedded,
    };

    let image = def.image.ok_or_else(|| {
        MapError::InvalidMap(format!(
            "tileset at firstgid {} has no atlas image",
            ts.firstgid
        ))
    })?;
    if def.columns == 0 || def.tilewidth == 0 || def.tileheight == 0 {
        return Err(MapError::InvalidMap(format!(
            "tileset '{}' at firstgid {} has an empty grid",
            def.name, ts.firstgid
        )));
    }

    // External tilesets reference their image relative to themselves.
    let image = match ts.source.as_deref().and_then(|s| Path::new(s).parent()) {
        Some(dir) => dir.join(image),
        None => PathBuf::from(image),
    };

    Ok(IrTileset::Atlas {
        name: def.name,
        first_gid: ts.firstgid,
        image,
        tile_w: def.tilewidth,
        tile_h: def.tileheight,
        columns: def.columns,
        spacing: def.spacing,
        margin: def.margin,
    })
}

fn read_external_tileset(source: &str, map_dir: &Path) -> Result<JsonTileset, MapError> {
    if !has_extension(Path::new(source), &TILESET_EXTENSIONS) {
        return Err(MapError::InvalidMap(format!(
            "External tileset must be JSON: {source}"
        )));
    }
    let ts_path = map_dir.join(source);
    let txt = std::fs::read_to_string(&ts_path).map_err(|source| MapError::Io {
        path: ts_path.clone(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: ts_path,
        source,
    })
}
