// src/ir_map.rs
use std::path::PathBuf;

/// Canonical, format-agnostic map.
#[derive(Debug)]
pub struct IrMap {
    /// Grid cell size declared by the map, if any.
    pub tile_w: Option<u32>,
    pub tile_h: Option<u32>,
    pub tilesets: Vec<IrTileset>, // sorted by first_gid
    pub layers: Vec<IrLayer>,     // draw order: array order
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrTileset {
    /// One image atlas with a regular grid.
    Atlas {
        name: String,
        first_gid: u32,
        image: PathBuf, // relative to the map directory
        tile_w: u32,
        tile_h: u32,
        columns: u32,
        spacing: u32,
        margin: u32,
    },
}

impl IrTileset {
    pub fn first_gid(&self) -> u32 {
        match self {
            IrTileset::Atlas { first_gid, .. } => *first_gid,
        }
    }
}

#[derive(Debug)]
pub enum IrLayerKind {
    Tiles {
        width: usize,
        height: usize,
        data: Vec<u32>, // raw GIDs, flip flags included
    },
    /// Object groups, image layers and anything else we do not draw.
    Unsupported(String),
}

#[derive(Debug)]
pub struct IrLayer {
    pub name: String,
    pub visible: bool,
    pub kind: IrLayerKind,
}
