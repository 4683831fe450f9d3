//! Tileset geometry and the decoded atlas images tiles are cut from.

use crate::error::MapError;
use crate::ir_map::IrTileset;
use log::debug;
use macroquad::texture::Image;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Edge length, in pixels, of the tiles in the standard tilesets.
pub const STANDARD_TILE_SIZE: u32 = 64;

/// Grid geometry and location of one tileset image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TilesetDescriptor {
    /// Used in log and error messages only.
    pub name: String,
    /// Image path, relative to the map file's directory unless absolute.
    pub image: PathBuf,
    /// Smallest tile index this tileset owns.
    pub first_gid: u32,
    /// Tiles per row.
    pub columns: u32,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    /// Gap between neighbouring tiles.
    #[serde(default)]
    pub spacing: u32, // 0 if not used
    /// Border around the whole grid.
    #[serde(default)]
    pub margin: u32, // 0 if not used
}

impl TilesetDescriptor {
    /// A tightly packed grid: no spacing, no margin.
    pub fn grid(
        name: impl Into<String>,
        image: impl Into<PathBuf>,
        first_gid: u32,
        columns: u32,
        tile_w: u32,
        tile_h: u32,
    ) -> Self {
        TilesetDescriptor {
            name: name.into(),
            image: image.into(),
            first_gid,
            columns,
            tile_w,
            tile_h,
            spacing: 0,
            margin: 0,
        }
    }

    /// The ground and water tilesets every level ships with.
    pub fn standard_pair() -> Vec<TilesetDescriptor> {
        vec![
            TilesetDescriptor::grid(
                "ground",
                "Grass Tileset.png",
                1,
                16,
                STANDARD_TILE_SIZE,
                STANDARD_TILE_SIZE,
            ),
            TilesetDescriptor::grid(
                "water",
                "Animated water tiles.png",
                257,
                70,
                STANDARD_TILE_SIZE,
                STANDARD_TILE_SIZE,
            ),
        ]
    }

    pub(crate) fn from_ir(ts: &IrTileset) -> Self {
        match ts {
            IrTileset::Atlas {
                name,
                first_gid,
                image,
                tile_w,
                tile_h,
                columns,
                spacing,
                margin,
            } => TilesetDescriptor {
                name: name.clone(),
                image: image.clone(),
                first_gid: *first_gid,
                columns: *columns,
                tile_w: *tile_w,
                tile_h: *tile_h,
                spacing: *spacing,
                margin: *margin,
            },
        }
    }
}

/// A descriptor together with its decoded, CPU-side image.
#[derive(Clone)]
pub struct Tileset {
    /// Where the image came from and how it is divided.
    pub desc: TilesetDescriptor,
    /// The whole atlas, RGBA8.
    pub image: Image,
}

impl std::fmt::Debug for Tileset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tileset")
            .field("desc", &self.desc)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Tileset {
    /// Pair a descriptor with an image that is already in memory.
    pub fn new(desc: TilesetDescriptor, image: Image) -> Self {
        Tileset { desc, image }
    }

    /// Read and decode the descriptor's image, relative to `base_dir`.
    pub fn load(desc: TilesetDescriptor, base_dir: &Path) -> Result<Self, MapError> {
        let path = base_dir.join(&desc.image);
        let bytes = std::fs::read(&path).map_err(|err| MapError::Asset {
            path: path.clone(),
            message: err.to_string(),
        })?;
        let image = Image::from_file_with_format(&bytes, None).map_err(|err| MapError::Asset {
            path: path.clone(),
            message: format!("{err:?}"),
        })?;
        debug!(
            "loaded tileset '{}' from {} ({}x{})",
            desc.name,
            path.display(),
            image.width,
            image.height
        );
        Ok(Tileset { desc, image })
    }

    /// Atlas width in pixels.
    #[inline] pub fn width(&self) -> u32 { self.image.width as u32 }
    /// Atlas height in pixels.
    #[inline] pub fn height(&self) -> u32 { self.image.height as u32 }
}

/// Tilesets ordered by first gid, each image decoded exactly once.
#[derive(Debug, Clone, Default)]
pub struct TilesetTable {
    sets: Vec<Tileset>,
}

impl TilesetTable {
    /// Wrap already loaded tilesets, sorting them by first gid.
    pub fn new(mut sets: Vec<Tileset>) -> Self {
        sets.sort_by_key(|t| t.desc.first_gid);
        TilesetTable { sets }
    }

    /// Load every descriptor's image from `base_dir`. Fails on the first missing or unreadable image.
    pub fn load(descriptors: Vec<TilesetDescriptor>, base_dir: &Path) -> Result<Self, MapError> {
        let sets = descriptors
            .into_iter()
            .map(|desc| Tileset::load(desc, base_dir))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(sets))
    }

    /// The tileset whose range contains `index`: the last one with `first_gid <= index`.
    pub fn owner_of(&self, index: u32) -> Option<(usize, &Tileset)> {
        let after = self.sets.partition_point(|t| t.desc.first_gid <= index);
        let idx = after.checked_sub(1)?;
        Some((idx, &self.sets[idx]))
    }

    /// Tileset at position `idx` in first-gid order, as returned by [`TilesetTable::owner_of`].
    pub fn get(&self, idx: usize) -> Option<&Tileset> {
        self.sets.get(idx)
    }

    /// Tilesets in first-gid order.
    pub fn iter(&self) -> impl Iterator<Item = &Tileset> {
        self.sets.iter()
    }

    /// Number of tilesets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// `true` when no tileset is loaded.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
