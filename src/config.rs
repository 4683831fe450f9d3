//! Loading and rendering options for a map.

use crate::error::MapError;
use crate::flip::DiagonalPolicy;
use crate::tileset::{TilesetDescriptor, STANDARD_TILE_SIZE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where tileset geometry comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilesetMode {
    /// Use these descriptors regardless of what the map declares.
    Fixed(Vec<TilesetDescriptor>),
    /// Read the map's own `tilesets` table.
    Declared,
}

impl Default for TilesetMode {
    fn default() -> Self {
        TilesetMode::Fixed(TilesetDescriptor::standard_pair())
    }
}

/// Configuration for loading and drawing a map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Grid cell size used for placement (default: 64x64)
    pub tile_width: u32,
    /// See `tile_width`.
    pub tile_height: u32,

    /// Logical canvas the map is drawn on, scaled to the window (default: 1920x1280)
    pub logical_size: (f32, f32),

    /// Tileset table to decode against (default: the standard ground and water pair)
    pub tilesets: TilesetMode,

    /// Orientation handling for the diagonal flip bit (default: compose)
    pub diagonal: DiagonalPolicy,

    /// Cache undecodable ids instead of retrying them every frame (default: true).
    /// When off, a bad id is decoded again each frame; only the first failure
    /// is logged as a warning, repeats go to `debug`.
    pub remember_failures: bool,

    /// Abort loading on the first undecodable tile (default: false)
    pub fail_fast: bool,

    /// Build every tile image at load time (default: true)
    pub preload: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_width: STANDARD_TILE_SIZE,
            tile_height: STANDARD_TILE_SIZE,
            logical_size: (1920.0, 1280.0),
            tilesets: TilesetMode::default(),
            diagonal: DiagonalPolicy::default(),
            remember_failures: true,
            fail_fast: false,
            preload: true,
        }
    }
}

impl MapConfig {
    /// Parse a config from JSON; missing fields keep their defaults.
    pub fn from_json_str(txt: &str) -> Result<Self, MapError> {
        serde_json::from_str(txt).map_err(|source| MapError::Json {
            path: PathBuf::from("<config>"),
            source,
        })
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, MapError> {
        let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&txt).map_err(|source| MapError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_standard_level() {
        let cfg = MapConfig::default();
        assert_eq!((cfg.tile_width, cfg.tile_height), (64, 64));
        assert_eq!(cfg.logical_size, (1920.0, 1280.0));
        assert_eq!(cfg.diagonal, DiagonalPolicy::Compose);
        assert!(cfg.remember_failures);
        assert!(!cfg.fail_fast);
        match cfg.tilesets {
            TilesetMode::Fixed(sets) => assert_eq!(sets.len(), 2),
            TilesetMode::Declared => panic!("expected fixed tilesets"),
        }
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = MapConfig::from_json_str(
            r#"{"diagonal":"exclusive","tilesets":"declared","fail_fast":true}"#,
        )
        .expect("config");
        assert_eq!(cfg.diagonal, DiagonalPolicy::Exclusive);
        assert_eq!(cfg.tilesets, TilesetMode::Declared);
        assert!(cfg.fail_fast);
        assert_eq!(cfg.tile_width, 64);
        assert!(cfg.preload);
    }

    #[test]
    fn fixed_tilesets_from_json() {
        let cfg = MapConfig::from_json_str(
            r#"{"tilesets":{"fixed":[{"name":"a","image":"a.png","first_gid":1,"columns":4,"tile_w":16,"tile_h":16}]}}"#,
        )
        .expect("config");
        match cfg.tilesets {
            TilesetMode::Fixed(sets) => {
                assert_eq!(sets[0].columns, 4);
                assert_eq!(sets[0].margin, 0);
            }
            TilesetMode::Declared => panic!("expected fixed tilesets"),
        }
    }

    #[test]
    fn malformed_config_is_a_json_error() {
        let err = MapConfig::from_json_str(r#"{"tile_width":"wide"}"#).unwrap_err();
        assert!(matches!(err, MapError::Json { .. }));
    }
}
