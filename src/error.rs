use crate::codec::{SourceRect, TileId};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single tile id could not be turned into an image.
///
/// These are content errors: one bad id in a layer does not invalidate the
/// rest of the map, so they are cheap to clone and can be memoized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Id 0 means "no tile" and has nothing to decode.
    #[error("tile id 0 is the empty tile")]
    EmptyTile,
    /// The index lies below every tileset's first gid, or no tilesets exist.
    #[error("no tileset owns tile index {index}")]
    UnknownTileset {
        /// Tile index with the flip bits cleared.
        index: u32,
    },
    /// The computed source rectangle does not fit inside the tileset image.
    #[error(
        "tile {id:?} maps to {rect:?}, outside tileset '{tileset}' ({image_w}x{image_h})"
    )]
    TileOutOfBounds {
        /// The offending raw id.
        id: TileId,
        /// Name of the tileset that owns the index.
        tileset: String,
        /// Rectangle the id decoded to.
        rect: SourceRect,
        /// Tileset image width.
        image_w: u32,
        /// Tileset image height.
        image_h: u32,
    },
}

/// Errors raised while loading a map and its tilesets.
#[derive(Debug, Error)]
pub enum MapError {
    /// A map, tileset or config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// A file was read but is not the JSON we expect.
    #[error("failed to parse JSON in {path}: {source}")]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Parser error with line and column.
        #[source]
        source: serde_json::Error,
    },
    /// The file extension is not one we can load.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// The map parsed but makes no sense, e.g. it has no tile layers.
    #[error("invalid map: {0}")]
    InvalidMap(String),
    /// A layer's data does not fill its grid.
    #[error("layer '{layer}' has {actual} tiles, expected {expected}")]
    InvalidLayerSize {
        /// Name of the layer.
        layer: String,
        /// `width * height`.
        expected: usize,
        /// Length of the `data` array.
        actual: usize,
    },
    /// A tileset image could not be opened or decoded.
    #[error("failed to load tileset image {path}: {message}")]
    Asset {
        /// Image path after joining with the base directory.
        path: PathBuf,
        /// What went wrong, from the filesystem or the decoder.
        message: String,
    },
    /// A tile could not be decoded while loading with `fail_fast` set.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
