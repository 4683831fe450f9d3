#![warn(missing_docs)]

//! Tiled JSON map loader with flip-aware tile decoding, drawn with Macroquad.
//!
//! Raw tile ids carry three orientation bits above a 29-bit index. Each
//! distinct id is decoded against the tileset table, cut out of its atlas,
//! oriented, and cached for the lifetime of the [`Map`].

pub mod cache;
pub mod codec;
pub mod config;
mod error;
pub mod flip;
mod ir_map;
mod layer;
mod loader {
    pub mod json_loader;
}
mod map;
pub mod render;
pub mod tileset;

pub use cache::{PreloadReport, TileImageCache};
pub use codec::{decode, DecodedTile, FlipFlags, SourceRect, TileId};
pub use config::{MapConfig, TilesetMode};
pub use error::{DecodeError, MapError};
pub use flip::DiagonalPolicy;
pub use layer::Layer;
pub use map::{DrawTile, Map};
pub use render::Renderer;
pub use tileset::{Tileset, TilesetDescriptor, TilesetTable};
