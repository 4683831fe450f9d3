use crate::cache::{PreloadReport, TileImageCache};
use crate::codec::TileId;
use crate::config::{MapConfig, TilesetMode};
use crate::error::{DecodeError, MapError};
use crate::ir_map::{IrLayerKind, IrMap};
use crate::layer::Layer;
use crate::loader::json_loader::{decode_map_file_to_ir, decode_map_str_to_ir};
use crate::tileset::{TilesetDescriptor, TilesetTable};
use log::info;
use macroquad::prelude::{vec2, Image, Vec2};
use std::collections::HashSet;
use std::path::Path;

/// One tile ready to blit: where it goes and what it looks like.
pub struct DrawTile<'a> {
    /// Index of the layer in draw order.
    pub layer: usize,
    /// Cell coordinates within the layer.
    pub grid: (usize, usize),
    /// Top-left corner on the logical canvas.
    pub position: Vec2,
    /// Raw id, flip bits included.
    pub id: TileId,
    /// Cut and oriented tile image.
    pub image: &'a Image,
}

/// A loaded map: layers, decoded tilesets and the tile images built from them.
pub struct Map {
    layers: Vec<Layer>,
    tilesets: TilesetTable,
    cache: TileImageCache,
    tile_w: u32,
    tile_h: u32,
    logical_size: (f32, f32),
}

impl Map {
    /// Load a `.json` / `.tmj` map and its tileset images.
    pub fn load(path: impl AsRef<Path>, config: MapConfig) -> Result<Self, MapError> {
        let path = path.as_ref();
        let declared = config.tilesets == TilesetMode::Declared;
        let (ir, base_dir) = decode_map_file_to_ir(path, declared)?;
        let map = Self::from_ir(ir, &base_dir, config)?;
        info!(
            "loaded map {} ({} layers, {} tilesets, {} tile images)",
            path.display(),
            map.layers.len(),
            map.tilesets.len(),
            map.cache.len()
        );
        Ok(map)
    }

    /// Load map JSON held in memory; tileset images are resolved against `base_dir`.
    pub fn load_from_str(json: &str, base_dir: &Path, config: MapConfig) -> Result<Self, MapError> {
        let declared = config.tilesets == TilesetMode::Declared;
        let ir = decode_map_str_to_ir(json, Path::new("<inline>"), base_dir, declared)?;
        Self::from_ir(ir, base_dir, config)
    }

    /// Build a map from the intermediate representation produced by a loader.
    pub(crate) fn from_ir(ir: IrMap, base_dir: &Path, mut config: MapConfig) -> Result<Self, MapError> {
        let descriptors = match &config.tilesets {
            TilesetMode::Fixed(sets) => sets.clone(),
            TilesetMode::Declared => {
                if let (Some(w), Some(h)) = (ir.tile_w, ir.tile_h) {
                    config.tile_width = w;
                    config.tile_height = h;
                }
                ir.tilesets.iter().map(TilesetDescriptor::from_ir).collect()
            }
        };

        let mut layers = Vec::with_capacity(ir.layers.len());
        for l in ir.layers {
            if let IrLayerKind::Tiles { width, height, data } = l.kind {
                let mut layer = Layer::new(l.name, width, height, data.into_iter().map(TileId).collect())?;
                layer.visible = l.visible;
                layers.push(layer);
            }
        }
        if layers.is_empty() {
            return Err(MapError::InvalidMap("no tile layers found".into()));
        }

        let tilesets = TilesetTable::load(descriptors, base_dir)?;
        Self::from_parts(layers, tilesets, config)
    }

    /// Assemble a map from already-built parts. Preloads tile images when configured to.
    pub fn from_parts(
        layers: Vec<Layer>,
        tilesets: TilesetTable,
        config: MapConfig,
    ) -> Result<Self, MapError> {
        let mut map = Map {
            layers,
            tilesets,
            cache: TileImageCache::new(config.diagonal, config.remember_failures),
            tile_w: config.tile_width,
            tile_h: config.tile_height,
            logical_size: config.logical_size,
        };

        if config.preload || config.fail_fast {
            let report = map.preload();
            if config.fail_fast {
                if let Some((_, err)) = report.failed.into_iter().next() {
                    return Err(MapError::Decode(err));
                }
            }
        }
        Ok(map)
    }

    /// Build the image of every distinct tile used by any layer.
    pub fn preload(&mut self) -> PreloadReport {
        self.cache.preload(&self.layers, &self.tilesets)
    }

    /// Tile layers in file order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// First layer called `name`.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// The tilesets ids are decoded against.
    pub fn tilesets(&self) -> &TilesetTable {
        &self.tilesets
    }

    /// Tile images built so far.
    pub fn cache(&self) -> &TileImageCache {
        &self.cache
    }

    /// Grid cell size in logical pixels.
    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_w, self.tile_h)
    }

    /// Size of the canvas the map is laid out on.
    pub fn logical_size(&self) -> (f32, f32) {
        self.logical_size
    }

    /// Image for a single raw id, building it if needed.
    pub fn resolve(&mut self, id: TileId) -> Result<Option<&Image>, DecodeError> {
        self.cache.resolve(id, &self.tilesets)
    }

    /// Top-left corner of grid cell `(x, y)` on the logical canvas.
    #[inline]
    pub fn screen_position(&self, x: usize, y: usize) -> Vec2 {
        vec2(x as f32 * self.tile_w as f32, y as f32 * self.tile_h as f32)
    }

    /// Everything to draw this frame, back to front: layers in file order,
    /// each layer row by row. Empty cells and undecodable tiles are left out.
    pub fn frame(&mut self) -> Vec<DrawTile<'_>> {
        let mut placements = Vec::new();
        for (li, layer) in self.layers.iter().enumerate() {
            if !layer.visible {
                continue;
            }
            layer.for_each_visible_tile(|x, y, id| placements.push((li, x, y, id)));
        }

        let mut seen = HashSet::new();
        for &(_, _, _, id) in &placements {
            if seen.insert(id) {
                // failures are logged by the cache and simply not drawn
                let _ = self.cache.resolve(id, &self.tilesets);
            }
        }

        let cache = &self.cache;
        placements
            .into_iter()
            .filter_map(|(layer, x, y, id)| {
                cache.get(id).map(|image| DrawTile {
                    layer,
                    grid: (x, y),
                    position: self.screen_position(x, y),
                    id,
                    image,
                })
            })
            .collect()
    }
}
