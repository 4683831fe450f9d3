//! Blitting a map's frame with Macroquad.

use crate::codec::TileId;
use crate::map::Map;
use log::debug;
use macroquad::prelude::*;
use std::collections::HashMap;

/// Owns the GPU copies of tile images; one texture per distinct tile id.
///
/// Needs a live Macroquad context, so build it inside the `#[macroquad::main]` loop.
#[derive(Default)]
pub struct Renderer {
    textures: HashMap<TileId, Texture2D>,
}

impl Renderer {
    /// A renderer with no textures uploaded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera that maps the map's fixed logical canvas onto the whole window,
    /// origin at the top-left and y growing downwards.
    pub fn logical_camera(map: &Map) -> Camera2D {
        let (w, h) = map.logical_size();
        // Camera2D::from_display_rect is y-up when drawing to the screen
        Camera2D {
            target: vec2(w / 2.0, h / 2.0),
            zoom: vec2(2.0 / w, 2.0 / h),
            ..Default::default()
        }
    }

    /// Draw every visible tile of `map`, back to front.
    pub fn draw(&mut self, map: &mut Map) {
        set_camera(&Self::logical_camera(map));

        for tile in map.frame() {
            let tex = self.textures.entry(tile.id).or_insert_with(|| {
                debug!("uploading texture for tile {:#010x}", tile.id.raw());
                let tex = Texture2D::from_image(tile.image);
                tex.set_filter(FilterMode::Nearest);
                tex
            });
            draw_texture(tex, tile.position.x, tile.position.y, WHITE);
        }

        set_default_camera();
    }

    /// Number of tile textures uploaded so far.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
