#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const TILE: u32 = 64;

/// Atlas whose pixels encode `[local tile index, x in tile, y in tile, 255]`.
pub fn write_atlas(path: &Path, columns: u32, rows: u32) {
    let img = RgbaImage::from_fn(columns * TILE, rows * TILE, |x, y| {
        let local = (y / TILE) * columns + x / TILE;
        Rgba([local as u8, (x % TILE) as u8, (y % TILE) as u8, 255])
    });
    img.save(path).expect("failed to write atlas");
}

/// Directory with the two standard tilesets: grass (16x2 cells) and water (70x1 cells).
pub fn standard_assets() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write_atlas(&dir.path().join("Grass Tileset.png"), 16, 2);
    write_atlas(&dir.path().join("Animated water tiles.png"), 70, 1);
    dir
}

pub fn write_map(dir: &Path, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, json).expect("failed to write map");
    path
}

/// `[r, g, b, a]` of pixel `(x, y)`.
pub fn pixel(img: &macroquad::texture::Image, x: usize, y: usize) -> [u8; 4] {
    let i = (y * img.width as usize + x) * 4;
    [img.bytes[i], img.bytes[i + 1], img.bytes[i + 2], img.bytes[i + 3]]
}
