//! Cutting tiles out of a tileset image and orienting them according to their flip bits.

use crate::codec::{FlipFlags, SourceRect};
use image::{imageops, GenericImageView, ImageBuffer, Rgba, RgbaImage};
use macroquad::texture::Image;
use serde::Deserialize;

/// How the diagonal bit interacts with the horizontal and vertical bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagonalPolicy {
    /// Transpose, then mirror horizontally, then vertically: all eight orientations.
    #[default]
    Compose,
    /// A set diagonal bit transposes and the other two bits are ignored.
    Exclusive,
}

/// Borrow a Macroquad image as an `image` buffer without copying.
fn view(img: &Image) -> Option<ImageBuffer<Rgba<u8>, &[u8]>> {
    ImageBuffer::from_raw(img.width as u32, img.height as u32, img.bytes.as_slice())
}

/// Copy `rect` out of `src`.
///
/// `None` if `rect` reaches past the image, or if `src`'s bytes don't cover its dimensions.
pub fn extract(src: &Image, rect: SourceRect) -> Option<RgbaImage> {
    let atlas = view(src)?;
    let (w, h) = atlas.dimensions();
    if !rect.fits_within(w, h) {
        return None;
    }
    let sub = imageops::crop_imm(&atlas, rect.x, rect.y, rect.w, rect.h);
    Some(RgbaImage::from_fn(rect.w, rect.h, |x, y| sub.get_pixel(x, y)))
}

/// Orient `tile` according to `flags`. Leaves it untouched when no flag is set.
pub fn orient(mut tile: RgbaImage, flags: FlipFlags, policy: DiagonalPolicy) -> RgbaImage {
    let (transpose, mirror_h, mirror_v) = match (flags.diagonal, policy) {
        (true, DiagonalPolicy::Exclusive) => (true, false, false),
        _ => (flags.diagonal, flags.horizontal, flags.vertical),
    };

    if transpose {
        // (x, y) -> (y, x)
        tile = imageops::flip_horizontal(&imageops::rotate90(&tile));
    }
    if mirror_h {
        imageops::flip_horizontal_in_place(&mut tile);
    }
    if mirror_v {
        imageops::flip_vertical_in_place(&mut tile);
    }
    tile
}

/// Hand a finished tile over to Macroquad.
pub fn into_image(tile: RgbaImage) -> Image {
    let (w, h) = tile.dimensions();
    // tiles are cut from a Macroquad image, so both sides fit in u16
    Image {
        width: w as u16,
        height: h as u16,
        bytes: tile.into_raw(),
    }
}
