//! Decoding of raw tile ids into a tileset, a local index and a source rectangle.

use crate::error::DecodeError;
use crate::tileset::TilesetTable;

/// Mirror left-right.
pub const FLIP_H: u32 = 0x8000_0000; // bit 31
/// Mirror top-bottom.
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
/// Swap x and y.
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
/// All three orientation bits.
pub const FLIP_MASK: u32 = FLIP_H | FLIP_V | FLIP_D;
/// The tile index part of a raw id.
pub const GID_MASK: u32 = !FLIP_MASK; // keep lower 29 bits

/// A tile reference exactly as stored in a layer: 1-based index plus flip bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl TileId {
    /// Nothing to draw.
    pub const EMPTY: TileId = TileId(0);

    /// The id as stored, flip bits included.
    #[inline] pub fn raw(self) -> u32 { self.0 }
    /// Tile index with the flip bits cleared.
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    /// `true` for id 0.
    #[inline] pub fn is_empty(self) -> bool { self.0 == 0 }
    /// Horizontal flip bit.
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    /// Vertical flip bit.
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    /// Diagonal flip bit.
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }

    /// All three flip bits at once.
    pub fn flags(self) -> FlipFlags {
        FlipFlags {
            horizontal: self.flip_h(),
            vertical: self.flip_v(),
            diagonal: self.flip_d(),
        }
    }
}

impl From<u32> for TileId {
    fn from(raw: u32) -> Self {
        TileId(raw)
    }
}

/// Orientation bits carried by a [`TileId`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FlipFlags {
    /// Mirror left-right.
    pub horizontal: bool,
    /// Mirror top-bottom.
    pub vertical: bool,
    /// Swap x and y.
    pub diagonal: bool,
}

impl FlipFlags {
    /// Upright tile.
    pub const NONE: FlipFlags = FlipFlags {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };

    /// `true` when at least one bit is set.
    pub fn any(self) -> bool {
        self.horizontal || self.vertical || self.diagonal
    }

    /// The high bits these flags occupy in a raw id.
    pub fn bits(self) -> u32 {
        let mut bits = 0;
        if self.horizontal {
            bits |= FLIP_H;
        }
        if self.vertical {
            bits |= FLIP_V;
        }
        if self.diagonal {
            bits |= FLIP_D;
        }
        bits
    }
}

/// Pixel rectangle inside a tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl SourceRect {
    /// Rectangle with top-left `(x, y)` and size `w` x `h`.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        SourceRect { x, y, w, h }
    }

    /// One past the last column.
    #[inline] pub fn right(&self) -> u32 { self.x.saturating_add(self.w) }
    /// One past the last row.
    #[inline] pub fn bottom(&self) -> u32 { self.y.saturating_add(self.h) }

    /// `[left, top, right, bottom]`
    pub fn corners(&self) -> [u32; 4] {
        [self.x, self.y, self.right(), self.bottom()]
    }

    /// `true` if the rectangle lies entirely inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// Everything needed to cut a tile out of its tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTile {
    /// Position of the owning tileset inside the [`TilesetTable`].
    pub tileset: usize,
    /// Index relative to the tileset's first gid (0 = top-left cell).
    pub local: u32,
    /// Grid column of the cell.
    pub col: u32,
    /// Grid row of the cell.
    pub row: u32,
    /// Orientation to apply after cutting.
    pub flags: FlipFlags,
    /// Where the cell sits in the tileset image.
    pub rect: SourceRect,
}

/// Decode `id` against `tilesets`.
///
/// Callers are expected to skip empty cells; id 0 yields [`DecodeError::EmptyTile`].
pub fn decode(id: TileId, tilesets: &TilesetTable) -> Result<DecodedTile, DecodeError> {
    if id.is_empty() {
        return Err(DecodeError::EmptyTile);
    }

    let index = id.clean();
    let (ts_idx, ts) = tilesets
        .owner_of(index)
        .ok_or(DecodeError::UnknownTileset { index })?;
    let desc = &ts.desc;
    if desc.columns == 0 {
        return Err(DecodeError::UnknownTileset { index });
    }

    let local = index - desc.first_gid;
    let col = local % desc.columns;
    let row = local / desc.columns;

    // u64 so that a bogus index far past the image cannot wrap back into range.
    let x = desc.margin as u64 + col as u64 * (desc.tile_w as u64 + desc.spacing as u64);
    let y = desc.margin as u64 + row as u64 * (desc.tile_h as u64 + desc.spacing as u64);
    let fits = x + desc.tile_w as u64 <= ts.width() as u64
        && y + desc.tile_h as u64 <= ts.height() as u64;

    let rect = SourceRect::new(
        u32::try_from(x).unwrap_or(u32::MAX),
        u32::try_from(y).unwrap_or(u32::MAX),
        desc.tile_w,
        desc.tile_h,
    );
    if !fits {
        return Err(DecodeError::TileOutOfBounds {
            id,
            tileset: desc.name.clone(),
            rect,
            image_w: ts.width(),
            image_h: ts.height(),
        });
    }

    Ok(DecodedTile {
        tileset: ts_idx,
        local,
        col,
        row,
        flags: id.flags(),
        rect,
    })
}
