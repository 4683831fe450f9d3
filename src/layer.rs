use crate::codec::TileId;
use crate::error::MapError;

/// One named grid of raw tile ids, stored row-major (`y * width + x`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Layer name as written in the map.
    pub name: String,
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
    /// Hidden layers are kept but never drawn.
    pub visible: bool,
    /// Raw ids, `width * height` of them.
    pub data: Vec<TileId>,
}

impl Layer {
    /// Build a layer, checking that `data` fills the grid exactly.
    pub fn new(
        name: impl Into<String>,
        width: usize,
        height: usize,
        data: Vec<TileId>,
    ) -> Result<Self, MapError> {
        let name = name.into();
        let expected = width.checked_mul(height).ok_or_else(|| {
            MapError::InvalidMap(format!("layer '{name}' is too large: {width}x{height} cells"))
        })?;
        if data.len() != expected {
            return Err(MapError::InvalidLayerSize {
                layer: name,
                expected,
                actual: data.len(),
            });
        }
        Ok(Layer {
            name,
            width,
            height,
            visible: true,
            data,
        })
    }

    /// Raw id at grid position, `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<TileId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Non-empty cells as `(x, y, id)`, rows top to bottom, columns left to right.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, TileId)> + '_ {
        let width = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .filter(|(_, id)| !id.is_empty())
            .map(move |(idx, id)| (idx % width, idx / width, *id))
    }

    /// Call `f` for every non-empty cell, in the same order as [`Layer::tiles`].
    pub fn for_each_visible_tile(&self, mut f: impl FnMut(usize, usize, TileId)) {
        for (x, y, id) in self.tiles() {
            f(x, y, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<TileId> {
        raw.iter().copied().map(TileId).collect()
    }

    #[test]
    fn rejects_size_mismatch() {
        let err = Layer::new("oops", 2, 2, ids(&[1, 2, 3])).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidLayerSize { ref layer, expected: 4, actual: 3 } if layer == "oops"
        ));
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let err = Layer::new("huge", usize::MAX / 2, 4, Vec::new()).unwrap_err();
        assert!(matches!(err, MapError::InvalidMap(ref msg) if msg.contains("huge")));
    }

    #[test]
    fn get_is_row_major() {
        let layer = Layer::new("l", 3, 2, ids(&[1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(layer.get(0, 0), Some(TileId(1)));
        assert_eq!(layer.get(2, 0), Some(TileId(3)));
        assert_eq!(layer.get(0, 1), Some(TileId(4)));
        assert_eq!(layer.get(3, 0), None);
        assert_eq!(layer.get(0, 2), None);
    }

    #[test]
    fn traversal_skips_empty_cells_in_row_major_order() {
        let layer = Layer::new("l", 3, 2, ids(&[0, 7, 0, 8, 0, 9])).unwrap();
        let mut seen = Vec::new();
        layer.for_each_visible_tile(|x, y, id| seen.push((x, y, id.raw())));
        assert_eq!(seen, vec![(1, 0, 7), (0, 1, 8), (2, 1, 9)]);
    }

    #[test]
    fn all_empty_layer_yields_nothing() {
        let layer = Layer::new("void", 2, 2, ids(&[0, 0, 0, 0])).unwrap();
        assert_eq!(layer.tiles().count(), 0);
    }
}
