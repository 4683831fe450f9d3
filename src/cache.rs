//! Per-map memo of finished tile images.

use crate::codec::{self, TileId};
use crate::error::DecodeError;
use crate::flip::{self, DiagonalPolicy};
use crate::layer::Layer;
use crate::tileset::TilesetTable;
use log::{debug, warn};
use macroquad::texture::Image;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};

enum Slot {
    Ready(Image),
    Unresolvable(DecodeError),
}

/// Outcome of [`TileImageCache::preload`].
#[derive(Debug, Default)]
pub struct PreloadReport {
    /// Distinct ids that now have an image.
    pub resolved: usize,
    /// Distinct ids that could not be decoded, in ascending id order.
    pub failed: Vec<(TileId, DecodeError)>,
}

/// Lazily filled `TileId -> Image` table.
///
/// Each id is decoded and transformed at most once while it is cached. Lives
/// as long as the map that owns it; nothing is ever evicted.
pub struct TileImageCache {
    slots: HashMap<TileId, Slot>,
    policy: DiagonalPolicy,
    remember_failures: bool,
    warned: HashSet<TileId>,
    decodes: usize,
}

impl TileImageCache {
    /// Empty cache. With `remember_failures` off, undecodable ids are retried on every resolve.
    pub fn new(policy: DiagonalPolicy, remember_failures: bool) -> Self {
        TileImageCache {
            slots: HashMap::new(),
            policy,
            remember_failures,
            warned: HashSet::new(),
            decodes: 0,
        }
    }

    /// Image for `id`, building it on first use.
    ///
    /// `Ok(None)` for the empty tile. A failure is returned on the first attempt;
    /// afterwards it is either replayed from the cache or retried, depending on
    /// `remember_failures`.
    pub fn resolve(
        &mut self,
        id: TileId,
        tilesets: &TilesetTable,
    ) -> Result<Option<&Image>, DecodeError> {
        if id.is_empty() {
            return Ok(None);
        }

        let slot = match self.slots.entry(id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.decodes += 1;
                match build(id, tilesets, self.policy) {
                    Ok(img) => entry.insert(Slot::Ready(img)),
                    Err(err) => {
                        if self.warned.insert(id) {
                            warn!("tile {:#010x} cannot be drawn: {err}", id.raw());
                        } else {
                            debug!("tile {:#010x} still cannot be drawn: {err}", id.raw());
                        }
                        if !self.remember_failures {
                            return Err(err);
                        }
                        entry.insert(Slot::Unresolvable(err))
                    }
                }
            }
        };

        match slot {
            Slot::Ready(img) => Ok(Some(img)),
            Slot::Unresolvable(err) => Err(err.clone()),
        }
    }

    /// Cached image for `id`, without building anything.
    pub fn get(&self, id: TileId) -> Option<&Image> {
        match self.slots.get(&id) {
            Some(Slot::Ready(img)) => Some(img),
            _ => None,
        }
    }

    /// Resolve every distinct non-empty id used by `layers`.
    pub fn preload<'a>(
        &mut self,
        layers: impl IntoIterator<Item = &'a Layer>,
        tilesets: &TilesetTable,
    ) -> PreloadReport {
        let unique: BTreeSet<TileId> = layers
            .into_iter()
            .flat_map(|l| l.data.iter().copied())
            .filter(|id| !id.is_empty())
            .collect();

        let mut report = PreloadReport::default();
        for id in unique {
            match self.resolve(id, tilesets) {
                Ok(_) => report.resolved += 1,
                Err(err) => report.failed.push((id, err)),
            }
        }
        debug!(
            "preloaded {} tile images ({} failed)",
            report.resolved,
            report.failed.len()
        );
        report
    }

    /// How many times a tile has actually been decoded.
    pub fn decode_count(&self) -> usize {
        self.decodes
    }

    /// Distinct ids that have failed to decode at least once.
    pub fn failed_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.warned.iter().copied()
    }

    /// Number of ids with a finished image.
    pub fn len(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s, Slot::Ready(_)))
            .count()
    }

    /// `true` while no image has been built.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build(id: TileId, tilesets: &TilesetTable, policy: DiagonalPolicy) -> Result<Image, DecodeError> {
    let decoded = codec::decode(id, tilesets)?;
    let ts = tilesets
        .get(decoded.tileset)
        .ok_or(DecodeError::UnknownTileset { index: id.clean() })?;
    let tile = flip::extract(&ts.image, decoded.rect).ok_or_else(|| DecodeError::TileOutOfBounds {
        id,
        tileset: ts.desc.name.clone(),
        rect: decoded.rect,
        image_w: ts.width(),
        image_h: ts.height(),
    })?;
    Ok(flip::into_image(flip::orient(tile, decoded.flags, policy)))
}
