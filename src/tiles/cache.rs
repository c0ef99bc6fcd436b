use crate::{
    core::{
        geo::TileIndex,
        viewport::{GridTile, TileGrid},
    },
    prelude::HashMap,
    Result,
};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

const DEFAULT_CAPACITY: usize = 256;

/// The external image service. Failures are expected and never fatal.
pub trait TileProvider {
    fn fetch(&mut self, tile: TileIndex, url: &str) -> Result<Vec<u8>>;
}

impl<F> TileProvider for F
where
    F: FnMut(TileIndex, &str) -> Result<Vec<u8>>,
{
    fn fetch(&mut self, tile: TileIndex, url: &str) -> Result<Vec<u8>> {
        self(tile, url)
    }
}

/// What a grid cell shows
#[derive(Debug, Clone, PartialEq)]
pub enum TileImage {
    Loaded(Arc<Vec<u8>>),
    /// Fetch failed or nothing to show; rendered as empty space
    Empty,
}

impl TileImage {
    pub fn is_loaded(&self) -> bool {
        matches!(self, TileImage::Loaded(_))
    }
}

/// Provider front with an LRU cache keyed by fetch address.
///
/// Failed fetches are not cached so the next grid refresh retries them.
pub struct TileStore<P: TileProvider> {
    provider: P,
    cache: LruCache<TileIndex, Arc<Vec<u8>>>,
    failures: usize,
}

impl<P: TileProvider> TileStore<P> {
    pub fn new(provider: P, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            provider,
            cache: LruCache::new(capacity),
            failures: 0,
        }
    }

    pub fn with_default_capacity(provider: P) -> Self {
        Self::new(provider, DEFAULT_CAPACITY)
    }

    /// Image for one grid cell, fetching on a cache miss
    pub fn tile(&mut self, tile: &GridTile) -> TileImage {
        if let Some(data) = self.cache.get(&tile.fetch) {
            return TileImage::Loaded(Arc::clone(data));
        }

        match self.provider.fetch(tile.fetch, &tile.url) {
            Ok(data) => {
                let data = Arc::new(data);
                self.cache.put(tile.fetch, Arc::clone(&data));
                TileImage::Loaded(data)
            }
            Err(e) => {
                self.failures += 1;
                log::warn!("Failed to load tile {:?}: {}", tile.fetch, e);
                TileImage::Empty
            }
        }
    }

    /// Images for every cell of `grid`, keyed by the cell's raw index
    pub fn load_grid(&mut self, grid: &TileGrid) -> HashMap<TileIndex, TileImage> {
        grid.iter().map(|tile| (tile.raw, self.tile(tile))).collect()
    }

    pub fn contains(&self, tile: &TileIndex) -> bool {
        self.cache.contains(tile)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// Fetches that have failed since creation
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::geo::GeoPoint, tiles::source::UrlTemplateSource, Error};

    fn grid() -> TileGrid {
        TileGrid::compute(
            &GeoPoint::new(20.0, 0.0),
            3,
            512.0,
            256.0,
            256,
            1,
            &UrlTemplateSource::default(),
        )
    }

    #[test]
    fn test_cache_hits_skip_provider() {
        let mut calls = 0;
        {
            let provider = |_tile: TileIndex, _url: &str| -> Result<Vec<u8>> {
                calls += 1;
                Ok(vec![1, 2, 3])
            };
            let mut store = TileStore::new(provider, 64);
            let grid = grid();
            let first = store.load_grid(&grid);
            let second = store.load_grid(&grid);
            assert_eq!(first.len(), grid.len());
            assert!(second.values().all(TileImage::is_loaded));
        }
        // Clamped rows share fetch addresses, so fewer fetches than cells.
        assert!(calls > 0 && calls <= grid().len());
    }

    #[test]
    fn test_failures_degrade_to_empty() {
        let provider = |tile: TileIndex, _url: &str| -> Result<Vec<u8>> {
            if tile.x % 2 == 0 {
                Err(Error::Tile("offline".to_string()))
            } else {
                Ok(vec![0xff])
            }
        };
        let mut store = TileStore::with_default_capacity(provider);
        let images = store.load_grid(&grid());

        assert!(images.values().any(|i| *i == TileImage::Empty));
        assert!(images.values().any(TileImage::is_loaded));
        assert!(store.failures() > 0);
        assert!(store.len() < images.len());
    }

    #[test]
    fn test_zero_capacity_falls_back() {
        let store = TileStore::new(|_: TileIndex, _: &str| -> Result<Vec<u8>> { Ok(Vec::new()) }, 0);
        assert_eq!(store.capacity(), DEFAULT_CAPACITY);
        assert!(store.is_empty());
    }
}
