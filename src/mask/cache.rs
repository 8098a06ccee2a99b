use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, OnceLock};

use crate::foundation::core::{Lattice, ViewportMetrics};
use crate::foundation::error::PerfResult;
use crate::foundation::math::quantize_1e4;
use crate::mask::bitmap::MaskBitmap;
use crate::mask::raster::{build_tile, build_viewport};

/// Default number of masks retained before the least recently used is evicted.
pub const DEFAULT_MASK_CACHE_CAPACITY: usize = 64;

/// Geometry key identifying one rasterized mask. Floats are quantized to 1e-4 px.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaskKey {
    /// Repeating cell at a device pixel ratio.
    Tile {
        /// Lattice.
        lattice: Lattice,
        /// Quantized pitch.
        pitch_q: i64,
        /// Quantized radius.
        radius_q: i64,
        /// Device pixel ratio (rounded, ≥ 1).
        dpr: u32,
    },
    /// Whole-viewport bitmap.
    Viewport {
        /// Lattice.
        lattice: Lattice,
        /// Quantized pitch.
        pitch_q: i64,
        /// Quantized radius.
        radius_q: i64,
        /// Viewport width.
        width: u32,
        /// Viewport height.
        height: u32,
    },
}

impl MaskKey {
    /// Key for the tile strategy.
    pub fn tile(lattice: Lattice, pitch_px: f64, radius_px: f64, dpr: u32) -> Self {
        Self::Tile {
            lattice,
            pitch_q: quantize_1e4(pitch_px),
            radius_q: quantize_1e4(radius_px),
            dpr: dpr.max(1),
        }
    }

    /// Key for the full-viewport strategy.
    pub fn viewport(
        lattice: Lattice,
        pitch_px: f64,
        radius_px: f64,
        viewport: ViewportMetrics,
    ) -> Self {
        Self::Viewport {
            lattice,
            pitch_q: quantize_1e4(pitch_px),
            radius_q: quantize_1e4(radius_px),
            width: viewport.width.max(1),
            height: viewport.height.max(1),
        }
    }
}

/// Counters describing cache effectiveness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaskCacheStats {
    /// Lookups answered from the store.
    pub hits: u64,
    /// Masks rasterized.
    pub builds: u64,
    /// Entries dropped by the LRU bound.
    pub evictions: u64,
    /// Entries currently retained.
    pub retained: usize,
}

/// Keyed store of rasterized masks with a least-recently-used bound.
///
/// Entries are immutable; a hit hands out the same `Arc` that was built the first time.
pub struct MaskCache {
    capacity: usize,
    entries: HashMap<MaskKey, Arc<MaskBitmap>>,
    lru: VecDeque<MaskKey>,
    stats: MaskCacheStats,
}

impl Default for MaskCache {
    fn default() -> Self {
        Self::new(DEFAULT_MASK_CACHE_CAPACITY)
    }
}

impl MaskCache {
    /// Empty cache retaining at most `capacity` masks (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            lru: VecDeque::new(),
            stats: MaskCacheStats::default(),
        }
    }

    /// Capacity from `PERFVIEW_MASK_CACHE_CAPACITY`, falling back to the default.
    pub fn from_env() -> Self {
        let capacity = std::env::var("PERFVIEW_MASK_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MASK_CACHE_CAPACITY);
        Self::new(capacity)
    }

    /// Process-wide instance, created on first use from [`MaskCache::from_env`].
    pub fn shared() -> Arc<Mutex<MaskCache>> {
        static SHARED: OnceLock<Arc<Mutex<MaskCache>>> = OnceLock::new();
        SHARED
            .get_or_init(|| Arc::new(Mutex::new(MaskCache::from_env())))
            .clone()
    }

    /// Maximum retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> MaskCacheStats {
        MaskCacheStats {
            retained: self.entries.len(),
            ..self.stats
        }
    }

    /// Whether a mask for `key` is retained.
    pub fn contains(&self, key: &MaskKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop every entry; counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    /// Tile mask for the geometry, rasterized on first request.
    pub fn get_or_build_tile(
        &mut self,
        lattice: Lattice,
        pitch_px: f64,
        radius_px: f64,
        dpr: u32,
    ) -> PerfResult<Arc<MaskBitmap>> {
        let key = MaskKey::tile(lattice, pitch_px, radius_px, dpr);
        self.get_or_build(key, || build_tile(lattice, pitch_px, radius_px, dpr))
    }

    /// Full-viewport mask for the geometry, rasterized on first request.
    pub fn get_or_build_viewport(
        &mut self,
        lattice: Lattice,
        pitch_px: f64,
        radius_px: f64,
        viewport: ViewportMetrics,
    ) -> PerfResult<Arc<MaskBitmap>> {
        let key = MaskKey::viewport(lattice, pitch_px, radius_px, viewport);
        self.get_or_build(key, || build_viewport(lattice, pitch_px, radius_px, viewport))
    }

    fn get_or_build(
        &mut self,
        key: MaskKey,
        build: impl FnOnce() -> PerfResult<MaskBitmap>,
    ) -> PerfResult<Arc<MaskBitmap>> {
        if let Some(mask) = self.entries.get(&key).cloned() {
            self.stats.hits = self.stats.hits.saturating_add(1);
            self.touch(key);
            tracing::trace!(?key, "mask cache hit");
            return Ok(mask);
        }

        let mask = Arc::new(build()?);
        self.stats.builds = self.stats.builds.saturating_add(1);
        self.insert(key, mask.clone());
        Ok(mask)
    }

    fn touch(&mut self, key: MaskKey) {
        if let Some(pos) = self.lru.iter().position(|k| *k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }

    fn insert(&mut self, key: MaskKey, mask: Arc<MaskBitmap>) {
        self.entries.insert(key, mask);
        self.touch(key);
        while self.entries.len() > self.capacity {
            let Some(old) = self.lru.pop_front() else {
                break;
            };
            self.entries.remove(&old);
            self.stats.evictions = self.stats.evictions.saturating_add(1);
            tracing::debug!(key = ?old, "mask cache eviction");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/cache.rs"]
mod tests;
