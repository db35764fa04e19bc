use crate::spatial::Region;
use std::collections::HashMap;

/// Per-channel samples gathered from one region
pub type RegionSamples = Vec<Vec<f64>>;

/// Memoization cache for per-region gradient samples
///
/// Source patches are compared against many targets over a run, so their
/// gradient samples are stored by region. Entries are invalidated whenever a
/// fill touches their region, which keeps the cache consistent with the
/// current image.
#[derive(Default, Debug)]
pub struct RegionSampleCache {
    /// Region to samples mapping
    entries: HashMap<Region, RegionSamples>,

    /// Cache performance statistics
    pub stats: CacheStats,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of entries dropped because their region changed
    pub invalidations: usize,
}

impl RegionSampleCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry and reset statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    /// Number of cached regions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when samples for `region` are cached
    pub fn contains(&self, region: &Region) -> bool {
        self.entries.contains_key(region)
    }

    /// Cached samples without touching the statistics
    pub fn get(&self, region: &Region) -> Option<&RegionSamples> {
        self.entries.get(region)
    }

    /// Regions from `regions` that are not cached yet, without duplicates
    ///
    /// Every requested region is counted as a hit or a miss.
    pub fn missing(&mut self, regions: &[Region]) -> Vec<Region> {
        let mut missing: Vec<Region> = Vec::new();
        for region in regions {
            if self.entries.contains_key(region) {
                self.stats.hits += 1;
            } else {
                self.stats.misses += 1;
                missing.push(*region);
            }
        }
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    /// Store samples computed elsewhere, for example in parallel
    pub fn extend<I>(&mut self, computed: I)
    where
        I: IntoIterator<Item = (Region, RegionSamples)>,
    {
        self.entries.extend(computed);
    }

    /// Drop every entry whose region overlaps `region`
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_intersecting(&mut self, region: &Region) -> usize {
        let before = self.entries.len();
        self.entries.retain(|cached, _| !cached.intersects(region));
        let removed = before - self.entries.len();
        self.stats.invalidations += removed;
        removed
    }
}
