//! Tests for region sample caching including hit/miss tracking and invalidation

#[cfg(test)]
mod tests {
    use greedyfill::algorithm::cache::{CacheStats, RegionSampleCache};
    use greedyfill::spatial::Region;

    // Verifies a new cache starts empty with zeroed statistics
    // Verified by initializing the cache with non-zero counters
    #[test]
    fn test_cache_new() {
        let cache = RegionSampleCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.stats, CacheStats::default());
    }

    // Tests a miss on first request and a hit once the samples are stored
    // Verified by removing the hit counter increment
    #[test]
    fn test_cache_miss_and_hit() {
        let mut cache = RegionSampleCache::new();
        let region = Region::new([0, 0], [3, 3]);

        assert_eq!(cache.missing(&[region]), vec![region]);
        cache.extend([(region, vec![vec![1.0, 2.0]])]);
        assert!(cache.missing(&[region]).is_empty());

        assert_eq!(cache.get(&region), Some(&vec![vec![1.0, 2.0]]));
        assert_eq!(cache.stats.hits, 1);
        assert_eq!(cache.stats.misses, 1);
    }

    // Tests missing regions are counted, sorted and deduplicated
    // Verified by skipping the dedup step
    #[test]
    fn test_missing_regions() {
        let mut cache = RegionSampleCache::new();
        let cached = Region::new([0, 0], [3, 3]);
        let a = Region::new([5, 5], [3, 3]);
        let b = Region::new([1, 1], [3, 3]);
        cache.extend([(cached, vec![vec![0.0]])]);

        let missing = cache.missing(&[a, cached, b, a]);

        assert_eq!(missing, vec![b, a]);
        assert_eq!(cache.stats.hits, 1);
        assert_eq!(cache.stats.misses, 3);
        assert!(cache.get(&cached).is_some());
        assert_eq!(cache.stats.hits, 1);
    }

    // Tests only overlapping entries are invalidated
    // Verified by clearing the whole cache on invalidation
    #[test]
    fn test_invalidate_intersecting() {
        let mut cache = RegionSampleCache::new();
        let near = Region::new([0, 0], [3, 3]);
        let far = Region::new([10, 10], [3, 3]);
        cache.extend([(near, vec![]), (far, vec![])]);

        let removed = cache.invalidate_intersecting(&Region::new([2, 2], [2, 2]));

        assert_eq!(removed, 1);
        assert!(!cache.contains(&near));
        assert!(cache.contains(&far));
        assert_eq!(cache.stats.invalidations, 1);
    }

    // Tests clearing drops entries and statistics
    // Verified by keeping statistics across a clear
    #[test]
    fn test_clear() {
        let mut cache = RegionSampleCache::new();
        let region = Region::new([0, 0], [1, 1]);
        cache.missing(&[region]);
        cache.extend([(region, Vec::new())]);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats.misses, 0);
    }
}
