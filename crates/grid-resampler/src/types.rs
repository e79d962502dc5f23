//! Small shared value types.

/// Statistics about a windowed buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferStats {
    /// Reads served from the current window.
    pub hits: u64,
    /// Reads that fell outside the window.
    pub misses: u64,
    /// Number of times the window was reloaded.
    pub reloads: u64,
    /// Records currently held.
    pub entries: usize,
}

impl BufferStats {
    /// Calculate the buffer hit rate (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Statistics about an expiring resource cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found a live resource.
    pub hits: u64,
    /// Lookups for absent keys.
    pub misses: u64,
    /// Resources closed because their TTL ran out.
    pub expirations: u64,
    /// Resources closed explicitly or displaced by a newer `put`.
    pub evictions: u64,
    /// Resources currently held.
    pub entries: usize,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_stats_hit_rate() {
        let mut stats = BufferStats::default();
        assert!((stats.hit_rate() - 0.0).abs() < f64::EPSILON);

        stats.hits = 90;
        stats.misses = 10;
        assert!((stats.hit_rate() - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
