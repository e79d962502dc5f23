//! Configuration for the resampling engine.

use serde::{Deserialize, Serialize};

use crate::error::{ResamplerError, Result};

/// Configuration for the resampler and its supporting caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResamplerConfig {
    /// Number of consecutive records a windowed buffer holds.
    pub buffer_window: usize,

    /// Idle time before a cached resource is closed, in seconds.
    pub cache_ttl_secs: u64,

    /// Fraction of available memory above which a write buffer flushes.
    pub write_buffer_memory_fraction: f64,

    /// Item count at which a count-based write buffer flushes.
    pub write_buffer_max_items: usize,

    /// Grids with at least this many cells are reconstructed in parallel.
    pub parallel_min_cells: usize,
}

impl Default for ResamplerConfig {
    fn default() -> Self {
        Self {
            buffer_window: 10,
            cache_ttl_secs: 300,
            write_buffer_memory_fraction: 0.8,
            write_buffer_max_items: 64,
            parallel_min_cells: 16_384,
        }
    }
}

impl ResamplerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RESAMPLER_BUFFER_WINDOW") {
            if let Ok(size) = val.parse() {
                config.buffer_window = size;
            }
        }

        if let Ok(val) = std::env::var("RESOURCE_CACHE_TTL_SECS") {
            if let Ok(secs) = val.parse() {
                config.cache_ttl_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("WRITE_BUFFER_MEMORY_FRACTION") {
            if let Ok(fraction) = val.parse() {
                config.write_buffer_memory_fraction = fraction;
            }
        }

        if let Ok(val) = std::env::var("WRITE_BUFFER_MAX_ITEMS") {
            if let Ok(items) = val.parse() {
                config.write_buffer_max_items = items;
            }
        }

        if let Ok(val) = std::env::var("RESAMPLER_PARALLEL_MIN_CELLS") {
            if let Ok(cells) = val.parse() {
                config.parallel_min_cells = cells;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_window == 0 {
            return Err(ResamplerError::config("buffer_window must be > 0"));
        }

        if self.cache_ttl_secs == 0 {
            return Err(ResamplerError::config("cache_ttl_secs must be > 0"));
        }

        if !(self.write_buffer_memory_fraction > 0.0 && self.write_buffer_memory_fraction <= 1.0) {
            return Err(ResamplerError::config(
                "write_buffer_memory_fraction must be in (0, 1]",
            ));
        }

        if self.write_buffer_max_items == 0 {
            return Err(ResamplerError::config("write_buffer_max_items must be > 0"));
        }

        Ok(())
    }

    /// Get the cache TTL as a Duration.
    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_secs)
    }
}
