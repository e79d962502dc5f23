//! Backpressure between grid producers and a slower writer.

mod write_buffer;

pub use write_buffer::WriteBuffer;

use crate::config::ResamplerConfig;

/// Decides when a write buffer must be flushed.
pub trait PressureSignal: Send + Sync {
    /// Whether the buffer, currently holding `buffered` items, must flush
    /// before accepting another.
    fn is_under_pressure(&self, buffered: usize) -> bool;
}

/// Flush once a fixed number of items is buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemThreshold(pub usize);

impl ItemThreshold {
    pub fn from_config(config: &ResamplerConfig) -> Self {
        Self(config.write_buffer_max_items)
    }
}

impl PressureSignal for ItemThreshold {
    fn is_under_pressure(&self, buffered: usize) -> bool {
        buffered >= self.0
    }
}

/// Flush once memory in use exceeds a fraction of the maximum available.
///
/// The probe returns `(used, max)` in any consistent unit. A probe that
/// reports a zero maximum never signals pressure.
pub struct MemoryFraction<P> {
    probe: P,
    fraction: f64,
}

impl<P> MemoryFraction<P>
where
    P: Fn() -> (u64, u64) + Send + Sync,
{
    /// Default threshold: 80% of the maximum.
    pub const DEFAULT_FRACTION: f64 = 0.8;

    pub fn new(probe: P) -> Self {
        Self {
            probe,
            fraction: Self::DEFAULT_FRACTION,
        }
    }

    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    pub fn from_config(probe: P, config: &ResamplerConfig) -> Self {
        Self::new(probe).with_fraction(config.write_buffer_memory_fraction)
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl<P> PressureSignal for MemoryFraction<P>
where
    P: Fn() -> (u64, u64) + Send + Sync,
{
    fn is_under_pressure(&self, _buffered: usize) -> bool {
        let (used, max) = (self.probe)();
        max > 0 && used as f64 > self.fraction * max as f64
    }
}

impl<F> PressureSignal for F
where
    F: Fn(usize) -> bool + Send + Sync,
{
    fn is_under_pressure(&self, buffered: usize) -> bool {
        self(buffered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_item_threshold() {
        let signal = ItemThreshold(3);
        assert!(!signal.is_under_pressure(2));
        assert!(signal.is_under_pressure(3));
        assert_eq!(ItemThreshold::from_config(&ResamplerConfig::default()), ItemThreshold(64));
    }

    #[test]
    fn test_memory_fraction() {
        let used = Arc::new(AtomicU64::new(50));
        let probe_used = Arc::clone(&used);
        let signal = MemoryFraction::new(move || (probe_used.load(Ordering::SeqCst), 100));
        assert!((signal.fraction() - 0.8).abs() < f64::EPSILON);

        assert!(!signal.is_under_pressure(0));
        used.store(80, Ordering::SeqCst);
        assert!(!signal.is_under_pressure(0));
        used.store(81, Ordering::SeqCst);
        assert!(signal.is_under_pressure(0));

        let never = MemoryFraction::new(|| (10, 0));
        assert!(!never.is_under_pressure(1000));
    }

    #[test]
    fn test_closure_signal() {
        let signal = |buffered: usize| buffered > 1;
        assert!(!signal.is_under_pressure(1));
        assert!(signal.is_under_pressure(2));
    }
}
