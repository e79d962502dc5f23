//! Buffer that hands items to a flush callback under pressure.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::{ItemThreshold, PressureSignal};
use crate::error::{ResamplerError, Result};

/// Unbounded item queue gated by a [`PressureSignal`].
///
/// All mutations run under one mutex, so a flush and the append that
/// follows it are a single critical section.
pub struct WriteBuffer<T, P = ItemThreshold> {
    items: Mutex<Vec<T>>,
    pressure: P,
}

impl<T, P: PressureSignal> WriteBuffer<T, P> {
    pub fn new(pressure: P) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            pressure,
        }
    }

    /// Flush if under pressure or `forced`, then append `item`.
    ///
    /// `flush` sees every buffered item in insertion order; on success they
    /// are discarded. If it fails the items stay buffered, `item` is still
    /// appended and the failure is returned. Returns the number of items
    /// flushed.
    pub fn add_and_process_when_full<F>(&self, item: T, flush: F, forced: bool) -> Result<usize>
    where
        F: FnOnce(&[T]) -> anyhow::Result<()>,
    {
        let mut items = self.lock();
        let outcome = if forced || self.pressure.is_under_pressure(items.len()) {
            Self::drain_into(&mut items, flush, forced)
        } else {
            Ok(0)
        };
        items.push(item);
        outcome
    }

    /// Flush every buffered item.
    pub fn flush<F>(&self, flush: F) -> Result<usize>
    where
        F: FnOnce(&[T]) -> anyhow::Result<()>,
    {
        let mut items = self.lock();
        Self::drain_into(&mut items, flush, true)
    }

    /// Whether the pressure signal currently asks for a flush.
    pub fn is_full(&self) -> bool {
        let items = self.lock();
        self.pressure.is_under_pressure(items.len())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Discard buffered items without flushing them.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn drain_into<F>(items: &mut Vec<T>, flush: F, forced: bool) -> Result<usize>
    where
        F: FnOnce(&[T]) -> anyhow::Result<()>,
    {
        if items.is_empty() {
            return Ok(0);
        }

        let count = items.len();
        match flush(items.as_slice()) {
            Ok(()) => {
                items.clear();
                debug!(items = count, forced, "Flushed write buffer");
                Ok(count)
            }
            Err(e) => {
                warn!(items = count, error = %e, "Write buffer flush failed, keeping items");
                Err(ResamplerError::FlushFailed(format!("{e:#}")))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
