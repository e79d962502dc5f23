//! Caching of expensive-to-open resources.
//!
//! Collaborators that decode records keep open handles (files, database
//! connections) in an [`ExpiringCache`] so repeated queries reuse them, and
//! handles nobody touches are closed after a TTL.

mod expiring;

pub use expiring::ExpiringCache;

/// A resource that must be released explicitly.
pub trait Closeable: Send + Sync {
    /// Release the resource. Called at most once by the cache.
    fn close(&self) -> anyhow::Result<()>;
}
