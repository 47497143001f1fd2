//! Process-scope handle to the cache for the interpreter/renderer split
//! described in spec §5 "Concurrency & resource model": one interpreter
//! thread mutates the cache; a pool of renderer threads only ever reads
//! already-constructed forms. `parking_lot::RwLock` gives renderers
//! concurrent read access while the interpreter holds exclusive access
//! during lookup, insertion, and purge.

use crate::cache::GlyphCache;
use parking_lot::RwLock;

/// Shared ownership of a [`GlyphCache`] across the interpreter thread and
/// the renderer pool. The interpreter should prefer [`SharedGlyphCache::write`]
/// even for `lookup`, since lookup relinks MRU order; renderers that only
/// need a previously returned form should hold their own clone or index
/// rather than contend on the lock per pixel.
#[derive(Default)]
pub struct SharedGlyphCache {
    inner: RwLock<GlyphCache>,
}

impl SharedGlyphCache {
    pub fn new(cache: GlyphCache) -> Self {
        SharedGlyphCache { inner: RwLock::new(cache) }
    }

    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, GlyphCache> {
        self.inner.read()
    }

    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, GlyphCache> {
        self.inner.write()
    }
}
