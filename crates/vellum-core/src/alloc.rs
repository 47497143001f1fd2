//! Class-tagged byte/count accounting, standing in for the "memory pool
//! allocator: typed allocation with class tag, free by size" upward
//! interface named in spec §6. Real allocation is ordinary `Vec`/`Box`;
//! this module only tracks what the cache's accounting invariants (spec
//! §3 "Accounting", §8 universal invariants) need to check.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AllocClass {
    FontCache,
    MatrixCache,
    CharCache,
    Form,
}

#[derive(Debug, Default)]
struct Counter {
    bytes: AtomicUsize,
    count: AtomicUsize,
}

/// Live byte/count totals for one [`AllocClass`].
#[derive(Debug, Default)]
pub struct AllocTracker {
    font_cache: Counter,
    matrix_cache: Counter,
    char_cache: Counter,
    form: Counter,
}

impl AllocTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, class: AllocClass) -> &Counter {
        match class {
            AllocClass::FontCache => &self.font_cache,
            AllocClass::MatrixCache => &self.matrix_cache,
            AllocClass::CharCache => &self.char_cache,
            AllocClass::Form => &self.form,
        }
    }

    pub fn charge(&self, class: AllocClass, bytes: usize) {
        let c = self.counter(class);
        c.bytes.fetch_add(bytes, Ordering::Relaxed);
        c.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn release(&self, class: AllocClass, bytes: usize) {
        let c = self.counter(class);
        c.bytes.fetch_sub(bytes, Ordering::Relaxed);
        c.count.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn bytes(&self, class: AllocClass) -> usize {
        self.counter(class).bytes.load(Ordering::Relaxed)
    }

    pub fn count(&self, class: AllocClass) -> usize {
        self.counter(class).count.load(Ordering::Relaxed)
    }

    pub fn total_bytes(&self) -> usize {
        self.bytes(AllocClass::FontCache)
            + self.bytes(AllocClass::MatrixCache)
            + self.bytes(AllocClass::CharCache)
            + self.bytes(AllocClass::Form)
    }
}
