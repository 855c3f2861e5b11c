use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Receives notifications that render-mode bucketing must be recomputed.
///
/// Materials call [`WorldNotifier::mark_dirty`] when their albedo alpha moves
/// between opaque and transparent, because draw lists bucket entities by
/// that distinction.
pub trait WorldNotifier: Send + Sync {
    fn mark_dirty(&self);
}

/// Scene-side dirty flag shared with every material.
#[derive(Debug, Default)]
pub struct World {
    dirty: AtomicBool,
    dirty_count: AtomicU64,
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clears the flag, returning whether it was set.
    /// Called once per frame before rebuilding render buckets.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Total notifications received.
    #[inline]
    pub fn dirty_count(&self) -> u64 {
        self.dirty_count.load(Ordering::Relaxed)
    }
}

impl WorldNotifier for World {
    fn mark_dirty(&self) {
        self.dirty_count.fetch_add(1, Ordering::Relaxed);
        self.dirty.store(true, Ordering::Release);
        log::debug!("World marked dirty, render buckets will be rebuilt");
    }
}
