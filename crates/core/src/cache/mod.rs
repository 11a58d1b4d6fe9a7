//! Droppable snapshot caches for the flattened global views.
//!
//! A cache holds its snapshot strongly until released, and weakly after that:
//! as long as some caller still holds the `Arc`, the snapshot is handed out
//! again instead of being rebuilt. A snapshot is stale once the registry
//! generation moves past the one it was built from; callers that hold a stale
//! snapshot keep using it, new callers get a rebuilt one.

mod views;

pub use views::{AttributeGroupView, FlattenedView, TypeSetView};

use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A snapshot built from a given registry generation.
pub trait Snapshot {
    fn generation(&self) -> u64;
}

struct CacheSlot<T> {
    strong: Option<Arc<T>>,
    weak: Weak<T>,
}

pub struct SnapshotCache<T> {
    slot: Mutex<CacheSlot<T>>,
    retain: bool,
}

impl<T: Snapshot> SnapshotCache<T> {
    /// `retain = false` keeps only a weak reference between queries.
    pub fn new(retain: bool) -> Self {
        Self {
            slot: Mutex::new(CacheSlot {
                strong: None,
                weak: Weak::new(),
            }),
            retain,
        }
    }

    /// Return the live snapshot for `generation`, building it if needed.
    ///
    /// Concurrent callers wait for a single build.
    pub fn get_or_build<E>(
        &self,
        generation: u64,
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(live) = slot.weak.upgrade() {
            if live.generation() >= generation {
                if self.retain && slot.strong.is_none() {
                    slot.strong = Some(live.clone());
                }
                return Ok(live);
            }
        }

        let fresh = Arc::new(build()?);
        slot.weak = Arc::downgrade(&fresh);
        slot.strong = self.retain.then(|| fresh.clone());
        Ok(fresh)
    }

    /// Drop the strong reference; the snapshot survives while callers hold it.
    pub fn release(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.strong = None;
    }

    /// Forget the snapshot entirely so the next access rebuilds it.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.strong = None;
        slot.weak = Weak::new();
    }

    /// The current snapshot, if still alive, without building.
    pub fn peek(&self) -> Option<Arc<T>> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.weak.upgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::convert::Infallible;

    struct Stamp(u64);

    impl Snapshot for Stamp {
        fn generation(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_retained_snapshot_is_reused() {
        let cache = SnapshotCache::new(true);
        let builds = Cell::new(0);
        let build = || {
            builds.set(builds.get() + 1);
            Ok::<_, Infallible>(Stamp(1))
        };
        let a = cache.get_or_build(1, build).unwrap();
        drop(a);
        let b = cache.get_or_build(1, build).unwrap();
        assert_eq!(b.0, 1);
        assert_eq!(builds.get(), 1);
    }

    #[test]
    fn test_released_snapshot_lives_while_held() {
        let cache = SnapshotCache::new(true);
        let held = cache.get_or_build(1, || Ok::<_, Infallible>(Stamp(1))).unwrap();
        cache.release();
        assert!(cache.peek().is_some());
        drop(held);
        assert!(cache.peek().is_none());
    }

    #[test]
    fn test_stale_generation_rebuilds_but_old_holder_keeps_snapshot() {
        let cache = SnapshotCache::new(false);
        let old = cache.get_or_build(1, || Ok::<_, Infallible>(Stamp(1))).unwrap();
        let new = cache.get_or_build(2, || Ok::<_, Infallible>(Stamp(2))).unwrap();
        assert_eq!(old.0, 1);
        assert_eq!(new.0, 2);
        assert!(!Arc::ptr_eq(&old, &new));
    }

    #[test]
    fn test_build_error_leaves_cache_empty() {
        let cache: SnapshotCache<Stamp> = SnapshotCache::new(true);
        assert!(cache.get_or_build(1, || Err("boom")).is_err());
        assert!(cache.peek().is_none());
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let cache = SnapshotCache::new(true);
        let first = cache.get_or_build(1, || Ok::<_, Infallible>(Stamp(1))).unwrap();
        cache.invalidate();
        let second = cache.get_or_build(1, || Ok::<_, Infallible>(Stamp(1))).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
