//! The dispatch cache: identity -> resolved dispatch descriptor.
//!
//! Entries are created lazily by the cold path, at most once per distinct
//! concrete type, and never evicted; the closed hierarchy bounds the cache at
//! N entries, so unbounded growth is unbounded in name only.
//!
//! Concurrency policy: readers racing to populate the same entry are allowed
//! to redundantly recompute. Resolution is a pure function of identity, so a
//! duplicate insert always writes the same descriptor; `DashMap` keeps the
//! map itself consistent without an external lock.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::identity::Identity;
use crate::kind::KindId;
use crate::shape::PayloadFn;

/// A resolved dispatch descriptor: which kind, and how to reach its
/// kind-specific subobject. Immutable once recorded.
#[derive(Clone, Copy)]
pub struct Entry {
    /// Resolved ordinal, or [`KindId::INVALID`] on resolution exhaustion.
    pub ordinal: KindId,
    /// Accessor standing in for the base-to-subobject pointer adjustment.
    pub payload: PayloadFn,
}

impl Entry {
    /// The sentinel descriptor for a value no candidate kind matched.
    pub fn invalid() -> Entry {
        Entry {
            ordinal: KindId::INVALID,
            payload: |_| None,
        }
    }
}

/// Memo table from [`Identity`] to [`Entry`], plus the cold-path counter
/// used by the idempotence tests.
#[derive(Default)]
pub struct DispatchCache {
    entries: DashMap<Identity, Entry>,
    cold: AtomicU64,
}

impl DispatchCache {
    /// An empty cache; entries appear lazily as identities get resolved.
    pub fn new() -> DispatchCache {
        DispatchCache::default()
    }

    /// The hot-path lookup. `None` means the identity has not been resolved
    /// yet and the caller must take the cold path.
    #[inline]
    pub fn lookup(&self, identity: Identity) -> Option<Entry> {
        self.entries.get(&identity).map(|e| *e)
    }

    /// Records a successful resolution. Idempotent: a racing duplicate
    /// writes an identical descriptor.
    pub fn record(&self, identity: Identity, entry: Entry) {
        self.entries.insert(identity, entry);
    }

    /// Counts one cold-path invocation.
    pub(crate) fn mark_cold(&self) {
        self.cold.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of cold-path resolutions performed so far. After any call
    /// sequence this equals the number of distinct unresolvable-or-new
    /// identities encountered, never the number of dispatches.
    pub fn cold_resolutions(&self) -> u64 {
        self.cold.load(Ordering::Relaxed)
    }

    /// Number of resolved identities currently memoized.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first successful resolution.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::identity;
    use crate::shape::{Shape, ShapeKind};

    #[test]
    fn lookup_miss_then_hit() {
        let cache = DispatchCache::new();
        let v: Box<dyn Shape> = Box::new(ShapeKind::<3>::new(1, 7));
        let id = identity(v.as_ref());

        assert!(cache.lookup(id).is_none());
        cache.record(
            id,
            Entry {
                ordinal: KindId(3),
                payload: |s| s.as_any().downcast_ref::<ShapeKind<3>>().map(ShapeKind::payload),
            },
        );

        let hit = cache.lookup(id).unwrap();
        assert_eq!(hit.ordinal, KindId(3));
        assert_eq!((hit.payload)(v.as_ref()), Some(7));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn duplicate_record_is_idempotent() {
        let cache = DispatchCache::new();
        let id = Identity::of::<ShapeKind<9>>();
        let entry = Entry {
            ordinal: KindId(9),
            payload: |_| None,
        };
        cache.record(id, entry);
        cache.record(id, entry);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(id).unwrap().ordinal, KindId(9));
    }

    #[test]
    fn cold_counter_is_explicit() {
        let cache = DispatchCache::new();
        assert_eq!(cache.cold_resolutions(), 0);
        cache.mark_cold();
        cache.mark_cold();
        assert_eq!(cache.cold_resolutions(), 2);
    }
}
