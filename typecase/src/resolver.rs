//! The cold path: first-time resolution of an unseen concrete type.
//!
//! Candidates are probed in a fixed, deterministic order; the first
//! successful test wins, exactly like the first matching arm of a `match`.
//! Probe order is therefore semantically significant whenever the per-kind
//! test also accepts descendants (the subtree test below): probing
//! most-derived-first yields the exact kind, probing least-derived-first
//! collapses every value onto the root. The engine defaults to
//! most-derived-first; the other order exists so the collapse stays
//! observable.

use log::trace;

use crate::cache::{DispatchCache, Entry};
use crate::identity::identity;
use crate::kind::{self, KindId, Registry};
use crate::shape::Shape;

/// Direction in which candidate kinds are probed.
///
/// Ordinals grow with depth in the halving lattice, so descending ordinal
/// order never probes an ancestor before one of its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeOrder {
    /// Descending ordinal: deepest candidates first. Exact results even with
    /// overlapping subtree tests.
    #[default]
    MostDerivedFirst,
    /// Ascending ordinal: the documented collapse mode for overlapping
    /// tests; with exact tests the two orders agree.
    LeastDerivedFirst,
}

/// The per-candidate test primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindTest {
    /// Exact concrete-type test (downcast probe). Never overlaps.
    #[default]
    Exact,
    /// Lattice membership: candidate `k` accepts every value whose kind lies
    /// in the subtree rooted at `k`. Models the visitor-forwarding
    /// hierarchies where an ancestor's case also matches its descendants.
    Subtree,
}

/// Cold-path resolver over one registry.
pub struct Resolver<'r> {
    registry: &'r Registry,
    order: ProbeOrder,
    test: KindTest,
}

impl<'r> Resolver<'r> {
    /// A resolver with the default policy: exact tests, most-derived-first.
    pub fn new(registry: &'r Registry) -> Resolver<'r> {
        Resolver {
            registry,
            order: ProbeOrder::default(),
            test: KindTest::default(),
        }
    }

    /// Overrides the probe order.
    pub fn with_order(mut self, order: ProbeOrder) -> Resolver<'r> {
        self.order = order;
        self
    }

    /// Overrides the per-candidate test primitive.
    pub fn with_test(mut self, test: KindTest) -> Resolver<'r> {
        self.test = test;
        self
    }

    /// The registry this resolver probes.
    #[inline]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Probes every candidate until one matches, records the result in
    /// `cache` and returns it.
    ///
    /// When no candidate matches (a registry/value mismatch, not a supported
    /// branch) the sentinel [`Entry::invalid`] is returned and nothing is
    /// recorded: a malformed pairing stays cold instead of poisoning the
    /// cache.
    pub fn resolve_cold(&self, cache: &DispatchCache, value: &dyn Shape) -> Entry {
        cache.mark_cold();

        let n = self.registry.len() as u32;
        let found = match self.order {
            ProbeOrder::MostDerivedFirst => (0..n).rev().find(|&k| self.matches(KindId(k), value)),
            ProbeOrder::LeastDerivedFirst => (0..n).find(|&k| self.matches(KindId(k), value)),
        };

        match found {
            Some(k) => {
                let info = self.registry.kind(KindId(k));
                let entry = Entry {
                    ordinal: info.ordinal(),
                    payload: info.payload(),
                };
                trace!("cold resolution: tagged {} resolved to kind {}", value.base().tag(), entry.ordinal);
                cache.record(identity(value), entry);
                entry
            }
            None => {
                trace!("cold resolution exhausted all {n} candidates");
                Entry::invalid()
            }
        }
    }

    fn matches(&self, candidate: KindId, value: &dyn Shape) -> bool {
        match self.test {
            KindTest::Exact => self.registry.kind(candidate).is_instance(value),
            KindTest::Subtree => kind::is_ancestor(candidate, value.base().tag()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_test_is_order_insensitive() {
        let reg = Registry::new(8);
        let cache = DispatchCache::new();
        let v = reg.make_value(KindId(5));

        let derived_first = Resolver::new(&reg).resolve_cold(&cache, v.as_ref());
        let base_first = Resolver::new(&reg)
            .with_order(ProbeOrder::LeastDerivedFirst)
            .resolve_cold(&DispatchCache::new(), v.as_ref());

        assert_eq!(derived_first.ordinal, KindId(5));
        assert_eq!(base_first.ordinal, KindId(5));
    }

    #[test]
    fn subtree_test_collapses_under_base_first_probing() {
        let reg = Registry::new(8);
        let v = reg.make_value(KindId(5));

        let exact = Resolver::new(&reg)
            .with_test(KindTest::Subtree)
            .resolve_cold(&DispatchCache::new(), v.as_ref());
        let collapsed = Resolver::new(&reg)
            .with_test(KindTest::Subtree)
            .with_order(ProbeOrder::LeastDerivedFirst)
            .resolve_cold(&DispatchCache::new(), v.as_ref());

        assert_eq!(exact.ordinal, KindId(5));
        // Kind 0 is an ancestor of everything, so base-first probing stops there.
        assert_eq!(collapsed.ordinal, KindId(0));
    }

    #[test]
    fn exhaustion_returns_the_sentinel_and_stays_uncached() {
        let small = Registry::new(4);
        let big = Registry::new(16);
        let cache = DispatchCache::new();

        // A kind the probing registry has never registered.
        let stranger = big.make_value(KindId(11));
        let entry = Resolver::new(&small).resolve_cold(&cache, stranger.as_ref());

        assert_eq!(entry.ordinal, KindId::INVALID);
        assert!((entry.payload)(stranger.as_ref()).is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.cold_resolutions(), 1);
    }
}
