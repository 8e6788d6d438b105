//! Probe-order semantics when per-kind tests overlap.
//!
//! With subtree tests an ancestor's case also matches every descendant, so
//! the first structural match depends on declaration order, exactly like the
//! first matching arm of a `match`. The engine's policy is
//! most-derived-first; the collapse under the opposite order is pinned here
//! so it stays a documented behavior rather than a silent one.

use typecase::cache::DispatchCache;
use typecase::dispatch::Dispatcher;
use typecase::kind::{KindId, Registry};
use typecase::resolver::{KindTest, ProbeOrder, Resolver};

#[test]
fn most_derived_first_is_exact_for_every_kind() {
    let reg = Registry::new(31);
    let resolver = Resolver::new(&reg).with_test(KindTest::Subtree);

    for k in 0..31u32 {
        let cache = DispatchCache::new();
        let v = reg.make_value(KindId(k));
        assert_eq!(resolver.resolve_cold(&cache, v.as_ref()).ordinal, KindId(k));
    }
}

#[test]
fn least_derived_first_collapses_onto_the_root() {
    let reg = Registry::new(31);
    let resolver = Resolver::new(&reg)
        .with_test(KindTest::Subtree)
        .with_order(ProbeOrder::LeastDerivedFirst);

    for k in [1u32, 7, 30] {
        let cache = DispatchCache::new();
        let v = reg.make_value(KindId(k));
        assert_eq!(resolver.resolve_cold(&cache, v.as_ref()).ordinal, KindId(0));
    }
}

#[test]
fn collapsed_resolution_memoizes_consistently() {
    // Once an identity resolves to the forwarding ancestor, every later
    // dispatch of that identity must repeat the same answer from the cache.
    let reg = Registry::new(15);
    let d = Dispatcher::with_resolver(
        Resolver::new(&reg)
            .with_test(KindTest::Subtree)
            .with_order(ProbeOrder::LeastDerivedFirst),
    );

    let a = reg.make_value(KindId(11));
    let b = reg.make_value(KindId(11));
    assert_eq!(d.dispatch(a.as_ref()), KindId(0));
    assert_eq!(d.dispatch(b.as_ref()), KindId(0));
    assert_eq!(d.cache().cold_resolutions(), 1);
}
