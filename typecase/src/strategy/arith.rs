//! Arithmetic fast-cast: type tests by prime divisibility.
//!
//! Every kind owns one prime; a kind's path key is the product of the primes
//! along its root path. A value stores the path key of its kind, so
//! "candidate `a` is an ancestor of this value's kind" reduces to
//! `value.path_key % a.path_key == 0` — one integer remainder per test.
//!
//! The divisor table is the registry's [`crate::kind::KindInfo::path_key`]
//! column, filled eagerly at registry construction; nothing here initializes
//! lazily at dispatch time.
//!
//! Resolution probes most-derived-first, so the first divisible candidate is
//! the exact kind whenever that kind is registered.

use crate::kind::{KindId, Registry};
use crate::shape::Shape;
use crate::strategy::KindResolve;

/// The prime-product fast-cast chain.
pub struct ArithCast<'r> {
    registry: &'r Registry,
}

impl<'r> ArithCast<'r> {
    /// A fast-cast over `registry`'s precomputed path-key column.
    pub fn new(registry: &'r Registry) -> ArithCast<'r> {
        ArithCast { registry }
    }

    /// The fast-cast type test: is the value an instance of `candidate`,
    /// possibly as an ancestor of its exact kind?
    #[inline]
    pub fn is_instance_of(&self, value: &dyn Shape, candidate: KindId) -> bool {
        value.base().path_key() % self.registry.kind(candidate).path_key() == 0
    }
}

impl KindResolve for ArithCast<'_> {
    fn resolve(&self, value: &dyn Shape) -> KindId {
        let n = self.registry.len() as u32;
        (0..n)
            .rev()
            .map(KindId)
            .find(|&k| self.is_instance_of(value, k))
            .unwrap_or(KindId::INVALID)
    }
}
