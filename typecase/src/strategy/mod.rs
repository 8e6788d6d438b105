//! Alternative dispatch strategies sharing one contract:
//! `resolve(&dyn Shape) -> KindId`.
//!
//! Every strategy answers the same question as [`baseline_dispatch`] — which
//! kind is this value — with a different cost model:
//!
//! | strategy              | per-dispatch cost | setup        | trusts        |
//! |-----------------------|-------------------|--------------|---------------|
//! | [`VirtualDispatch`]   | O(1)              | none         | the hierarchy |
//! | [`Dispatcher`] (memo) | amortized O(1)    | none (lazy)  | nothing       |
//! | [`TagSwitch`]         | O(1)              | none         | the tag       |
//! | [`LinearChain`]       | O(N)              | none         | nothing       |
//! | [`BinaryDescent`]     | O(log N)          | prime table  | the path key  |
//! | [`ArithCast`]         | O(N) cheap tests  | prime table  | the path key  |
//! | [`MatrixCast`]        | O(N) cheap tests  | O(N²) matrix | the tag       |
//!
//! [`Dispatcher`]: crate::dispatch::Dispatcher

pub mod arith;
pub mod binary;
pub mod linear;
pub mod matrix;
pub mod tag;

use enum_map::Enum;
use strum::{Display, EnumIs, EnumIter};

use crate::dispatch::Dispatcher;
use crate::kind::{KindId, Registry};
use crate::shape::Shape;

pub use arith::ArithCast;
pub use binary::BinaryDescent;
pub use linear::LinearChain;
pub use matrix::{MatrixCast, SubtypeMatrix};
pub use tag::TagSwitch;

/// The shared resolution contract every strategy implements.
pub trait KindResolve {
    /// The kind of `value`, or [`KindId::INVALID`] when nothing matches.
    fn resolve(&self, value: &dyn Shape) -> KindId;
}

/// Virtual dispatch through the hierarchy itself: the performance ceiling
/// and the correctness ground truth.
pub struct VirtualDispatch;

impl KindResolve for VirtualDispatch {
    #[inline]
    fn resolve(&self, value: &dyn Shape) -> KindId {
        value.ordinal()
    }
}

/// The ground-truth answer used to cross-validate every other strategy.
#[inline]
pub fn baseline_dispatch(value: &dyn Shape) -> KindId {
    value.ordinal()
}

impl KindResolve for Dispatcher<'_> {
    #[inline]
    fn resolve(&self, value: &dyn Shape) -> KindId {
        self.dispatch(value)
    }
}

/// Name of one strategy under comparison; iterate with
/// `Strategy::iter()` (strum) or index an `enum_map::EnumMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, EnumIter, EnumIs, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    /// The virtual-dispatch ceiling.
    Virtual,
    /// The memoizing type switch ([`Dispatcher`]).
    Memo,
    /// Kind-tag `match`.
    Tag,
    /// Linear downcast chain.
    Linear,
    /// Binary-shaped descent over the lattice.
    Binary,
    /// Prime-product fast-cast chain.
    Arith,
    /// Subtype-matrix constant-time tests.
    Matrix,
}

impl Strategy {
    /// Instantiates this strategy over `registry`. Strategies that need
    /// precomputed tables build them here, before any dispatch call.
    pub fn build<'r>(self, registry: &'r Registry) -> Box<dyn KindResolve + Send + Sync + 'r> {
        match self {
            Strategy::Virtual => Box::new(VirtualDispatch),
            Strategy::Memo => Box::new(Dispatcher::new(registry)),
            Strategy::Tag => Box::new(TagSwitch::new(registry)),
            Strategy::Linear => Box::new(LinearChain::new(registry)),
            Strategy::Binary => Box::new(BinaryDescent::new(registry)),
            Strategy::Arith => Box::new(ArithCast::new(registry)),
            Strategy::Matrix => Box::new(MatrixCast::new(registry)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_strategy_agrees_with_the_baseline() {
        let reg = Registry::new(24);
        for strategy in Strategy::iter() {
            let resolver = strategy.build(&reg);
            for info in reg.kinds() {
                let v = reg.make_value(info.ordinal());
                assert_eq!(
                    resolver.resolve(v.as_ref()),
                    baseline_dispatch(v.as_ref()),
                    "strategy {strategy} diverged on kind {}",
                    info.ordinal()
                );
            }
        }
    }

    #[test]
    fn single_kind_registry_resolves_to_zero() {
        let reg = Registry::new(1);
        let v = reg.make_value(KindId(0));
        for strategy in Strategy::iter() {
            assert_eq!(strategy.build(&reg).resolve(v.as_ref()), KindId(0));
        }
    }
}
