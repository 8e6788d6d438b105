//! Typecase: open type-switch dispatch over a closed kind hierarchy.
//!
//! The engineering problem: given a `&dyn Shape` whose concrete type is one
//! of a fixed set of N kinds, determine which kind it is — as fast as
//! possible, without touching the hierarchy's source — and dispatch to
//! kind-specific logic. Virtual dispatch solves this from inside the
//! hierarchy; everything here solves it from outside, the way a `match` over
//! a sum type would.
//!
//! The centerpiece is the memoizing type switch ([`dispatch::Dispatcher`]):
//! a cache keyed by the concrete type's identity maps each previously seen
//! type to its resolved dispatch target, so every kind pays one O(N) cold
//! resolution and all later dispatches of that kind are O(1). The comparison
//! baselines live in [`strategy`]: the virtual-dispatch ceiling, the linear
//! and binary cast chains, the kind-tag switch, the prime-product fast-cast
//! and the subtype-matrix constant-time cast, all behind the single contract
//! `resolve(&dyn Shape) -> KindId`.
//!
//! ```
//! use typecase::dispatch::Dispatcher;
//! use typecase::kind::{KindId, Registry};
//! use typecase::strategy::baseline_dispatch;
//!
//! let registry = Registry::new(16);
//! let dispatcher = Dispatcher::new(&registry);
//!
//! let value = registry.make_value(KindId(11));
//! assert_eq!(dispatcher.dispatch(value.as_ref()), KindId(11));
//! assert_eq!(dispatcher.dispatch(value.as_ref()), baseline_dispatch(value.as_ref()));
//! // One cold resolution, however often kind 11 is dispatched afterwards.
//! assert_eq!(dispatcher.cache().cold_resolutions(), 1);
//! ```
#![deny(missing_docs)]

/// Dispatch cache: identity -> resolved descriptor, plus instrumentation.
pub mod cache;
/// The hot path: memoized dispatch and handler tables.
pub mod dispatch;
/// Identity extraction for concrete dynamic types.
pub mod identity;
/// Kind registry, ordinals, and the hierarchy lattice.
pub mod kind;
/// Chunked parallel dispatch-and-sum helper.
pub mod parallel;
/// The cold path: probe-order resolution of unseen types.
pub mod resolver;
/// The closed hierarchy of benchmark values.
pub mod shape;
/// Alternative dispatch strategies under one contract.
pub mod strategy;

pub use cache::DispatchCache;
pub use dispatch::{Dispatcher, HandlerTable};
pub use identity::{Identity, identity};
pub use kind::{KindId, Registry};
pub use shape::{Shape, ShapeKind};
pub use strategy::{KindResolve, Strategy, baseline_dispatch};
