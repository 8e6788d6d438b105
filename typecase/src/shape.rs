//! The closed hierarchy of benchmark values.
//!
//! Every value handled by the dispatch engine is a [`ShapeKind<I>`] behind a
//! `&dyn Shape`. The hierarchy is closed: the set of concrete kinds a
//! [`crate::kind::Registry`] hands out is fixed when the registry is built and
//! never grows afterwards.
//!
//! Subobject layout is modeled by composition rather than inheritance: each
//! concrete kind owns a named [`ShapeBase`] field carrying the data every kind
//! shares (the integer tag and the path key), plus a kind-specific payload.
//! "Pointer adjustment" from the base to the concrete subobject therefore
//! never involves pointer arithmetic; the registry records a per-kind accessor
//! function that knows the concrete layout at compile time.

use std::any::Any;

use crate::identity::Identity;
use crate::kind::KindId;

/// Data shared by every concrete kind, stored inline in each value.
///
/// Both fields are set once at construction and never mutated; a value's kind
/// cannot change over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeBase {
    tag: KindId,
    path_key: u64,
}

impl ShapeBase {
    pub(crate) fn new(tag: KindId, path_key: u64) -> Self {
        ShapeBase { tag, path_key }
    }

    /// The explicit integer kind tag, set at construction.
    ///
    /// This is the portable stand-in for reading a dispatch-table pointer:
    /// the constructor of [`ShapeKind<I>`] writes its own ordinal here, so the
    /// tag cannot disagree with the concrete type.
    #[inline]
    pub fn tag(&self) -> KindId {
        self.tag
    }

    /// Product of the path primes of every ancestor kind, this one included.
    ///
    /// `a` is an ancestor of the value's kind iff `path_key % a.path_key == 0`
    /// (one integer remainder per type test, see [`crate::strategy::arith`]).
    #[inline]
    pub fn path_key(&self) -> u64 {
        self.path_key
    }
}

/// Common base of the closed hierarchy.
///
/// [`Shape::ordinal`] is the virtual-dispatch ground truth: one dynamic call,
/// no type tests, but it only exists because every kind cooperates by
/// implementing it. The whole point of the external strategies in
/// [`crate::strategy`] is to reach the same answer without that cooperation.
pub trait Shape: Any + Send + Sync {
    /// Upcast for identity extraction and downcast probing.
    fn as_any(&self) -> &dyn Any;

    /// The shared base subobject.
    fn base(&self) -> &ShapeBase;

    /// Virtual dispatch: the concrete kind, answered by the kind itself.
    fn ordinal(&self) -> KindId;
}

/// One concrete kind of the closed hierarchy, distinguished by its const
/// ordinal. Distinct `I` yield distinct Rust types, so `TypeId` is a genuine
/// per-kind identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeKind<const I: u32> {
    base: ShapeBase,
    payload: u64,
}

impl<const I: u32> ShapeKind<I> {
    /// The ordinal of this kind, as a value.
    pub const ORDINAL: KindId = KindId(I);

    pub(crate) fn new(path_key: u64, payload: u64) -> Self {
        ShapeKind {
            base: ShapeBase::new(Self::ORDINAL, path_key),
            payload,
        }
    }

    /// The kind-specific field, set at construction.
    #[inline]
    pub fn payload(&self) -> u64 {
        self.payload
    }

    /// Layout knowledge for this kind, consumed by the registry.
    pub(crate) fn hooks() -> KindHooks {
        KindHooks {
            identity: Identity::of::<Self>(),
            make: |path_key, payload| Box::new(Self::new(path_key, payload)),
            is_instance: |shape| shape.as_any().is::<Self>(),
            payload: |shape| shape.as_any().downcast_ref::<Self>().map(Self::payload),
        }
    }
}

impl<const I: u32> Shape for ShapeKind<I> {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn base(&self) -> &ShapeBase {
        &self.base
    }

    #[inline]
    fn ordinal(&self) -> KindId {
        Self::ORDINAL
    }
}

/// Reads the kind-specific payload out of a value, or `None` when the value
/// is not an instance of the kind the accessor was built for.
pub type PayloadFn = fn(&dyn Shape) -> Option<u64>;

/// Per-kind construction and probing functions, monomorphized once per
/// `ShapeKind<I>` and collected into the registry's hook table.
pub(crate) struct KindHooks {
    pub(crate) identity: Identity,
    pub(crate) make: fn(u64, u64) -> Box<dyn Shape>,
    pub(crate) is_instance: fn(&dyn Shape) -> bool,
    pub(crate) payload: PayloadFn,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matches_const_ordinal() {
        let v = ShapeKind::<7>::new(1, 42);
        assert_eq!(v.base().tag(), KindId(7));
        assert_eq!(v.ordinal(), ShapeKind::<7>::ORDINAL);
    }

    #[test]
    fn hooks_probe_exactly_their_own_kind() {
        let hooks3 = ShapeKind::<3>::hooks();
        let hooks4 = ShapeKind::<4>::hooks();
        let v: Box<dyn Shape> = (hooks3.make)(1, 99);

        assert!((hooks3.is_instance)(v.as_ref()));
        assert!(!(hooks4.is_instance)(v.as_ref()));
        assert_eq!((hooks3.payload)(v.as_ref()), Some(99));
        assert_eq!((hooks4.payload)(v.as_ref()), None);
    }
}
