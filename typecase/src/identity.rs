//! Identity extraction: a stable fingerprint of a value's concrete type.
//!
//! Runtimes that cache dispatch decisions usually key on the vtable pointer
//! read out of the object header. The portable equivalent here is [`TypeId`]:
//! injective over concrete types, stable for the process lifetime, O(1) to
//! obtain, and hashable. No allocation, no failure mode.

use std::any::{Any, TypeId};

use crate::shape::Shape;

/// A stable, unique-per-concrete-type cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(TypeId);

impl Identity {
    /// Identity of a statically known type.
    pub fn of<T: Any>() -> Identity {
        Identity(TypeId::of::<T>())
    }
}

/// Extracts the identity of the concrete type behind `value`.
///
/// The call goes through `as_any` so the `TypeId` is the concrete kind's,
/// never `dyn Shape`'s.
#[inline]
pub fn identity(value: &dyn Shape) -> Identity {
    Identity(Any::type_id(value.as_any()))
}
