//! Kind-tag dispatch: `match` on the integer tag stored in the base.
//!
//! O(1) always, no cache, no type test. The cost is cooperation: the
//! hierarchy must store the tag at construction, and dispatch is only sound
//! because [`crate::shape::ShapeKind`] writes its own ordinal there and the
//! field is never mutated.

use crate::kind::{KindId, Registry};
use crate::shape::Shape;
use crate::strategy::KindResolve;

/// Dispatch on the trusted integer tag.
pub struct TagSwitch<'r> {
    registry: &'r Registry,
}

impl<'r> TagSwitch<'r> {
    /// A tag switch over `registry`'s kinds.
    pub fn new(registry: &'r Registry) -> TagSwitch<'r> {
        TagSwitch { registry }
    }
}

impl KindResolve for TagSwitch<'_> {
    #[inline]
    fn resolve(&self, value: &dyn Shape) -> KindId {
        let tag = value.base().tag();
        // A tag outside the registry means the value belongs to a larger
        // hierarchy; that is resolution exhaustion, not a panic.
        if tag.index() < self.registry.len() {
            tag
        } else {
            KindId::INVALID
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_tag_alone() {
        let reg = Registry::new(8);
        let switch = TagSwitch::new(&reg);
        for k in 0..8 {
            let v = reg.make_value(KindId(k));
            assert_eq!(switch.resolve(v.as_ref()), KindId(k));
        }
    }

    #[test]
    fn foreign_tag_is_exhaustion() {
        let small = Registry::new(2);
        let big = Registry::new(8);
        let switch = TagSwitch::new(&small);
        let v = big.make_value(KindId(7));
        assert_eq!(switch.resolve(v.as_ref()), KindId::INVALID);
    }
}
