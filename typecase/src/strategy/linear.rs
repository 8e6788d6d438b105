//! Linear cast chain: try kind 0, then 1, then 2, ... until a downcast
//! sticks. O(1) best case, O(N) worst case, no cache, no trust in any
//! stored field.

use crate::kind::{KindId, Registry};
use crate::shape::Shape;
use crate::strategy::KindResolve;

/// The cache-free linear downcast chain.
pub struct LinearChain<'r> {
    registry: &'r Registry,
}

impl<'r> LinearChain<'r> {
    /// A chain probing `registry`'s kinds in registration order.
    pub fn new(registry: &'r Registry) -> LinearChain<'r> {
        LinearChain { registry }
    }
}

impl KindResolve for LinearChain<'_> {
    fn resolve(&self, value: &dyn Shape) -> KindId {
        self.registry
            .kinds()
            .find(|info| info.is_instance(value))
            .map(|info| info.ordinal())
            .unwrap_or(KindId::INVALID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_in_registration_order() {
        let reg = Registry::new(12);
        let chain = LinearChain::new(&reg);
        for k in [0, 1, 6, 11] {
            let v = reg.make_value(KindId(k));
            assert_eq!(chain.resolve(v.as_ref()), KindId(k));
        }
    }

    #[test]
    fn exhaustion_yields_the_sentinel() {
        let small = Registry::new(3);
        let big = Registry::new(12);
        let chain = LinearChain::new(&small);
        let v = big.make_value(KindId(9));
        assert_eq!(chain.resolve(v.as_ref()), KindId::INVALID);
    }
}
