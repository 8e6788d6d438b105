//! Binary-shaped cast chain: descend the halving lattice from the root,
//! each step testing membership in one child subtree.
//!
//! Subtree membership is one integer remainder against the child's path key
//! (see [`crate::strategy::arith`] for the encoding), so resolution costs at
//! most two remainders per level: O(log N) worst case with no cache at all.

use crate::kind::{KindId, Registry};
use crate::shape::Shape;
use crate::strategy::KindResolve;

/// O(log N) lattice descent with divisibility subtree tests.
pub struct BinaryDescent<'r> {
    registry: &'r Registry,
}

impl<'r> BinaryDescent<'r> {
    /// A descent over `registry`'s lattice.
    pub fn new(registry: &'r Registry) -> BinaryDescent<'r> {
        BinaryDescent { registry }
    }

    #[inline]
    fn in_subtree(&self, key: u64, k: usize) -> bool {
        key % self.registry.kind(KindId(k as u32)).path_key() == 0
    }
}

impl KindResolve for BinaryDescent<'_> {
    fn resolve(&self, value: &dyn Shape) -> KindId {
        let key = value.base().path_key();
        let n = self.registry.len();

        if !self.in_subtree(key, 0) {
            return KindId::INVALID;
        }

        // Root 0 has the single child 1; every deeper kind k has 2k and 2k+1.
        let mut cur = 0usize;
        loop {
            let (left, right) = if cur == 0 { (1, n) } else { (2 * cur, 2 * cur + 1) };
            if left < n && self.in_subtree(key, left) {
                cur = left;
            } else if right < n && self.in_subtree(key, right) {
                cur = right;
            } else {
                return KindId(cur as u32);
            }
        }
    }
}
