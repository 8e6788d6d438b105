//! Constant-time cast: the precomputed N×N subtype matrix.
//!
//! `is_subtype(s, t)` is a single bit lookup. The matrix is built once from
//! the lattice shape at strategy construction (O(N²) time and memory) and is
//! read-only afterwards; this buys O(1) worst-case type tests with no cache
//! and no arithmetic.

use bit_set::BitSet;

use crate::kind::{self, KindId, Registry};
use crate::shape::Shape;
use crate::strategy::KindResolve;

/// The ancestor-relation table: row `s` holds every `t` with `s` is-a `t`.
pub struct SubtypeMatrix {
    rows: Vec<BitSet>,
}

impl SubtypeMatrix {
    /// Builds the full matrix for `registry`'s lattice.
    pub fn build(registry: &Registry) -> SubtypeMatrix {
        let n = registry.len();
        let rows = (0..n)
            .map(|s| {
                let mut row = BitSet::with_capacity(n);
                for a in kind::ancestors(KindId(s as u32)) {
                    if a.index() < n {
                        row.insert(a.index());
                    }
                }
                row
            })
            .collect();
        SubtypeMatrix { rows }
    }

    /// Number of kinds the matrix covers.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True only for a matrix built over nothing, which no registry yields.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True iff kind `s` is-a kind `t`. Out-of-range ordinals are simply not
    /// subtypes of anything.
    #[inline]
    pub fn is_subtype(&self, s: KindId, t: KindId) -> bool {
        self.rows
            .get(s.index())
            .is_some_and(|row| row.contains(t.index()))
    }
}

/// Resolution through matrix lookups: probe most-derived-first with a
/// constant-time test per candidate.
pub struct MatrixCast<'r> {
    registry: &'r Registry,
    matrix: SubtypeMatrix,
}

impl<'r> MatrixCast<'r> {
    /// Builds the matrix for `registry` and wraps it in a resolver.
    pub fn new(registry: &'r Registry) -> MatrixCast<'r> {
        MatrixCast {
            registry,
            matrix: SubtypeMatrix::build(registry),
        }
    }

    /// The underlying ancestor-relation table.
    pub fn matrix(&self) -> &SubtypeMatrix {
        &self.matrix
    }
}

impl KindResolve for MatrixCast<'_> {
    fn resolve(&self, value: &dyn Shape) -> KindId {
        let s = value.base().tag();
        let n = self.registry.len() as u32;
        (0..n)
            .rev()
            .map(KindId)
            .find(|&t| self.matrix.is_subtype(s, t))
            .unwrap_or(KindId::INVALID)
    }
}
