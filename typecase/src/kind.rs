//! Kind registry: the closed enumeration of concrete kinds `0..N`.
//!
//! A [`Registry`] fixes `N` at construction time and precomputes everything
//! the dispatch strategies need per kind: the type identity, the factory, the
//! exact instance test, the payload accessor, and the path-prime data used by
//! the arithmetic fast-cast. Nothing is registered or unregistered afterwards.
//!
//! The hierarchy lattice is the implicit halving numbering over ordinals:
//! the parent of kind `k` is `k / 2`, kind 0 is the root. A flat probe over
//! concrete types ignores the lattice entirely; the binary, arithmetic and
//! matrix strategies consume it.

use smallvec::SmallVec;

use crate::identity::Identity;
use crate::shape::{KindHooks, PayloadFn, Shape, ShapeKind};

/// Ordinal of a kind within a registry, in `[0, N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(
    /// The raw ordinal.
    pub u32,
);

impl KindId {
    /// Sentinel returned when resolution exhausts every candidate without a
    /// match. This is defect recovery for a malformed registry/value pairing,
    /// not a supported branch; the dispatch path never panics over it.
    pub const INVALID: KindId = KindId(u32::MAX);

    /// True for every ordinal except [`KindId::INVALID`].
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// The ordinal as a table index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for KindId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#invalid")
        }
    }
}

/// Upper bound on the number of kinds a registry can enumerate.
///
/// A full binary lattice of depth 7 (127 kinds) fits with room to spare; the
/// hook and prime tables below are sized to this.
pub const MAX_KINDS: usize = 128;

/// First 128 primes; kind `k` owns `PRIMES[k]` as its path prime.
const PRIMES: [u64; MAX_KINDS] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53,
    59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107, 109, 113, 127, 131,
    137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223,
    227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307, 311,
    313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409,
    419, 421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503,
    509, 521, 523, 541, 547, 557, 563, 569, 571, 577, 587, 593, 599, 601, 607, 613,
    617, 619, 631, 641, 643, 647, 653, 659, 661, 673, 677, 683, 691, 701, 709, 719,
];

/// Expands to the table of per-kind hook constructors. Each listed literal
/// monomorphizes `ShapeKind<I>` once; this is the generating pattern behind
/// the per-N boilerplate.
macro_rules! kind_table {
    ($($i:literal),* $(,)?) => {
        [$( ShapeKind::<$i>::hooks ),*]
    };
}

#[rustfmt::skip]
static HOOK_TABLE: [fn() -> KindHooks; MAX_KINDS] = kind_table![
      0,   1,   2,   3,   4,   5,   6,   7,   8,   9,  10,  11,  12,  13,  14,  15,
     16,  17,  18,  19,  20,  21,  22,  23,  24,  25,  26,  27,  28,  29,  30,  31,
     32,  33,  34,  35,  36,  37,  38,  39,  40,  41,  42,  43,  44,  45,  46,  47,
     48,  49,  50,  51,  52,  53,  54,  55,  56,  57,  58,  59,  60,  61,  62,  63,
     64,  65,  66,  67,  68,  69,  70,  71,  72,  73,  74,  75,  76,  77,  78,  79,
     80,  81,  82,  83,  84,  85,  86,  87,  88,  89,  90,  91,  92,  93,  94,  95,
     96,  97,  98,  99, 100, 101, 102, 103, 104, 105, 106, 107, 108, 109, 110, 111,
    112, 113, 114, 115, 116, 117, 118, 119, 120, 121, 122, 123, 124, 125, 126, 127,
];

/// Everything the engine knows about one registered kind.
pub struct KindInfo {
    ordinal: KindId,
    identity: Identity,
    prime: u64,
    path_key: u64,
    make: fn(u64, u64) -> Box<dyn Shape>,
    is_instance: fn(&dyn Shape) -> bool,
    payload: PayloadFn,
}

impl KindInfo {
    /// The kind's ordinal within its registry.
    #[inline]
    pub fn ordinal(&self) -> KindId {
        self.ordinal
    }

    /// Stable per-concrete-type fingerprint of this kind.
    #[inline]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// The prime owned by this kind alone.
    #[inline]
    pub fn prime(&self) -> u64 {
        self.prime
    }

    /// Product of the primes on the root path, this kind included.
    #[inline]
    pub fn path_key(&self) -> u64 {
        self.path_key
    }

    /// Exact type test: is the value an instance of precisely this kind?
    #[inline]
    pub fn is_instance(&self, value: &dyn Shape) -> bool {
        (self.is_instance)(value)
    }

    /// Accessor for this kind's payload field; `None` on a foreign value.
    #[inline]
    pub fn payload(&self) -> PayloadFn {
        self.payload
    }
}

/// The closed set of kinds `0..N`, with all per-kind tables precomputed.
///
/// The path-key (prime divisor) table is filled here, eagerly, so the
/// arithmetic fast-cast never needs a lazy initialization step at dispatch
/// time.
pub struct Registry {
    kinds: Vec<KindInfo>,
}

impl Registry {
    /// Builds a registry of `n` kinds, `1 <= n <= MAX_KINDS`.
    ///
    /// # Panics
    ///
    /// An empty hierarchy is unsupported and a registry larger than the hook
    /// table cannot exist; both are construction-time programming errors.
    pub fn new(n: usize) -> Registry {
        assert!(
            (1..=MAX_KINDS).contains(&n),
            "registry size must be in 1..={MAX_KINDS}, got {n}"
        );

        let kinds = (0..n)
            .map(|k| {
                let hooks = HOOK_TABLE[k]();
                KindInfo {
                    ordinal: KindId(k as u32),
                    identity: hooks.identity,
                    prime: PRIMES[k],
                    path_key: path_key(KindId(k as u32)),
                    make: hooks.make,
                    is_instance: hooks.is_instance,
                    payload: hooks.payload,
                }
            })
            .collect();

        Registry { kinds }
    }

    /// Number of registered kinds.
    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Always false: a registry holds at least one kind.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Metadata for one kind.
    ///
    /// # Panics
    ///
    /// If `k` is not an ordinal of this registry.
    #[inline]
    pub fn kind(&self, k: KindId) -> &KindInfo {
        &self.kinds[k.index()]
    }

    /// All kinds, in registration order.
    pub fn kinds(&self) -> impl ExactSizeIterator<Item = &KindInfo> {
        self.kinds.iter()
    }

    /// Factory for a fresh value of kind `k`, with a payload derived from the
    /// ordinal so agreement checks can also validate field access.
    pub fn make_value(&self, k: KindId) -> Box<dyn Shape> {
        self.make_value_with(k, default_payload(k))
    }

    /// Factory with an explicit payload.
    pub fn make_value_with(&self, k: KindId, payload: u64) -> Box<dyn Shape> {
        let info = self.kind(k);
        (info.make)(info.path_key, payload)
    }
}

/// Payload stamped into values built by [`Registry::make_value`].
pub fn default_payload(k: KindId) -> u64 {
    (k.0 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Parent of `k` in the lattice; `None` at the root.
///
/// The lattice is the halving numbering: `parent(k) = k / 2`, kind 0 is the
/// root and kind 1 its only child; kinds `2k` and `2k + 1` are the children
/// of `k >= 1`.
#[inline]
pub fn parent(k: KindId) -> Option<KindId> {
    if k.0 == 0 { None } else { Some(KindId(k.0 / 2)) }
}

/// Depth of `k` below the root (root is 0).
pub fn depth(k: KindId) -> u32 {
    if k.0 == 0 { 0 } else { k.0.ilog2() + 1 }
}

/// True iff `a` lies on the root path of `k` (`a == k` included).
pub fn is_ancestor(a: KindId, k: KindId) -> bool {
    let mut cur = k;
    loop {
        if cur == a {
            return true;
        }
        match parent(cur) {
            Some(p) => cur = p,
            None => return false,
        }
    }
}

/// Root path of `k`, from `k` itself up to kind 0.
pub fn ancestors(k: KindId) -> SmallVec<[KindId; 8]> {
    let mut chain = SmallVec::new();
    let mut cur = Some(k);
    while let Some(c) = cur {
        chain.push(c);
        cur = parent(c);
    }
    chain
}

fn path_key(k: KindId) -> u64 {
    ancestors(k).iter().map(|a| PRIMES[a.index()]).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_lattice_shape() {
        assert_eq!(parent(KindId(0)), None);
        assert_eq!(parent(KindId(1)), Some(KindId(0)));
        assert_eq!(parent(KindId(3)), Some(KindId(1)));
        assert_eq!(parent(KindId(77)), Some(KindId(38)));
        assert_eq!(depth(KindId(0)), 0);
        assert_eq!(depth(KindId(1)), 1);
        assert_eq!(depth(KindId(3)), 2);
        assert_eq!(depth(KindId(77)), 7);
    }

    #[test]
    fn ancestor_chain_of_77() {
        let chain: Vec<u32> = ancestors(KindId(77)).iter().map(|k| k.0).collect();
        assert_eq!(chain, [77, 38, 19, 9, 4, 2, 1, 0]);
    }

    #[test]
    fn path_keys_divide_along_the_root_path() {
        let reg = Registry::new(MAX_KINDS);
        for info in reg.kinds() {
            for a in ancestors(info.ordinal()) {
                assert_eq!(info.path_key() % reg.kind(a).path_key(), 0);
            }
            // A sibling's key never divides ours.
            let k = info.ordinal().0;
            if k >= 2 {
                let sib = KindId(if k % 2 == 0 { k + 1 } else { k - 1 });
                if sib.index() < reg.len() {
                    assert_ne!(info.path_key() % reg.kind(sib).path_key(), 0);
                }
            }
        }
    }

    #[test]
    fn factory_builds_the_requested_kind() {
        let reg = Registry::new(16);
        for k in 0..16 {
            let v = reg.make_value(KindId(k));
            assert_eq!(v.ordinal(), KindId(k));
            assert_eq!(v.base().tag(), KindId(k));
            assert!(reg.kind(KindId(k)).is_instance(v.as_ref()));
        }
    }

    #[test]
    fn identities_are_pairwise_distinct() {
        let reg = Registry::new(MAX_KINDS);
        for a in reg.kinds() {
            for b in reg.kinds() {
                assert_eq!(a.identity() == b.identity(), a.ordinal() == b.ordinal());
            }
        }
    }

    #[test]
    #[should_panic(expected = "registry size")]
    fn empty_registry_is_rejected() {
        let _ = Registry::new(0);
    }
}
