//! Hash containers used by the registry and the strategy cache.

use core::any::TypeId;
use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};
use hashbrown::{HashMap, HashSet};

// -----------------------------------------------------------------------------
// FixedHashState

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x95EE04C4F326B271);

/// `foldhash` state with a fixed seed, so name lookups hash identically
/// across runs.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHashState

/// Passes a `u64` straight through as the hash.
///
/// `TypeId` is already a high quality hash, rehashing it is wasted work.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

// -----------------------------------------------------------------------------
// Aliases

/// A map keyed by [`TypeId`].
pub(crate) type TypeIdMap<V> = HashMap<TypeId, V, NoOpHashState>;

/// A map keyed by `&'static str` type names.
pub(crate) type NameMap<V> = HashMap<&'static str, V, FixedHashState>;

/// A set of `&'static str` type names.
pub(crate) type NameSet = HashSet<&'static str, FixedHashState>;

#[inline]
pub(crate) const fn new_type_id_map<V>() -> TypeIdMap<V> {
    HashMap::with_hasher(NoOpHashState)
}

#[inline]
pub(crate) const fn new_name_map<V>() -> NameMap<V> {
    HashMap::with_hasher(FixedHashState)
}

#[inline]
pub(crate) const fn new_name_set() -> NameSet {
    HashSet::with_hasher(FixedHashState)
}

// -----------------------------------------------------------------------------
// Tests
