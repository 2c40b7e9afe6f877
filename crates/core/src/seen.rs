//! A bounded, lossy, concurrent deduplication cache for worlds.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::model::Model;
use crate::pending::Pending;

/// The default slot count: 2^20 entries. The design allows up to 2^24 (see
/// [`SeenCache::with_capacity_bits`]); this default trades some collision
/// rate for a cache that doesn't by itself dominate memory use for the common
/// case.
pub const DEFAULT_CAPACITY_BITS: u32 = 20;

/// A 128-bit equivalence-class fingerprint for `(model, pending, index)`.
///
/// Two worlds with the same fingerprint are treated as interchangeable for
/// the purposes of search - the engine never needs to reconstruct which one
/// "wins" since they are semantically identical, only one need ever be
/// explored further. The two independently-seeded hashers follow the same
/// combine-two-hashes-into-one-bigger-one trick used for the frontier
/// signature in a constrained-linearization search, just sized up from 64 to
/// 128 bits to keep the false-collision rate negligible at the cache sizes
/// this engine runs at.
pub fn equivalence_fingerprint<M: Model>(
    model: &M,
    pending: &Pending<M::Call>,
    index: usize,
) -> u128 {
    let mut lo = DefaultHasher::new();
    let mut hi = DefaultHasher::salted();
    model.hash(&mut lo);
    pending.hash(&mut lo);
    index.hash(&mut lo);
    model.hash(&mut hi);
    pending.hash(&mut hi);
    index.hash(&mut hi);
    (u128::from(lo.finish()) << 64) | u128::from(hi.finish())
}

/// A bounded hash table mapping a slot (the fingerprint's low bits) to the
/// last fingerprint written there.
///
/// Writes race by design: "last writer wins" on a collision is explicitly
/// acceptable (see the module docs on the engine's soundness argument) since
/// a false "already seen" only risks re-exploring slightly less of an
/// equivalent state space, never accepting an invalid history or rejecting a
/// valid one via a different surviving path. Worlds with empty `pending` are
/// never cached (a world can leave and re-enter an empty-pending state along
/// many different `fixed` prefixes that are otherwise indistinguishable, and
/// caching them tends to prune legitimate alternate continuations too
/// aggressively in practice).
pub struct SeenCache {
    slots: Vec<Mutex<Option<u128>>>,
    mask: usize,
}

impl SeenCache {
    pub fn with_capacity_bits(bits: u32) -> Self {
        assert!(bits <= 24, "seen cache capacity is capped at 2^24 slots");
        let capacity = 1usize << bits;
        Self {
            slots: (0..capacity).map(|_| Mutex::new(None)).collect(),
            mask: capacity - 1,
        }
    }

    /// Returns `true` if `key` was already marked seen, recording it
    /// otherwise (unless `has_pending` is false, per the empty-pending
    /// exemption above).
    pub fn mark_and_check(&self, key: u128, has_pending: bool) -> bool {
        let slot_index = (key as usize) & self.mask;
        let mut slot = self.slots[slot_index].lock().unwrap();
        if *slot == Some(key) {
            return true;
        }
        if has_pending {
            *slot = Some(key);
        }
        false
    }
}

impl Default for SeenCache {
    fn default() -> Self {
        Self::with_capacity_bits(DEFAULT_CAPACITY_BITS)
    }
}

// `DefaultHasher` has no public seeded constructor on stable; derive a second
// independent stream by hashing through an already-distinguishing prefix
// instead of inventing a second hasher implementation.
trait SaltedHasher {
    fn salted() -> Self;
}

impl SaltedHasher for DefaultHasher {
    fn salted() -> Self {
        let mut h = DefaultHasher::new();
        0xA5A5_A5A5_A5A5_A5A5u64.hash(&mut h);
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::register::{Register, RegisterCall};

    #[test]
    fn repeated_key_is_reported_seen() {
        let cache = SeenCache::with_capacity_bits(4);
        assert!(!cache.mark_and_check(42, true));
        assert!(cache.mark_and_check(42, true));
    }

    #[test]
    fn empty_pending_worlds_are_never_cached() {
        let cache = SeenCache::with_capacity_bits(4);
        assert!(!cache.mark_and_check(7, false));
        assert!(!cache.mark_and_check(7, false), "never marked, so never seen");
    }

    #[test]
    fn equivalence_fingerprint_ignores_fixed_order() {
        let mut pending_a = Pending::default();
        pending_a.insert(1, RegisterCall::Write(1));
        let mut pending_b = Pending::default();
        pending_b.insert(1, RegisterCall::Write(1));
        let fp_a = equivalence_fingerprint(&Register(0), &pending_a, 3);
        let fp_b = equivalence_fingerprint(&Register(0), &pending_b, 3);
        assert_eq!(fp_a, fp_b);
    }
}
