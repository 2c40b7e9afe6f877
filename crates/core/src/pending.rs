//! The set of invocations a [`World`](crate::world::World) has seen but not
//! yet linearized.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::op::ProcessId;

/// An unordered collection of `(process, call)` pairs, at most one per
/// process.
///
/// Backed by a small `Vec` rather than a map: histories rarely have more than
/// a handful of processes concurrently in flight, and a flat vector avoids a
/// hasher per lookup at this size. Equality and hashing are set-based (order
/// never matters) so that two worlds reached via different invoke/commit
/// orders but with the same outstanding set compare equal for the `Seen`
/// cache.
#[derive(Clone, Debug, Default)]
pub struct Pending<C> {
    entries: Vec<(ProcessId, C)>,
}

impl<C> Pending<C> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ProcessId, C)> {
        self.entries.iter()
    }

    pub fn contains_process(&self, process: ProcessId) -> bool {
        self.entries.iter().any(|(p, _)| *p == process)
    }

    pub fn insert(&mut self, process: ProcessId, call: C) {
        debug_assert!(!self.contains_process(process), "process already pending");
        self.entries.push((process, call));
    }

    /// Removes and returns the call for `process`, if it is pending.
    pub fn remove(&mut self, process: ProcessId) -> Option<C> {
        let position = self.entries.iter().position(|(p, _)| *p == process)?;
        Some(self.entries.swap_remove(position).1)
    }
}

impl<C: Eq> PartialEq for Pending<C> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|e| other.entries.contains(e))
    }
}

impl<C: Eq> Eq for Pending<C> {}

impl<C: Hash> Hash for Pending<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent: XOR the individually-hashed entries together
        // rather than hashing the vector in place, the same trick
        // `equivalence_fingerprint` uses at the whole-world level.
        let combined = self
            .entries
            .iter()
            .fold(0u64, |acc, entry| acc ^ hash_one(entry));
        combined.hash(state);
    }
}

fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_insertion_order() {
        let mut a = Pending::default();
        a.insert(1, "x");
        a.insert(2, "y");
        let mut b = Pending::default();
        b.insert(2, "y");
        b.insert(1, "x");
        assert_eq!(a, b);
        assert_eq!(hash_one(&a), hash_one(&b));
    }

    #[test]
    fn remove_absent_process_is_none() {
        let mut p: Pending<&str> = Pending::default();
        assert_eq!(p.remove(9), None);
        p.insert(9, "z");
        assert_eq!(p.remove(9), Some("z"));
        assert!(p.is_empty());
    }
}
