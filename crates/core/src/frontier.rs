//! The shared work queue the explorer pool pulls worlds from.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::model::Model;
use crate::world::World;

/// Orders worlds by "awfulness": fewer outstanding pending invocations first
/// (a narrower branching factor is cheaper to finish exploring), then, among
/// ties, the deeper world first (closer to a terminal accept). `BinaryHeap`
/// is a max-heap, so "more awful" must compare greater.
struct Priority<M: Model> {
    world: Arc<World<M>>,
}

impl<M: Model> Priority<M> {
    fn key(&self) -> (std::cmp::Reverse<usize>, usize) {
        (std::cmp::Reverse(self.world.pending.len()), self.world.index)
    }
}

impl<M: Model> PartialEq for Priority<M> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl<M: Model> Eq for Priority<M> {}
impl<M: Model> PartialOrd for Priority<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<M: Model> Ord for Priority<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// A concurrent priority queue of worlds awaiting exploration.
///
/// Workers block on [`Frontier::poll`] with a short timeout rather than
/// forever, so that a pool where every world has momentarily drained (but
/// more may still be produced by an in-flight expansion elsewhere) notices
/// new work promptly without spinning, and so the pool's overall termination
/// check (driven by `extant_worlds` reaching zero) is never delayed by more
/// than one poll interval.
pub struct Frontier<M: Model> {
    heap: Mutex<BinaryHeap<Priority<M>>>,
    has_work: Condvar,
}

impl<M: Model> Frontier<M> {
    pub fn new() -> Self {
        Self { heap: Mutex::new(BinaryHeap::new()), has_work: Condvar::new() }
    }

    pub fn put(&self, world: Arc<World<M>>) {
        let mut heap = self.heap.lock().unwrap();
        heap.push(Priority { world });
        self.has_work.notify_one();
    }

    /// Waits up to `timeout` for a world to become available, returning
    /// `None` on timeout with nothing to do.
    pub fn poll(&self, timeout: Duration) -> Option<Arc<World<M>>> {
        let deadline = Instant::now() + timeout;
        let mut heap = self.heap.lock().unwrap();
        loop {
            if let Some(priority) = heap.pop() {
                return Some(priority.world);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (guard, result) = self.has_work.wait_timeout(heap, remaining).unwrap();
            heap = guard;
            if result.timed_out() && heap.is_empty() {
                return None;
            }
        }
    }
}

impl<M: Model> Default for Frontier<M> {
    fn default() -> Self {
        Self::new()
    }
}
