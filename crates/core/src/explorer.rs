//! The pool of worker threads that drain the frontier, expanding and pruning
//! one world at a time.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::deepest::Deepest;
use crate::error::SearchError;
use crate::expand::expand_then_prune;
use crate::frontier::Frontier;
use crate::model::Model;
use crate::op::History;
use crate::seen::{equivalence_fingerprint, SeenCache};
use crate::world::World;

/// How long a worker waits on an empty frontier before re-checking whether
/// the pool should still be running. Bounds how stale the pool's observed
/// termination is relative to the last world actually draining out.
const FRONTIER_POLL_TIMEOUT: Duration = Duration::from_millis(10);

/// State shared by every worker in a pool, plus the single seed world.
pub struct Shared<M: Model> {
    pub history: History<M::Call>,
    pub frontier: Frontier<M>,
    pub seen: SeenCache,
    pub deepest: Deepest<M>,
    pub running: AtomicBool,
    /// Worlds that have been taken off the frontier (or seeded) but not yet
    /// finished expanding. The pool is done exactly when this reaches zero:
    /// no worker is mid-expansion and the frontier has nothing left to offer.
    pub extant_worlds: AtomicUsize,
    pub visited: AtomicU64,
    pub skipped: AtomicU64,
}

impl<M: Model> Shared<M> {
    pub fn new(history: History<M::Call>, initial: Arc<World<M>>, seen_capacity_bits: u32) -> Self {
        let deepest = Deepest::new(Arc::clone(&initial));
        let frontier = Frontier::new();
        frontier.put(initial);
        Self {
            history,
            frontier,
            seen: SeenCache::with_capacity_bits(seen_capacity_bits),
            deepest,
            running: AtomicBool::new(true),
            extant_worlds: AtomicUsize::new(1),
            visited: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    pub fn progress(&self) -> (u64, u64, usize) {
        (
            self.visited.load(Ordering::Relaxed),
            self.skipped.load(Ordering::Relaxed),
            self.extant_worlds.load(Ordering::Relaxed),
        )
    }
}

/// Spawns `thread_count` workers named `explorer-<n>` sharing `shared`, and
/// blocks until every world has been accounted for (the pool reaches a
/// terminal world or every branch dies out).
pub fn run<M>(shared: &Arc<Shared<M>>, thread_count: usize) -> Result<(), SearchError>
where
    M: Model + Send + Sync + 'static,
    M::Call: Send + Sync,
{
    let handles: Vec<_> = (0..thread_count)
        .map(|worker_id| {
            let shared = Arc::clone(shared);
            thread::Builder::new()
                .name(format!("explorer-{worker_id}"))
                .spawn(move || worker_loop(worker_id, &shared))
                .expect("failed to spawn explorer worker thread")
        })
        .collect();

    let mut panic_payload = None;
    for handle in handles {
        if let Err(payload) = handle.join() {
            panic_payload.get_or_insert(payload);
        }
    }
    shared.running.store(false, Ordering::SeqCst);

    if let Some(payload) = panic_payload {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "explorer worker panicked with a non-string payload".to_string());
        return Err(SearchError::WorkerPanicked(message));
    }

    Ok(())
}

fn worker_loop<M>(worker_id: usize, shared: &Arc<Shared<M>>)
where
    M: Model + Send + Sync + 'static,
    M::Call: Send + Sync,
{
    let outcome = catch_unwind(AssertUnwindSafe(|| worker_body(shared)));
    // Whether or not this worker panicked, every other worker must notice
    // that the pool is winding down, so the stop signal is set unconditionally
    // before propagating any panic to `run`'s `join`.
    shared.running.store(false, Ordering::SeqCst);
    if let Err(payload) = outcome {
        tracing::error!(worker_id, "explorer worker panicked");
        std::panic::resume_unwind(payload);
    }
}

fn worker_body<M>(shared: &Arc<Shared<M>>)
where
    M: Model,
    M::Call: Clone,
{
    while shared.running.load(Ordering::Acquire) {
        if shared.extant_worlds.load(Ordering::Acquire) == 0 {
            break;
        }
        let Some(world) = shared.frontier.poll(FRONTIER_POLL_TIMEOUT) else {
            continue;
        };

        let successors = expand_then_prune(&shared.history, &world);

        for successor in successors {
            shared.visited.fetch_add(1, Ordering::Relaxed);
            let successor = Arc::new(successor);
            shared.deepest.offer(Arc::clone(&successor));

            if successor.index >= shared.history.len() {
                shared.running.store(false, Ordering::SeqCst);
            }

            let fingerprint =
                equivalence_fingerprint(&successor.model, &successor.pending, successor.index);
            if shared.seen.mark_and_check(fingerprint, !successor.pending.is_empty()) {
                shared.skipped.fetch_add(1, Ordering::Relaxed);
            } else {
                shared.extant_worlds.fetch_add(1, Ordering::AcqRel);
                shared.frontier.put(successor);
            }
        }

        shared.extant_worlds.fetch_sub(1, Ordering::AcqRel);
    }
}
