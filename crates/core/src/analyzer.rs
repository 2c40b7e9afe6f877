//! The top-level entry point: seed the frontier, run the explorer pool,
//! harvest the deepest surviving worlds, and classify the result.

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::SearchError;
use crate::explorer::{self, Shared};
use crate::model::{Model, ModelState};
use crate::op::{History, Op};
use crate::report::AnalysisReport;
use crate::seen::{equivalence_fingerprint, DEFAULT_CAPACITY_BITS};
use crate::world::World;

/// Tunables for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Number of explorer worker threads. The design calls for
    /// `cores + 2`: enough to keep every core busy while a couple of threads
    /// are blocked on the frontier's poll timeout or on `Seen`/`Deepest`
    /// locks at any given moment.
    pub thread_count: usize,
    /// How often, if at all, a background thread logs `visited`/`skipped`/
    /// `extant_worlds` progress. `None` disables the reporter entirely.
    pub reporter_period: Option<Duration>,
    /// `log2` of the `Seen` cache's slot count (capped at 24).
    pub seen_capacity_bits: u32,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        let cores = thread::available_parallelism().map(std::num::NonZeroUsize::get).unwrap_or(4);
        Self {
            thread_count: cores + 2,
            reporter_period: Some(Duration::from_secs(5)),
            seen_capacity_bits: DEFAULT_CAPACITY_BITS,
        }
    }
}

/// Runs the search to completion and returns the longest linearizable prefix
/// together with every surviving world at that prefix's boundary.
///
/// An empty history is trivially linearizable by the initial model alone.
pub fn linearizable_prefix_and_worlds<M>(
    model: M,
    history: &History<M::Call>,
    options: &AnalyzerOptions,
) -> Result<(Vec<Op<M::Call>>, Vec<Arc<World<M>>>), SearchError>
where
    M: Model + Send + Sync + 'static,
    M::Call: Send + Sync,
{
    let initial = Arc::new(World::initial(model));
    if history.is_empty() {
        return Ok((Vec::new(), vec![initial]));
    }

    let shared = Arc::new(Shared::new(history.clone(), Arc::clone(&initial), options.seen_capacity_bits));

    let reporter = options.reporter_period.map(|period| spawn_reporter(Arc::clone(&shared), period));

    let result = explorer::run(&shared, options.thread_count.max(1));

    shared.running.store(false, Ordering::SeqCst);
    if let Some(handle) = reporter {
        let _ = handle.join();
    }
    result?;

    let (max_index, worlds) = shared.deepest.snapshot();
    let deduped = dedupe_worlds(worlds);
    let prefix = history.events()[..max_index].to_vec();
    Ok((prefix, deduped))
}

/// Runs the search and classifies the outcome.
pub fn analysis<M>(model: M, history: &History<M::Call>, options: &AnalyzerOptions) -> AnalysisReport<M>
where
    M: Model + Send + Sync + 'static,
    M::Call: Send + Sync,
{
    match linearizable_prefix_and_worlds(model, history, options) {
        Err(error) => AnalysisReport::Error(error),
        Ok((prefix, worlds)) => {
            if prefix.len() == history.len() {
                AnalysisReport::Valid { linearizable_prefix: prefix, worlds }
            } else {
                let inconsistent_op = history.events()[prefix.len()].clone();
                let inconsistent_transitions = worlds
                    .iter()
                    .map(|world| {
                        let message = match world.model.step(&inconsistent_op.call) {
                            ModelState::Dead(message) => message,
                            ModelState::Live(_) => {
                                "the op is consistent in isolation; rejection stems from ordering \
                                 constraints against other pending operations, not from this op \
                                 alone"
                                    .to_string()
                            }
                        };
                        (world.model.clone(), message)
                    })
                    .collect();
                AnalysisReport::Invalid {
                    linearizable_prefix: prefix,
                    inconsistent_op,
                    last_consistent_worlds: worlds,
                    inconsistent_transitions,
                }
            }
        }
    }
}

fn dedupe_worlds<M: Model>(worlds: Vec<Arc<World<M>>>) -> Vec<Arc<World<M>>> {
    let mut seen = HashSet::new();
    worlds
        .into_iter()
        .filter(|w| seen.insert(equivalence_fingerprint(&w.model, &w.pending, w.index)))
        .collect()
}

/// How long the reporter sleeps between checks of `running`, mirroring
/// `Frontier::poll`'s bounded-wait idiom so a finished search doesn't keep
/// `linearizable_prefix_and_worlds` blocked on `handle.join()` for up to a
/// full `period` after the explorer pool has already stopped.
const REPORTER_POLL_SLICE: Duration = Duration::from_millis(100);

fn spawn_reporter<M>(shared: Arc<Shared<M>>, period: Duration) -> thread::JoinHandle<()>
where
    M: Model + Send + Sync + 'static,
    M::Call: Send + Sync,
{
    let slice = REPORTER_POLL_SLICE.min(period);
    thread::Builder::new()
        .name("explorer-reporter".to_string())
        .spawn(move || {
            let mut elapsed = Duration::ZERO;
            while shared.running.load(Ordering::Acquire) {
                thread::sleep(slice);
                elapsed += slice;
                if !shared.running.load(Ordering::Acquire) {
                    break;
                }
                if elapsed < period {
                    continue;
                }
                elapsed = Duration::ZERO;
                let (visited, skipped, extant) = shared.progress();
                tracing::info!(visited, skipped, extant, "linearizability search progress");
            }
        })
        .expect("failed to spawn reporter thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::register::{Register, RegisterCall};

    fn options() -> AnalyzerOptions {
        AnalyzerOptions { thread_count: 2, reporter_period: None, seen_capacity_bits: 8 }
    }

    #[test]
    fn empty_history_is_trivially_valid() {
        let history: History<RegisterCall> = History::new(vec![]);
        let report = analysis(Register(0), &history, &options());
        assert!(report.is_valid());
    }

    #[test]
    fn sequential_write_then_read_is_valid() {
        let history = History::new(vec![
            Op::invoke(1, RegisterCall::Write(1)),
            Op::ok(1, RegisterCall::Write(1)),
            Op::invoke(2, RegisterCall::Read(None)),
            Op::ok(2, RegisterCall::Read(Some(1))),
        ]);
        let report = analysis(Register(0), &history, &options());
        assert!(report.is_valid());
    }

    #[test]
    fn read_of_wrong_value_is_invalid() {
        let history = History::new(vec![
            Op::invoke(1, RegisterCall::Write(1)),
            Op::ok(1, RegisterCall::Write(1)),
            Op::invoke(2, RegisterCall::Read(None)),
            Op::ok(2, RegisterCall::Read(Some(0))),
        ]);
        let report = analysis(Register(0), &history, &options());
        assert!(!report.is_valid());
        if let AnalysisReport::Invalid { linearizable_prefix, .. } = report {
            assert!(linearizable_prefix.len() < history.len());
        } else {
            panic!("expected an invalid verdict");
        }
    }

    #[test]
    fn concurrent_overlapping_writes_then_matching_read_is_valid() {
        // p1's write and p2's write overlap in real time; either order is a
        // legal linearization as long as the read observes one of them.
        let history = History::new(vec![
            Op::invoke(1, RegisterCall::Write(1)),
            Op::invoke(2, RegisterCall::Write(2)),
            Op::ok(1, RegisterCall::Write(1)),
            Op::ok(2, RegisterCall::Write(2)),
            Op::invoke(3, RegisterCall::Read(None)),
            Op::ok(3, RegisterCall::Read(Some(2))),
        ]);
        let report = analysis(Register(0), &history, &options());
        assert!(report.is_valid());
    }

    #[test]
    fn info_completed_write_may_or_may_not_have_happened() {
        let history = History::new(vec![
            Op::invoke(1, RegisterCall::Write(1)),
            Op::info(1, RegisterCall::Write(1)),
            Op::invoke(2, RegisterCall::Read(None)),
            Op::ok(2, RegisterCall::Read(Some(1))),
        ]);
        let report = analysis(Register(0), &history, &options());
        assert!(report.is_valid());
    }

    #[test]
    fn failed_write_never_takes_effect() {
        let history = History::new(vec![
            Op::invoke(1, RegisterCall::Write(1)),
            Op::fail(1, RegisterCall::Write(1)),
            Op::invoke(2, RegisterCall::Read(None)),
            Op::ok(2, RegisterCall::Read(Some(0))),
        ]);
        let report = analysis(Register(0), &history, &options());
        assert!(report.is_valid());
    }
}
