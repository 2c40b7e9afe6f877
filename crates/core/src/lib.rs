//! A parallel, memoizing search engine for checking whether a recorded history
//! of concurrent operations is linearizable against a sequential reference model.
//!
//! The engine explores the space of candidate linearizations as a tree of
//! immutable `World`s (partial linearizations). Worlds are produced by folding
//! history events (invoke/ok/fail/info) over a user-supplied [`Model`], pruned
//! eagerly whenever the model rejects a candidate order, deduplicated through a
//! bounded lossy cache, and explored by a fixed pool of worker threads that
//! share a concurrent priority frontier.
//!
//! Callers provide a [`Model`] implementation (the sequential specification of
//! their data type) and a [`History`] of [`Op`] events; [`analysis`] runs the
//! search and classifies the history as valid or invalid, reporting the
//! longest linearizable prefix and, for invalid histories, the culprit
//! operation.
//!
//! A couple of illustrative reference models ship under [`models`] for testing
//! and documentation purposes; production callers are expected to supply their
//! own.
//!
//! Histories read from a log typically have at least one invocation still
//! open at the tail (the process crashed, or the reader just stopped
//! early); run them through [`complete_history`] first to append the
//! synthetic `Info` completions the search engine's invariants assume.

pub mod analyzer;
pub mod complete;
pub mod deepest;
pub mod error;
pub mod expand;
pub mod explorer;
pub mod frontier;
pub mod model;
pub mod models;
pub mod op;
pub mod pending;
pub mod pruner;
pub mod report;
pub mod seen;
pub mod transitions;
pub mod world;

pub use analyzer::{analysis, linearizable_prefix_and_worlds, AnalyzerOptions};
pub use complete::complete as complete_history;
pub use error::SearchError;
pub use model::{Model, ModelState};
pub use op::{EventKind, History, Op, ProcessId};
pub use report::AnalysisReport;
pub use world::{Committed, World};
