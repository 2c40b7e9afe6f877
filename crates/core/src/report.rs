//! The result of running the analyzer on a complete history.

use std::sync::Arc;

use crate::error::SearchError;
use crate::model::Model;
use crate::op::Op;
use crate::world::World;

/// The outcome of checking one history against one model.
#[derive(Debug)]
pub enum AnalysisReport<M: Model> {
    /// The whole history is linearizable.
    Valid {
        /// The full history, restated as the consumed prefix (always the
        /// entire input for a valid result).
        linearizable_prefix: Vec<Op<M::Call>>,
        /// Every surviving terminal world, deduplicated by equivalence
        /// fingerprint; more than one means the history admits multiple
        /// distinct linearizations.
        worlds: Vec<Arc<World<M>>>,
    },
    /// The history is not linearizable as a whole, but a strict prefix of it
    /// is.
    Invalid {
        /// The longest prefix of the history for which at least one
        /// surviving world exists.
        linearizable_prefix: Vec<Op<M::Call>>,
        /// The event immediately after the prefix: the operation whose
        /// presence no surviving world could accommodate.
        inconsistent_op: Op<M::Call>,
        /// Every surviving world at the prefix boundary, deduplicated.
        last_consistent_worlds: Vec<Arc<World<M>>>,
        /// For each of `last_consistent_worlds`, the diagnostic message
        /// produced by stepping its model with the culprit's call in
        /// isolation (a `Live` result there means the rejection stems from
        /// ordering, not from this operation being impossible on its own).
        inconsistent_transitions: Vec<(M, String)>,
    },
    /// The search could not reach a verdict.
    Error(SearchError),
}

impl<M: Model> AnalysisReport<M> {
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}
