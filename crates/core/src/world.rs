//! A partial linearization: the unit of state the search explores.

use crate::model::Model;
use crate::op::ProcessId;
use crate::pending::Pending;

/// An invocation that has been committed to a world's linearization order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Committed<C> {
    pub process: ProcessId,
    pub call: C,
}

/// A candidate partial linearization of a history.
///
/// Invariants (see the module-level search design in [`crate::analyzer`]):
///
/// 1. `fixed` is a concrete total order over a subset of invocations; the
///    data type's sequential specification, `model`, is always the result of
///    folding `fixed` in order over the model's initial state.
/// 2. `pending` holds invocations whose `Invoke` has been consumed but which
///    have not yet been linearized in this branch; at most one entry per
///    process.
/// 3. `index` is the count of history events this world has consumed;
///    `index == history.len()` marks a terminal, accepting world.
/// 4. A world is only ever constructed with a live `model`; a transition that
///    would produce [`crate::model::ModelState::Dead`] yields no world at
///    all rather than storing a poisoned one.
/// 5. Worlds carry no back-pointer to the history they were built from - only
///    `index` - so the engine can build them once and thread them through any
///    number of expansions without tying their lifetime to the history.
#[derive(Clone, Debug)]
pub struct World<M: Model> {
    pub model: M,
    pub fixed: Vec<Committed<M::Call>>,
    pub pending: Pending<M::Call>,
    pub index: usize,
}

impl<M: Model> World<M> {
    /// The empty world: no events consumed, nothing fixed or pending.
    pub fn initial(model: M) -> Self {
        Self { model, fixed: Vec::new(), pending: Pending::default(), index: 0 }
    }
}

impl<M: Model> PartialEq for World<M> {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model && self.pending == other.pending && self.index == other.index
    }
}

impl<M: Model> Eq for World<M> {}
