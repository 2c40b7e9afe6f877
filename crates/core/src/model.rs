//! The sequential specification contract that the search engine checks a
//! history against.

use core::fmt;
use std::hash::Hash;

/// A sequential reference implementation of some data type.
///
/// `step` is the only operation a model needs to provide: given the current
/// state and a call (an operation's function plus its fully-resolved
/// argument/return value), it produces either the next state or an absorbing
/// [`ModelState::Dead`] sentinel carrying a human-readable explanation.
///
/// Implementations must never panic for an ordinary semantic rejection -
/// `Dead` is the only vocabulary for "this order is impossible". Panicking is
/// reserved for genuine programming errors (e.g. a malformed `Call`).
///
/// Two models that represent the same abstract state must compare equal and
/// hash equal; this is load-bearing for the engine's deduplication (the `Seen`
/// cache keys worlds on `(model, pending, index)`), so derived `PartialEq`/`Hash`
/// on a plain data struct is almost always the right choice.
pub trait Model: Clone + Eq + Hash + fmt::Debug {
    /// The domain-specific call type: what function was invoked, and (once
    /// known) what it produced. Reads typically carry `None`/a wildcard at
    /// invocation time and the observed value once their completion has been
    /// seen.
    type Call: Clone + Eq + Hash + fmt::Debug;

    /// Apply one call to this state.
    fn step(&self, call: &Self::Call) -> ModelState<Self>;
}

/// The result of applying a call to a model: either a live successor state,
/// or a `Dead` sentinel explaining why this order cannot be realized.
///
/// `Dead` is absorbing: once produced it is never fed back into `step`, the
/// world that produced it is simply discarded by the caller.
#[derive(Clone, Debug)]
pub enum ModelState<M: Model> {
    /// The call was accepted; this is the resulting state.
    Live(M),
    /// The call is inconsistent with this state. The message is surfaced to
    /// callers for diagnostics only and never parsed.
    Dead(String),
}

impl<M: Model> ModelState<M> {
    /// Returns the live state, if any.
    pub fn into_live(self) -> Option<M> {
        match self {
            Self::Live(m) => Some(m),
            Self::Dead(_) => None,
        }
    }

    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}
