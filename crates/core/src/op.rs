//! Immutable event records and the indexable history they form.

use core::fmt;

/// A process (thread, client, session) identifier. Each process has at most
/// one outstanding invocation at any point in a well-formed history.
pub type ProcessId = u64;

/// The four event kinds a history is built from.
///
/// `Info` marks a completion whose outcome was never observed (the client
/// crashed, or timed out, before a response arrived) - the call may or may
/// not have taken effect.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Invoke,
    Ok,
    Fail,
    Info,
}

/// A single logged event: one of a process's invocation, or one of its
/// completions.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Op<C> {
    pub kind: EventKind,
    pub process: ProcessId,
    pub call: C,
}

impl<C> Op<C> {
    pub fn invoke(process: ProcessId, call: C) -> Self {
        Self { kind: EventKind::Invoke, process, call }
    }

    pub fn ok(process: ProcessId, call: C) -> Self {
        Self { kind: EventKind::Ok, process, call }
    }

    pub fn fail(process: ProcessId, call: C) -> Self {
        Self { kind: EventKind::Fail, process, call }
    }

    pub fn info(process: ProcessId, call: C) -> Self {
        Self { kind: EventKind::Info, process, call }
    }
}

impl<C: fmt::Display> fmt::Display for Op<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            EventKind::Invoke => "invoke",
            EventKind::Ok => "ok",
            EventKind::Fail => "fail",
            EventKind::Info => "info",
        };
        write!(f, "{tag}(p{}, {})", self.process, self.call)
    }
}

/// A finite, indexable sequence of events in logged order.
///
/// `History` does not validate well-formedness (at most one outstanding
/// invocation per process, every invoke eventually completes); callers are
/// expected to pass in an already-completed history, e.g. one produced by a
/// history-completion pass that inserts a synthetic `Info` for any invocation
/// still open at the end of the log. The search engine itself tolerates
/// trailing `Info`s gracefully (see [`crate::transitions::info`]).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct History<C> {
    events: Vec<Op<C>>,
}

impl<C> History<C> {
    pub fn new(events: Vec<Op<C>>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Op<C>] {
        &self.events
    }
}

impl<C: Clone> History<C> {
    /// The fully-resolved call for the invocation at `invoke_index`.
    ///
    /// An invocation's own record often carries a wildcard (e.g. a read's
    /// unknown return value); the call actually fed to [`Model::step`] when
    /// this invocation is linearized must be the one that matches the call's
    /// eventual completion, since that's the only place the real return
    /// value is recorded:
    ///
    /// - completed with `Ok`: the completion's call (it carries the observed
    ///   value).
    /// - completed with `Fail` or `Info`, or never completed: the
    ///   invocation's own call (for `Fail` this is moot, the op never
    ///   commits; for `Info` the call may-or-may-not have happened, so a
    ///   later speculative commit can only use what was known at invocation
    ///   time).
    ///
    /// [`Model::step`]: crate::model::Model::step
    pub fn resolved_call(&self, invoke_index: usize) -> C {
        let invocation = &self.events[invoke_index];
        debug_assert_eq!(invocation.kind, EventKind::Invoke);
        self.events[invoke_index + 1..]
            .iter()
            .find(|ev| ev.process == invocation.process)
            .map_or_else(
                || invocation.call.clone(),
                |completion| match completion.kind {
                    EventKind::Ok => completion.call.clone(),
                    EventKind::Fail | EventKind::Info => invocation.call.clone(),
                    EventKind::Invoke => unreachable!(
                        "process {} has two outstanding invocations",
                        invocation.process
                    ),
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        Write(i64),
        Read(Option<i64>),
    }

    #[test]
    fn resolved_call_uses_completion_value_for_reads() {
        let history = History::new(vec![
            Op::invoke(1, Call::Read(None)),
            Op::ok(1, Call::Read(Some(7))),
        ]);
        assert_eq!(history.resolved_call(0), Call::Read(Some(7)));
    }

    #[test]
    fn resolved_call_falls_back_to_invocation_on_info() {
        let history = History::new(vec![Op::invoke(1, Call::Write(5)), Op::info(1, Call::Write(5))]);
        assert_eq!(history.resolved_call(0), Call::Write(5));
    }

    #[test]
    fn display_matches_expected_shape() {
        #[derive(Debug)]
        struct V(i64);
        impl fmt::Display for V {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
        let op = Op::ok(3, V(9));
        assert_eq!(format!("{op}"), "ok(p3, 9)");
    }
}
