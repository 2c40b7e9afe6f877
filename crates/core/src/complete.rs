//! History completion: the one pre-search pass the engine requires but does
//! not itself perform (component K, an external collaborator per the
//! search design).

use crate::op::{EventKind, History, Op, ProcessId};

/// Appends a synthetic `Info` completion for every invocation still open at
/// the end of `history`, in the order those invocations were first opened.
///
/// This is the minimal pass satisfying the invariant the search engine
/// requires: every invoke either already has a matching `ok`/`fail`/`info`
/// later in the log, or is given one here. The synthetic completion carries
/// the invocation's own call - no other value was ever observed for it, so
/// per [`crate::transitions::info`] it is only ever eligible to be
/// linearized using what was known at invocation time, never committed
/// outright.
///
/// Already-complete histories pass through unchanged; running this twice is
/// a no-op the second time.
pub fn complete<C: Clone>(history: History<C>) -> History<C> {
    let mut events = history.events().to_vec();
    let mut open: Vec<(ProcessId, C)> = Vec::new();
    for event in &events {
        match event.kind {
            EventKind::Invoke => open.push((event.process, event.call.clone())),
            EventKind::Ok | EventKind::Fail | EventKind::Info => {
                if let Some(position) = open.iter().position(|(p, _)| *p == event.process) {
                    open.swap_remove(position);
                }
            }
        }
    }
    events.extend(open.into_iter().map(|(process, call)| Op::info(process, call)));
    History::new(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::register::RegisterCall;

    #[test]
    fn completed_history_is_unchanged() {
        let history = History::new(vec![
            Op::invoke(1, RegisterCall::Write(1)),
            Op::ok(1, RegisterCall::Write(1)),
        ]);
        let completed = complete(history.clone());
        assert_eq!(completed.events(), history.events());
    }

    #[test]
    fn open_invocation_gets_a_trailing_info() {
        let history = History::new(vec![Op::invoke(1, RegisterCall::Write(1))]);
        let completed = complete(history);
        assert_eq!(completed.events(), &[
            Op::invoke(1, RegisterCall::Write(1)),
            Op::info(1, RegisterCall::Write(1)),
        ]);
    }

    #[test]
    fn completion_is_idempotent() {
        let history = History::new(vec![Op::invoke(1, RegisterCall::Write(1))]);
        let once = complete(history);
        let twice = complete(once.clone());
        assert_eq!(once.events(), twice.events());
    }

    #[test]
    fn multiple_open_processes_each_get_an_info_in_first_opened_order() {
        let history = History::new(vec![
            Op::invoke(1, RegisterCall::Write(1)),
            Op::invoke(2, RegisterCall::Read(None)),
            Op::ok(1, RegisterCall::Write(1)),
            Op::invoke(1, RegisterCall::Write(2)),
        ]);
        let completed = complete(history);
        let tail = &completed.events()[4..];
        assert_eq!(tail, &[Op::info(2, RegisterCall::Read(None)), Op::info(1, RegisterCall::Write(2))]);
    }
}
