//! Expand-then-prune: the single step a worker applies to one popped world.

use crate::model::Model;
use crate::op::{EventKind, History};
use crate::pruner::prune;
use crate::transitions::invoke;
use crate::world::World;

/// Advances `world` by exactly one "round":
///
/// - if the history is already exhausted, `world` itself is the only,
///   terminal, successor;
/// - if the next event is an `Invoke`, branch via [`invoke`] (which always
///   offers at least the "leave everything pending" no-op, so this step
///   never itself dead-ends) and prune every branch;
/// - otherwise (`Ok`/`Fail`/`Info`) delegate straight to the pruner.
///
/// A branch dying in the pruner is an ordinary dead end, not an error: it
/// simply yields zero successors.
pub fn expand_then_prune<M: Model>(history: &History<M::Call>, world: &World<M>) -> Vec<World<M>> {
    if world.index >= history.len() {
        return vec![world.clone()];
    }

    match history.events()[world.index].kind {
        EventKind::Invoke => {
            invoke(history, world, world.index).into_iter().filter_map(|w| prune(history, w)).collect()
        }
        EventKind::Ok | EventKind::Fail | EventKind::Info => {
            prune(history, world.clone()).into_iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::register::{Register, RegisterCall};
    use crate::op::Op;

    #[test]
    fn terminal_world_yields_itself() {
        let history: History<RegisterCall> = History::new(vec![]);
        let world = World::initial(Register(0));
        let out = expand_then_prune(&history, &world);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn invalid_read_leaves_no_surviving_branch() {
        // write(1) is committed; read observing 0 instead of 1 has no invoke
        // event to hide behind, so both the commit-now and leave-pending
        // branches die.
        let history = History::new(vec![
            Op::invoke(1, RegisterCall::Write(1)),
            Op::ok(1, RegisterCall::Write(1)),
            Op::invoke(2, RegisterCall::Read(None)),
            Op::ok(2, RegisterCall::Read(Some(0))),
        ]);
        let mut world = World::initial(Register(1));
        world.index = 2;
        let out = expand_then_prune(&history, &world);
        assert!(out.is_empty(), "an impossible read must leave no surviving world");
    }

    #[test]
    fn valid_read_survives_to_terminal_state() {
        let history = History::new(vec![
            Op::invoke(1, RegisterCall::Write(1)),
            Op::ok(1, RegisterCall::Write(1)),
            Op::invoke(2, RegisterCall::Read(None)),
            Op::ok(2, RegisterCall::Read(Some(1))),
        ]);
        let mut world = World::initial(Register(1));
        world.index = 2;
        let out = expand_then_prune(&history, &world);
        assert!(out.iter().any(|w| w.index == history.len()));
    }
}
