//! The four per-event-kind world transitions (component D of the search
//! design): `invoke` branches, `ok`/`fail`/`info` each advance a single world
//! deterministically.

use crate::model::{Model, ModelState};
use crate::op::{History, ProcessId};
use crate::pending::Pending;
use crate::world::{Committed, World};

/// `Ok(op)`: the process's invocation must already have been linearized in
/// this branch (absorbed into `fixed` by an earlier [`invoke`] expansion). If
/// it is still pending, this branch guessed wrong about when to commit it -
/// real-time order requires the commit point to fall between invoke and
/// completion, and the completion has now arrived - so the world is dead.
pub fn ok<M: Model>(world: &World<M>, next_index: usize, process: ProcessId) -> Option<World<M>> {
    if world.pending.contains_process(process) {
        None
    } else {
        let mut next = world.clone();
        next.index = next_index;
        Some(next)
    }
}

/// `Fail(op)`: the invocation never took effect. If still pending, it is
/// simply dropped (no model step); if already committed, that's a
/// contradiction (a committed, hence successful, op cannot also fail) and the
/// world is dead.
pub fn fail<M: Model>(world: &World<M>, next_index: usize, process: ProcessId) -> Option<World<M>> {
    let mut next = world.clone();
    if next.pending.remove(process).is_some() {
        next.index = next_index;
        Some(next)
    } else {
        None
    }
}

/// `Info(op)`: the outcome was never observed. Per policy this never commits
/// and never removes the invocation from `pending` - it only advances the
/// cursor. A pending info'd invocation remains eligible to be linearized
/// later by a subsequent [`invoke`] expansion, using the value known at its
/// own invocation (see [`History::resolved_call`]).
pub fn info<M: Model>(world: &World<M>, next_index: usize) -> World<M> {
    let mut next = world.clone();
    next.index = next_index;
    next
}

/// `Invoke(op)`: branch into every successor reachable by committing some
/// subset (in some order) of the now-pending invocations, including the
/// newly-invoked one.
///
/// Returns the full list of live successors, including the always-present
/// "commit nothing" no-op (which never touches the model and so is always
/// live) - this is why the result can never be empty; there is always at
/// least one way to advance past an `Invoke` (leave everything pending).
pub fn invoke<M: Model>(
    history: &History<M::Call>,
    world: &World<M>,
    event_index: usize,
) -> Vec<World<M>> {
    let op = &history.events()[event_index];
    debug_assert_eq!(op.kind, crate::op::EventKind::Invoke);

    let mut pool: Vec<(ProcessId, M::Call)> =
        world.pending.iter().map(|(p, c)| (*p, c.clone())).collect();
    pool.push((op.process, history.resolved_call(event_index)));

    generate_permutations(&world.model, &pool)
        .into_iter()
        .map(|(chosen, resulting_model)| {
            let chosen_processes: Vec<ProcessId> = chosen.iter().map(|(p, _)| *p).collect();
            let mut pending = Pending::default();
            for (process, call) in &pool {
                if !chosen_processes.contains(process) {
                    pending.insert(*process, call.clone());
                }
            }
            let mut fixed = world.fixed.clone();
            fixed.extend(chosen.into_iter().map(|(process, call)| Committed { process, call }));
            World { model: resulting_model, fixed, pending, index: event_index + 1 }
        })
        .collect()
}

/// Enumerates every `(permutation, resulting model)` reachable by choosing an
/// ordered subset of `pool` and folding each element's call through `step`,
/// pruning a branch the moment it goes `Dead` rather than generating its
/// (factorially many) descendants. The empty subset is always included first
/// since it never touches the model and so is always live.
fn generate_permutations<M: Model>(
    model: &M,
    pool: &[(ProcessId, M::Call)],
) -> Vec<(Vec<(ProcessId, M::Call)>, M)> {
    let mut results = vec![(Vec::new(), model.clone())];
    extend_permutations(model, pool, &mut Vec::new(), &mut results);
    results
}

fn extend_permutations<M: Model>(
    model: &M,
    remaining: &[(ProcessId, M::Call)],
    chosen: &mut Vec<(ProcessId, M::Call)>,
    results: &mut Vec<(Vec<(ProcessId, M::Call)>, M)>,
) {
    for i in 0..remaining.len() {
        let (process, call) = remaining[i].clone();
        if let ModelState::Live(next_model) = model.step(&call) {
            chosen.push((process, call));
            results.push((chosen.clone(), next_model.clone()));

            let mut rest = Vec::with_capacity(remaining.len() - 1);
            rest.extend_from_slice(&remaining[..i]);
            rest.extend_from_slice(&remaining[i + 1..]);
            extend_permutations(&next_model, &rest, chosen, results);

            chosen.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::register::{Register, RegisterCall};
    use crate::op::Op;

    fn history() -> History<RegisterCall> {
        History::new(vec![
            Op::invoke(1, RegisterCall::Write(1)),
            Op::ok(1, RegisterCall::Write(1)),
        ])
    }

    #[test]
    fn invoke_offers_commit_and_no_op_branches() {
        let h = history();
        let world = World::initial(Register(0));
        let successors = invoke(&h, &world, 0);
        // S = {} (leave pending) and S = {p1} (commit now): exactly two branches.
        assert_eq!(successors.len(), 2);
        assert!(successors.iter().any(|w| w.pending.is_empty() && w.model == Register(1)));
        assert!(successors.iter().any(|w| w.pending.contains_process(1) && w.model == Register(0)));
    }

    #[test]
    fn ok_kills_world_with_still_pending_process() {
        let mut world = World::initial(Register(0));
        world.pending.insert(1, RegisterCall::Write(1));
        assert!(ok(&world, 1, 1).is_none());
    }

    #[test]
    fn ok_survives_when_already_absorbed() {
        let world = World::initial(Register(1));
        let next = ok(&world, 1, 1).expect("absorbed op survives");
        assert_eq!(next.index, 1);
    }

    #[test]
    fn fail_drops_pending_without_stepping_model() {
        let mut world = World::initial(Register(0));
        world.pending.insert(2, RegisterCall::Write(9));
        let next = fail(&world, 5, 2).expect("pending op can fail");
        assert!(next.pending.is_empty());
        assert_eq!(next.model, Register(0));
    }

    #[test]
    fn info_only_advances_cursor() {
        let mut world = World::initial(Register(0));
        world.pending.insert(3, RegisterCall::Write(4));
        let next = info(&world, 7);
        assert_eq!(next.index, 7);
        assert!(next.pending.contains_process(3));
    }
}
