//! Deterministic, branch-free advancement through `Ok`/`Fail`/`Info` events.

use crate::model::Model;
use crate::op::{EventKind, History};
use crate::transitions::{fail, info, ok};
use crate::world::World;

/// Repeatedly applies the single-successor transition for the event at
/// `world.index`, stopping at the next `Invoke` or when the history is
/// exhausted, and returning `None` the moment any step dies.
///
/// This is purely an optimization over re-enqueuing after every
/// non-branching event: since `Ok`/`Fail`/`Info` each produce at most one
/// successor, there is never a choice to defer to the frontier, so the
/// engine advances through all of them eagerly in one step.
pub fn prune<M: Model>(history: &History<M::Call>, world: World<M>) -> Option<World<M>> {
    let mut current = world;
    loop {
        if current.index >= history.len() {
            return Some(current);
        }
        let event = &history.events()[current.index];
        current = match event.kind {
            EventKind::Invoke => return Some(current),
            EventKind::Ok => ok(&current, current.index + 1, event.process)?,
            EventKind::Fail => fail(&current, current.index + 1, event.process)?,
            EventKind::Info => info(&current, current.index + 1),
        };
    }
}
