//! Tracks the set of surviving worlds at the greatest history index reached
//! so far.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use crate::model::Model;
use crate::world::World;

struct State<M: Model> {
    max_index: usize,
    worlds: Vec<Arc<World<M>>>,
}

/// A concurrently-updated record of "how far has any branch gotten".
///
/// The search design calls for CAS-style updates; a single mutex guarding
/// both the index and the world list is used here instead, since the two
/// must change together atomically (replacing the max index without also
/// replacing the world list would leave them inconsistent) and a plain mutex
/// makes that invariant trivial to see, at the cost of a (very short,
/// uncontended in the common case) critical section instead of a lock-free
/// compare-and-swap. Readers still only ever observe a consistent snapshot.
pub struct Deepest<M: Model> {
    state: Mutex<State<M>>,
}

impl<M: Model> Deepest<M> {
    pub fn new(initial: Arc<World<M>>) -> Self {
        Self { state: Mutex::new(State { max_index: initial.index, worlds: vec![initial] }) }
    }

    /// Offers a newly-produced world. If it is deeper than anything seen so
    /// far, it replaces the current set; if tied, it joins it; if shallower,
    /// it is ignored.
    pub fn offer(&self, world: Arc<World<M>>) {
        let mut state = self.state.lock().unwrap();
        match world.index.cmp(&state.max_index) {
            Ordering::Greater => {
                state.max_index = world.index;
                state.worlds = vec![world];
            }
            Ordering::Equal => state.worlds.push(world),
            Ordering::Less => {}
        }
    }

    /// A snapshot of the deepest index reached and every world observed
    /// there.
    pub fn snapshot(&self) -> (usize, Vec<Arc<World<M>>>) {
        let state = self.state.lock().unwrap();
        (state.max_index, state.worlds.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::register::Register;

    fn world(index: usize) -> Arc<World<Register>> {
        let mut w = World::initial(Register(0));
        w.index = index;
        Arc::new(w)
    }

    #[test]
    fn deeper_world_replaces_shallower_set() {
        let deepest = Deepest::new(world(0));
        deepest.offer(world(3));
        deepest.offer(world(1));
        let (max_index, worlds) = deepest.snapshot();
        assert_eq!(max_index, 3);
        assert_eq!(worlds.len(), 1);
    }

    #[test]
    fn tied_worlds_accumulate() {
        let deepest = Deepest::new(world(2));
        deepest.offer(world(2));
        deepest.offer(world(2));
        let (max_index, worlds) = deepest.snapshot();
        assert_eq!(max_index, 2);
        assert_eq!(worlds.len(), 3);
    }
}
