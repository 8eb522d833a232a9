use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use dagviz_core::BlockId;

use super::store::GraphStore;

/// Ancestry oracle over the graph store.
///
/// Queries are pure parent-edge traversals re-evaluated on demand. The store
/// only admits blocks whose parents already exist, so the walk cannot cycle;
/// the visited set guards against re-expanding shared ancestry.
pub struct Reachability {
    store: Arc<GraphStore>,
}

impl Reachability {
    pub fn new(store: Arc<GraphStore>) -> Self {
        Self { store }
    }

    /// True iff `a == b` or `a` is reachable by following parent edges
    /// starting from `b`.
    pub fn is_ancestor(&self, a: &BlockId, b: &BlockId) -> bool {
        if a == b {
            return true;
        }
        let mut visited: HashSet<BlockId> = HashSet::new();
        let mut queue: VecDeque<BlockId> = match self.store.parents_of(b) {
            Some(parents) => parents.into(),
            None => return false,
        };
        while let Some(current) = queue.pop_front() {
            if &current == a {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(parents) = self.store.parents_of(&current) {
                queue.extend(parents);
            }
        }
        false
    }

    /// True iff neither block is an ancestor of the other.
    pub fn in_anticone(&self, a: &BlockId, b: &BlockId) -> bool {
        !self.is_ancestor(a, b) && !self.is_ancestor(b, a)
    }
}
