use std::collections::HashSet;
use std::sync::Arc;

use dagviz_core::{Block, BlockId, ConsensusData};

use super::reachability::Reachability;
use super::store::GraphStore;

/// Read-only topology queries used by the renderer for layout: anticones,
/// the selected-parent chain, and parents-before-children ordering.
pub struct DagTopology {
    store: Arc<GraphStore>,
    reachability: Reachability,
}

impl DagTopology {
    pub fn new(store: Arc<GraphStore>) -> Self {
        let reachability = Reachability::new(store.clone());
        Self { store, reachability }
    }

    pub fn is_tip(&self, id: &BlockId) -> bool {
        self.store.children_of(id).is_empty() && self.store.contains(id)
    }

    /// All blocks that are neither ancestors nor descendants of `id`,
    /// ascending id order.
    pub fn anticone(&self, id: &BlockId) -> Vec<BlockId> {
        self.store
            .all_ids()
            .into_iter()
            .filter(|other| self.reachability.in_anticone(id, other))
            .collect()
    }

    /// Walks primary parents back to genesis and returns the chain genesis
    /// first. GHOSTDAG blocks follow their selected parent, linear blocks
    /// their single parent.
    pub fn selected_chain(&self, from: &BlockId) -> Vec<BlockId> {
        let mut chain = Vec::new();
        let mut current = from.clone();
        while let Some(block) = self.store.get(&current) {
            chain.push(current.clone());
            match Self::chain_parent(&block) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        chain.reverse();
        chain
    }

    /// Ancestry of `from` (inclusive) in an order that places every parent
    /// before its children.
    pub fn topological_sort(&self, from: &BlockId) -> Vec<BlockId> {
        let mut visited = HashSet::new();
        let mut result = Vec::new();
        self.dfs_parents(from, &mut visited, &mut result);
        result
    }

    fn dfs_parents(&self, id: &BlockId, visited: &mut HashSet<BlockId>, result: &mut Vec<BlockId>) {
        if !visited.insert(id.clone()) {
            return;
        }
        if let Some(parents) = self.store.parents_of(id) {
            for parent in parents {
                self.dfs_parents(&parent, visited, result);
            }
            result.push(id.clone());
        }
    }

    fn chain_parent(block: &Block) -> Option<BlockId> {
        match &block.consensus {
            ConsensusData::Ghostdag(data) => data.selected_parent.clone(),
            ConsensusData::Linear(data) => data.parent.clone(),
            ConsensusData::None => block.parents.first().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(edges: &[(&str, &[&str])]) -> (Arc<GraphStore>, DagTopology) {
        let store = Arc::new(GraphStore::new());
        for (sequence, (id, parents)) in edges.iter().enumerate() {
            store
                .insert(Block {
                    id: BlockId::from(*id),
                    parents: parents.iter().map(|p| BlockId::from(*p)).collect(),
                    sequence: sequence as u64,
                    label: None,
                    consensus: ConsensusData::None,
                })
                .unwrap();
        }
        let topology = DagTopology::new(store.clone());
        (store, topology)
    }

    #[test]
    fn test_anticone_fork_scenario() {
        let (_, topology) = setup(&[
            ("G", &[]),
            ("B1", &["G"]),
            ("B2", &["G"]),
            ("C", &["B1", "B2"]),
        ]);

        assert_eq!(topology.anticone(&BlockId::from("B1")), vec![BlockId::from("B2")]);
        assert!(topology.anticone(&BlockId::from("G")).is_empty());
        assert!(topology.anticone(&BlockId::from("C")).is_empty());
    }

    #[test]
    fn test_selected_chain_genesis_first() {
        let (_, topology) = setup(&[("G", &[]), ("A", &["G"]), ("B", &["A"])]);

        let chain = topology.selected_chain(&BlockId::from("B"));
        assert_eq!(
            chain,
            vec![BlockId::from("G"), BlockId::from("A"), BlockId::from("B")]
        );
    }

    #[test]
    fn test_topological_sort_parents_first() {
        let (_, topology) = setup(&[
            ("G", &[]),
            ("A", &["G"]),
            ("B", &["G"]),
            ("C", &["A", "B"]),
        ]);

        let order = topology.topological_sort(&BlockId::from("C"));
        let pos = |id: &str| order.iter().position(|b| b == &BlockId::from(id)).unwrap();
        assert_eq!(pos("G"), 0);
        assert!(pos("A") < pos("C"));
        assert!(pos("B") < pos("C"));
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn test_is_tip() {
        let (_, topology) = setup(&[("G", &[]), ("A", &["G"])]);
        assert!(topology.is_tip(&BlockId::from("A")));
        assert!(!topology.is_tip(&BlockId::from("G")));
        assert!(!topology.is_tip(&BlockId::from("missing")));
    }
}
