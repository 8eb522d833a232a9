use std::sync::{Arc, RwLock};

use dagviz_core::{BlockId, ConsensusData, ConsensusError, LinearData};

use crate::consensus::dag::GraphStore;

/// Nakamoto-style linear chain engine: single parent, tip-extension-only
/// insertion, with wholesale reorganization as the single sanctioned
/// post-insertion mutation.
pub struct LinearChain {
    store: Arc<GraphStore>,
    /// Ordered chain, genesis first. The last entry is the current tip.
    sequence: RwLock<Vec<BlockId>>,
}

impl LinearChain {
    pub fn new(store: Arc<GraphStore>) -> Self {
        Self {
            store,
            sequence: RwLock::new(Vec::new()),
        }
    }

    pub fn tip(&self) -> Option<BlockId> {
        self.sequence.read().unwrap().last().cloned()
    }

    pub fn sequence(&self) -> Vec<BlockId> {
        self.sequence.read().unwrap().clone()
    }

    /// Computes the consensus data for a prospective insertion without
    /// mutating anything. The first block of an empty chain is genesis and
    /// must declare no parent; every later block must declare exactly the
    /// current tip.
    pub fn calculate(&self, parents: &[BlockId]) -> Result<LinearData, ConsensusError> {
        let sequence = self.sequence.read().unwrap();
        match sequence.last() {
            None => {
                if let Some(parent) = parents.first() {
                    return Err(ConsensusError::UnknownParent(parent.clone()));
                }
                Ok(LinearData::genesis())
            }
            Some(tip) => {
                if parents.len() != 1 || &parents[0] != tip {
                    return Err(ConsensusError::NonTipExtension {
                        tip: tip.clone(),
                        parent: parents.first().cloned(),
                    });
                }
                let parent_height = self
                    .store
                    .linear_data_of(tip)
                    .map(|d| d.height)
                    .unwrap_or(0);
                Ok(LinearData::child_of(tip.clone(), parent_height))
            }
        }
    }

    /// Appends an already-stored block to the chain sequence. Called by the
    /// facade immediately after a successful insert.
    pub(crate) fn append(&self, id: BlockId) {
        self.sequence.write().unwrap().push(id);
    }

    /// Replaces the chain sequence wholesale, recomputing every member's
    /// height as its position index. Parent linkage of the replacement is
    /// not re-validated (caller responsibility; `validate` is the
    /// diagnostic). Returns the previous sequence.
    pub fn reorganize(&self, new_sequence: Vec<BlockId>) -> Result<Vec<BlockId>, ConsensusError> {
        for id in &new_sequence {
            if !self.store.contains(id) {
                return Err(ConsensusError::UnknownBlock(id.clone()));
            }
        }
        for (index, id) in new_sequence.iter().enumerate() {
            self.store.set_linear_height(id, index as u64);
        }
        let mut sequence = self.sequence.write().unwrap();
        Ok(std::mem::replace(&mut *sequence, new_sequence))
    }

    /// Diagnostic chain check: genesis has no parent, every later entry has
    /// exactly one parent equal to the preceding entry, and every height
    /// equals its index. Reports rather than errors.
    pub fn validate(&self) -> bool {
        let sequence = self.sequence.read().unwrap();
        for (index, id) in sequence.iter().enumerate() {
            let block = match self.store.get(id) {
                Some(block) => block,
                None => return false,
            };
            let data = match &block.consensus {
                ConsensusData::Linear(data) => data.clone(),
                _ => return false,
            };
            if data.height != index as u64 {
                return false;
            }
            if index == 0 {
                if !block.parents.is_empty() {
                    return false;
                }
            } else if block.parents.len() != 1 || block.parents[0] != sequence[index - 1] {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagviz_core::Block;

    fn setup() -> (Arc<GraphStore>, LinearChain) {
        let store = Arc::new(GraphStore::new());
        let chain = LinearChain::new(store.clone());
        (store, chain)
    }

    fn add(store: &GraphStore, chain: &LinearChain, id: &str, parents: &[&str], sequence: u64) -> LinearData {
        let parents: Vec<BlockId> = parents.iter().map(|p| BlockId::from(*p)).collect();
        let data = chain.calculate(&parents).unwrap();
        store
            .insert(Block {
                id: BlockId::from(id),
                parents,
                sequence,
                label: None,
                consensus: ConsensusData::Linear(data.clone()),
            })
            .unwrap();
        chain.append(BlockId::from(id));
        data
    }

    #[test]
    fn test_genesis_and_extension() {
        let (store, chain) = setup();
        let genesis = add(&store, &chain, "G", &[], 0);
        assert_eq!(genesis.height, 0);
        assert_eq!(genesis.parent, None);

        let child = add(&store, &chain, "X", &["G"], 1);
        assert_eq!(child.height, 1);
        assert_eq!(child.parent, Some(BlockId::from("G")));
        assert_eq!(child.cumulative_work, 2);

        assert_eq!(chain.tip(), Some(BlockId::from("X")));
        assert!(chain.validate());
    }

    #[test]
    fn test_non_tip_extension_rejected() {
        let (store, chain) = setup();
        add(&store, &chain, "G", &[], 0);
        add(&store, &chain, "X", &["G"], 1);

        // "Y" points at genesis, but the tip is "X"
        let result = chain.calculate(&[BlockId::from("G")]);
        assert_eq!(
            result,
            Err(ConsensusError::NonTipExtension {
                tip: BlockId::from("X"),
                parent: Some(BlockId::from("G")),
            })
        );
    }

    #[test]
    fn test_missing_parent_on_nonempty_chain_rejected() {
        let (store, chain) = setup();
        add(&store, &chain, "G", &[], 0);

        let result = chain.calculate(&[]);
        assert_eq!(
            result,
            Err(ConsensusError::NonTipExtension {
                tip: BlockId::from("G"),
                parent: None,
            })
        );
    }

    #[test]
    fn test_genesis_must_have_no_parent() {
        let (_, chain) = setup();
        let result = chain.calculate(&[BlockId::from("G")]);
        assert_eq!(result, Err(ConsensusError::UnknownParent(BlockId::from("G"))));
    }

    #[test]
    fn test_reorganize_recomputes_heights() {
        let (store, chain) = setup();
        add(&store, &chain, "G", &[], 0);
        add(&store, &chain, "A", &["G"], 1);
        add(&store, &chain, "B", &["A"], 2);

        let previous = chain
            .reorganize(vec![BlockId::from("G"), BlockId::from("A")])
            .unwrap();
        assert_eq!(
            previous,
            vec![BlockId::from("G"), BlockId::from("A"), BlockId::from("B")]
        );
        assert_eq!(chain.sequence(), vec![BlockId::from("G"), BlockId::from("A")]);
        assert_eq!(
            store.linear_data_of(&BlockId::from("A")).unwrap().height,
            1
        );
        assert!(chain.validate());
    }

    #[test]
    fn test_reorganize_unknown_block_rejected() {
        let (store, chain) = setup();
        add(&store, &chain, "G", &[], 0);

        let result = chain.reorganize(vec![BlockId::from("G"), BlockId::from("missing")]);
        assert_eq!(result, Err(ConsensusError::UnknownBlock(BlockId::from("missing"))));
        // Nothing replaced
        assert_eq!(chain.sequence(), vec![BlockId::from("G")]);
    }

    #[test]
    fn test_validate_detects_broken_linkage() {
        let (store, chain) = setup();
        add(&store, &chain, "G", &[], 0);
        add(&store, &chain, "A", &["G"], 1);
        add(&store, &chain, "B", &["A"], 2);

        // "B" now sits at index 1 but its graph parent is "A", not "G"
        chain
            .reorganize(vec![BlockId::from("G"), BlockId::from("B")])
            .unwrap();
        assert!(!chain.validate());
    }
}
