use std::collections::HashMap;
use std::sync::RwLock;

use dagviz_core::{Block, BlockId, ConsensusData, ConsensusError, GhostdagData, LinearData};

/// Owns every block and its parent edges. Has no consensus knowledge beyond
/// storing the metadata the engines computed.
///
/// Children are derived by scanning parent edges rather than stored; at
/// visualization scale the O(n) walk is acceptable and keeps insertion a
/// single map write.
pub struct GraphStore {
    blocks: RwLock<HashMap<BlockId, Block>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a block. Fails with `DuplicateId` if the id is taken and
    /// `UnknownParent` if any declared parent is absent, without writing
    /// anything in either case. Parents existing at insertion time is what
    /// guarantees acyclicity by construction.
    pub fn insert(&self, block: Block) -> Result<(), ConsensusError> {
        let mut blocks = self.blocks.write().unwrap();
        if blocks.contains_key(&block.id) {
            return Err(ConsensusError::DuplicateId(block.id));
        }
        for parent in &block.parents {
            if !blocks.contains_key(parent) {
                return Err(ConsensusError::UnknownParent(parent.clone()));
            }
        }
        blocks.insert(block.id.clone(), block);
        Ok(())
    }

    pub fn get(&self, id: &BlockId) -> Option<Block> {
        self.blocks.read().unwrap().get(id).cloned()
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks.read().unwrap().contains_key(id)
    }

    pub fn parents_of(&self, id: &BlockId) -> Option<Vec<BlockId>> {
        self.blocks.read().unwrap().get(id).map(|b| b.parents.clone())
    }

    /// Children of `id`, derived by scanning all blocks for a parent edge.
    /// Sorted for deterministic output.
    pub fn children_of(&self, id: &BlockId) -> Vec<BlockId> {
        let blocks = self.blocks.read().unwrap();
        let mut children: Vec<BlockId> = blocks
            .values()
            .filter(|b| b.parents.contains(id))
            .map(|b| b.id.clone())
            .collect();
        children.sort();
        children
    }

    /// Blocks with no children, sorted.
    pub fn tips(&self) -> Vec<BlockId> {
        let blocks = self.blocks.read().unwrap();
        let mut tips: Vec<BlockId> = blocks
            .keys()
            .filter(|id| !blocks.values().any(|b| b.parents.contains(*id)))
            .cloned()
            .collect();
        tips.sort();
        tips
    }

    pub fn len(&self) -> usize {
        self.blocks.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().unwrap().is_empty()
    }

    pub fn all_ids(&self) -> Vec<BlockId> {
        let mut ids: Vec<BlockId> = self.blocks.read().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn linear_data_of(&self, id: &BlockId) -> Option<LinearData> {
        match self.blocks.read().unwrap().get(id).map(|b| &b.consensus) {
            Some(ConsensusData::Linear(data)) => Some(data.clone()),
            _ => None,
        }
    }

    pub fn ghostdag_data_of(&self, id: &BlockId) -> Option<GhostdagData> {
        match self.blocks.read().unwrap().get(id).map(|b| &b.consensus) {
            Some(ConsensusData::Ghostdag(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// Rewrites the height (and the derived unit cumulative work) of a
    /// linear block. Only the chain reorganization path may call this; all
    /// other consensus data is immutable after insertion.
    pub(crate) fn set_linear_height(&self, id: &BlockId, height: u64) {
        let mut blocks = self.blocks.write().unwrap();
        if let Some(block) = blocks.get_mut(id) {
            if let ConsensusData::Linear(data) = &mut block.consensus {
                data.height = height;
                data.cumulative_work = height + 1;
            }
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
