use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use dagviz_core::{
    Block, BlockId, ConsensusData, ConsensusError, ConsensusKind, ConsensusSummary, Params,
    SummaryData,
};

use super::dag::{DagTopology, GraphStore, Reachability};
use super::ghostdag::GhostdagProtocol;
use super::linear::LinearChain;

/// Facade over a single DAG instance.
///
/// Owns the graph store and both engines, dispatches insertions by the
/// DAG's consensus kind, maintains creation order, and keeps a bounded ring
/// of past tip sets so delayed observers can be simulated. The manager is
/// the only writer; every insertion completes fully (graph write, consensus
/// data, tips history) before it returns.
pub struct DagManager {
    kind: ConsensusKind,
    params: Params,
    store: Arc<GraphStore>,
    reachability: Reachability,
    topology: DagTopology,
    ghostdag: GhostdagProtocol,
    chain: LinearChain,
    creation_order: RwLock<Vec<BlockId>>,
    /// Tip-set snapshots, oldest at the front, newest at the back. Length
    /// never exceeds `params.history_capacity`.
    tips_history: RwLock<VecDeque<Vec<BlockId>>>,
}

impl DagManager {
    pub fn new(kind: ConsensusKind, params: Params) -> Self {
        let params = Params {
            history_capacity: params.history_capacity.max(1),
            ..params
        };
        let store = Arc::new(GraphStore::new());
        Self {
            kind,
            reachability: Reachability::new(store.clone()),
            topology: DagTopology::new(store.clone()),
            ghostdag: GhostdagProtocol::new(params.ghostdag_k, store.clone()),
            chain: LinearChain::new(store.clone()),
            store,
            params,
            creation_order: RwLock::new(Vec::new()),
            tips_history: RwLock::new(VecDeque::new()),
        }
    }

    /// Creates a DAG from a kind string, failing with
    /// `UnsupportedConsensusKind` on anything unrecognized.
    pub fn from_kind_str(kind: &str, params: Params) -> Result<Self, ConsensusError> {
        Ok(Self::new(kind.parse()?, params))
    }

    pub fn kind(&self) -> ConsensusKind {
        self.kind
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Inserts a block and returns its display summary.
    ///
    /// All-or-nothing: validation and consensus computation happen before
    /// any structure is written, so a failed insertion leaves the graph,
    /// creation order, tips, and history untouched.
    pub fn add_block(
        &self,
        id: BlockId,
        parents: Vec<BlockId>,
        label: Option<String>,
    ) -> Result<ConsensusSummary, ConsensusError> {
        if self.store.contains(&id) {
            return Err(ConsensusError::DuplicateId(id));
        }
        for parent in &parents {
            if !self.store.contains(parent) {
                return Err(ConsensusError::UnknownParent(parent.clone()));
            }
        }

        let consensus = match self.kind {
            ConsensusKind::Linear => ConsensusData::Linear(self.chain.calculate(&parents)?),
            ConsensusKind::Ghostdag => ConsensusData::Ghostdag(self.ghostdag.calculate(&parents)?),
        };

        let sequence = self.creation_order.read().unwrap().len() as u64;
        let block = Block {
            id: id.clone(),
            parents,
            sequence,
            label,
            consensus,
        };
        self.store.insert(block.clone())?;
        if self.kind == ConsensusKind::Linear {
            self.chain.append(id.clone());
        }
        self.creation_order.write().unwrap().push(id.clone());

        let tips = self.store.tips();
        debug!(block = %id, kind = %self.kind, tips = tips.len(), "block inserted");
        {
            let mut history = self.tips_history.write().unwrap();
            history.push_back(tips);
            while history.len() > self.params.history_capacity {
                history.pop_front();
            }
        }

        match self.summarize(&block) {
            Some(summary) => Ok(summary),
            // The kind dispatch above wrote a concrete variant.
            None => unreachable!("inserted block carries consensus data"),
        }
    }

    /// Tip set as seen by an observer lagging `missed` insertions behind,
    /// clamped to the oldest retained snapshot. `missed = 0` is the current
    /// tip set; an empty DAG has no tips.
    pub fn get_tips(&self, missed: usize) -> Vec<BlockId> {
        let history = self.tips_history.read().unwrap();
        if history.is_empty() {
            return Vec::new();
        }
        let index = history.len() - 1 - missed.min(history.len() - 1);
        history[index].clone()
    }

    pub fn is_ancestor(&self, a: &BlockId, b: &BlockId) -> bool {
        self.reachability.is_ancestor(a, b)
    }

    pub fn anticone(&self, id: &BlockId) -> Vec<BlockId> {
        self.topology.anticone(id)
    }

    pub fn selected_chain(&self, from: &BlockId) -> Vec<BlockId> {
        self.topology.selected_chain(from)
    }

    pub fn topological_order(&self, from: &BlockId) -> Vec<BlockId> {
        self.topology.topological_sort(from)
    }

    pub fn summary_of(&self, id: &BlockId) -> Option<ConsensusSummary> {
        self.store.get(id).and_then(|block| self.summarize(&block))
    }

    pub fn creation_order(&self) -> Vec<BlockId> {
        self.creation_order.read().unwrap().clone()
    }

    pub fn blocks_len(&self) -> usize {
        self.store.len()
    }

    /// Wholesale chain replacement; linear DAGs only. Returns the previous
    /// sequence for display/undo.
    pub fn reorganize(&self, new_sequence: Vec<BlockId>) -> Result<Vec<BlockId>, ConsensusError> {
        if self.kind != ConsensusKind::Linear {
            return Err(ConsensusError::UnsupportedConsensusKind(self.kind.to_string()));
        }
        let previous = self.chain.reorganize(new_sequence)?;
        info!(length = self.chain.sequence().len(), "chain reorganized");
        Ok(previous)
    }

    /// Diagnostic consistency check. Linear DAGs validate the chain shape;
    /// GHOSTDAG DAGs validate the k-bound and the blue-score recurrence for
    /// every block.
    pub fn validate(&self) -> bool {
        match self.kind {
            ConsensusKind::Linear => self.chain.validate(),
            ConsensusKind::Ghostdag => self.validate_ghostdag(),
        }
    }

    fn validate_ghostdag(&self) -> bool {
        let k = self.params.ghostdag_k as usize;
        for id in self.store.all_ids() {
            let data = match self.store.ghostdag_data_of(&id) {
                Some(data) => data,
                None => return false,
            };
            match &data.selected_parent {
                None => {
                    if data.blue_score != 0
                        || !data.mergeset_blues.is_empty()
                        || !data.mergeset_reds.is_empty()
                    {
                        return false;
                    }
                }
                Some(selected) => {
                    if data.mergeset_blues.len() > k + 1 {
                        return false;
                    }
                    if data.mergeset_blues.first() != Some(selected) {
                        return false;
                    }
                    let parent_score = match self.store.ghostdag_data_of(selected) {
                        Some(parent_data) => parent_data.blue_score,
                        None => return false,
                    };
                    if data.blue_score != parent_score + data.mergeset_blues.len() as u64 {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// `None` for blocks carrying no consensus metadata; `add_block` always
    /// writes a concrete variant, so only raw store insertions can hit that.
    fn summarize(&self, block: &Block) -> Option<ConsensusSummary> {
        let data = match &block.consensus {
            ConsensusData::Linear(data) => SummaryData::Linear {
                height: data.height,
                parent: data.parent.clone(),
            },
            ConsensusData::Ghostdag(data) => SummaryData::Ghostdag {
                blue_score: data.blue_score,
                selected_parent: data.selected_parent.clone(),
                blue_mergeset: data.mergeset_blues.clone(),
                red_mergeset: data.mergeset_reds.clone(),
            },
            ConsensusData::None => return None,
        };
        Some(ConsensusSummary {
            id: block.id.clone(),
            is_tip: self.store.children_of(&block.id).is_empty(),
            data,
        })
    }
}
