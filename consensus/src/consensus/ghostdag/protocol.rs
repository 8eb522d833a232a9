use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use dagviz_core::{BlockId, ConsensusError, GhostdagData};

use crate::consensus::dag::{GraphStore, Reachability};

/// GHOSTDAG consensus computation for a single block insertion.
///
/// Given the new block's parents and the security parameter k, computes the
/// selected parent, the mergeset relative to the selected parent's past, the
/// k-cluster blue/red coloring, and the blue score. The computation only
/// reads blocks inserted strictly before the new block, so replaying an
/// identical insertion sequence reproduces identical results.
pub struct GhostdagProtocol {
    k: u32,
    store: Arc<GraphStore>,
    reachability: Reachability,
}

impl GhostdagProtocol {
    pub fn new(k: u32, store: Arc<GraphStore>) -> Self {
        let reachability = Reachability::new(store.clone());
        Self { k, store, reachability }
    }

    pub fn calculate(&self, parents: &[BlockId]) -> Result<GhostdagData, ConsensusError> {
        for parent in parents {
            if !self.store.contains(parent) {
                return Err(ConsensusError::UnknownParent(parent.clone()));
            }
        }

        if parents.is_empty() {
            return Ok(GhostdagData::genesis());
        }

        let selected_parent = self.select_parent(parents);
        let candidates = self.mergeset(&selected_parent, parents);
        let (mergeset_blues, mergeset_reds, blues_anticone_sizes) =
            self.color(&selected_parent, &candidates);

        let parent_score = self
            .store
            .ghostdag_data_of(&selected_parent)
            .map(|d| d.blue_score)
            .unwrap_or(0);
        let blue_score = parent_score + mergeset_blues.len() as u64;

        Ok(GhostdagData {
            blue_score,
            selected_parent: Some(selected_parent),
            mergeset_blues,
            mergeset_reds,
            blues_anticone_sizes,
        })
    }

    /// Parent with the highest blue score; ties broken by the
    /// lexicographically smallest id. Deterministic and total over any
    /// non-empty parent list.
    fn select_parent(&self, parents: &[BlockId]) -> BlockId {
        let score_of = |id: &BlockId| {
            self.store
                .ghostdag_data_of(id)
                .map(|d| d.blue_score)
                .unwrap_or(0)
        };
        let mut best = parents[0].clone();
        let mut best_score = score_of(&best);
        for parent in &parents[1..] {
            let score = score_of(parent);
            if score > best_score || (score == best_score && *parent < best) {
                best = parent.clone();
                best_score = score;
            }
        }
        best
    }

    /// Blocks newly incorporated into the block's history beyond the
    /// selected parent's past: breadth-first expansion from every
    /// non-selected parent, dropping anything that is already an ancestor of
    /// the selected parent. Returned in ascending id order, which is the
    /// deterministic coloring order.
    fn mergeset(&self, selected_parent: &BlockId, parents: &[BlockId]) -> Vec<BlockId> {
        let mut mergeset: HashSet<BlockId> = HashSet::new();
        let mut queue: VecDeque<BlockId> = VecDeque::new();

        for parent in parents {
            if parent == selected_parent {
                continue;
            }
            if !self.reachability.is_ancestor(parent, selected_parent)
                && mergeset.insert(parent.clone())
            {
                queue.push_back(parent.clone());
            }
        }

        while let Some(current) = queue.pop_front() {
            let current_parents = self.store.parents_of(&current).unwrap_or_default();
            for grandparent in current_parents {
                if mergeset.contains(&grandparent) {
                    continue;
                }
                // Past of the selected parent is already accounted for.
                if self.reachability.is_ancestor(&grandparent, selected_parent) {
                    continue;
                }
                mergeset.insert(grandparent.clone());
                queue.push_back(grandparent);
            }
        }

        let mut candidates: Vec<BlockId> = mergeset.into_iter().collect();
        candidates.sort();
        candidates
    }

    /// k-cluster coloring. The blue list starts with the selected parent and
    /// grows monotonically as candidates are accepted, so each candidate is
    /// judged against every blue decided before it.
    fn color(
        &self,
        selected_parent: &BlockId,
        candidates: &[BlockId],
    ) -> (Vec<BlockId>, Vec<BlockId>, HashMap<BlockId, u32>) {
        let mut blues = vec![selected_parent.clone()];
        let mut reds = Vec::new();
        let mut anticone_sizes = HashMap::from([(selected_parent.clone(), 0u32)]);

        for candidate in candidates {
            let anticone_count = blues
                .iter()
                .filter(|&blue| self.reachability.in_anticone(candidate, blue))
                .count();
            if blues.len() < (self.k as usize + 1) && anticone_count <= self.k as usize {
                anticone_sizes.insert(candidate.clone(), anticone_count as u32);
                blues.push(candidate.clone());
            } else {
                reds.push(candidate.clone());
            }
        }

        (blues, reds, anticone_sizes)
    }
}
