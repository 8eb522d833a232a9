use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ConsensusError;
use crate::BlockId;

/// Consensus discipline of a DAG instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusKind {
    /// Single-parent, tip-extension-only Nakamoto chain.
    Linear,
    /// Multi-parent GHOSTDAG with k-cluster blue/red coloring.
    Ghostdag,
}

impl fmt::Display for ConsensusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsensusKind::Linear => f.write_str("linear"),
            ConsensusKind::Ghostdag => f.write_str("ghostdag"),
        }
    }
}

impl FromStr for ConsensusKind {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" | "nakamoto" => Ok(ConsensusKind::Linear),
            "ghostdag" => Ok(ConsensusKind::Ghostdag),
            other => Err(ConsensusError::UnsupportedConsensusKind(other.to_owned())),
        }
    }
}

/// Nakamoto consensus metadata, written once at insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearData {
    /// Distance from genesis; `0` iff the block has no parent.
    pub height: u64,
    pub parent: Option<BlockId>,
    /// Unit-work accumulation: every block contributes one unit, so this is
    /// `height + 1`. Kept separate from height because reorganization
    /// recomputes both together.
    pub cumulative_work: u64,
}

impl LinearData {
    pub fn genesis() -> Self {
        Self {
            height: 0,
            parent: None,
            cumulative_work: 1,
        }
    }

    pub fn child_of(parent: BlockId, parent_height: u64) -> Self {
        Self {
            height: parent_height + 1,
            parent: Some(parent),
            cumulative_work: parent_height + 2,
        }
    }
}

/// GHOSTDAG consensus metadata, written once at insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostdagData {
    /// `blue_score(selected_parent) + |mergeset_blues|`; `0` for genesis.
    pub blue_score: u64,
    /// Parent with the highest blue score, ties broken by smallest id.
    /// `None` only for genesis.
    pub selected_parent: Option<BlockId>,
    /// Blue mergeset members in classification order, selected parent first.
    /// Bounded by `k + 1` for non-genesis blocks.
    pub mergeset_blues: Vec<BlockId>,
    /// Red mergeset members in ascending id order.
    pub mergeset_reds: Vec<BlockId>,
    /// For each blue mergeset member, the number of already-blue blocks in
    /// its anticone at classification time.
    pub blues_anticone_sizes: HashMap<BlockId, u32>,
}

impl GhostdagData {
    pub fn genesis() -> Self {
        Self {
            blue_score: 0,
            selected_parent: None,
            mergeset_blues: Vec::new(),
            mergeset_reds: Vec::new(),
            blues_anticone_sizes: HashMap::new(),
        }
    }
}

/// Consensus metadata variant carried by every block.
///
/// A single tagged type replaces per-variant block classes: each engine
/// writes its own variant and readers dispatch on the tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConsensusData {
    None,
    Linear(LinearData),
    Ghostdag(GhostdagData),
}

/// A node in the DAG. Owned exclusively by the graph store; immutable after
/// insertion except for the linear reorganization path, which rewrites
/// heights atomically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    /// Parent ids in the order the caller declared them. All parents exist
    /// at insertion time, which makes the graph acyclic by construction.
    pub parents: Vec<BlockId>,
    /// Strictly increasing insertion sequence number.
    pub sequence: u64,
    /// Optional display label for the renderer.
    pub label: Option<String>,
    pub consensus: ConsensusData,
}

impl Block {
    pub fn is_genesis(&self) -> bool {
        self.parents.is_empty()
    }

    /// Blue score for GHOSTDAG blocks, `None` otherwise.
    pub fn blue_score(&self) -> Option<u64> {
        match &self.consensus {
            ConsensusData::Ghostdag(data) => Some(data.blue_score),
            _ => None,
        }
    }

    /// Height for linear blocks, `None` otherwise.
    pub fn height(&self) -> Option<u64> {
        match &self.consensus {
            ConsensusData::Linear(data) => Some(data.height),
            _ => None,
        }
    }
}

/// Kind-specific payload of a [`ConsensusSummary`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SummaryData {
    Linear {
        height: u64,
        parent: Option<BlockId>,
    },
    Ghostdag {
        blue_score: u64,
        selected_parent: Option<BlockId>,
        blue_mergeset: Vec<BlockId>,
        red_mergeset: Vec<BlockId>,
    },
}

/// Display summary returned to the renderer after each insertion.
///
/// The renderer consumes this purely for labels and edge colors; nothing
/// flows back into the consensus core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusSummary {
    pub id: BlockId,
    pub is_tip: bool,
    pub data: SummaryData,
}
