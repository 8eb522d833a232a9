//! Consensus engine for a BlockDAG visualization backend
//!
//! This library maintains a growing in-memory DAG of blocks and computes,
//! for each inserted block, the consensus metadata a renderer displays:
//! height under a strict single-parent Nakamoto chain, or selected parent,
//! blue/red mergeset, and blue score under GHOSTDAG.

pub mod consensus;

// Re-export key types for easier access
pub use dagviz_core::{
    Block, BlockId, ConsensusData, ConsensusError, ConsensusKind, ConsensusSummary, GhostdagData,
    LinearData, Params, SummaryData,
};
pub use consensus::dag::{DagTopology, GraphStore, Reachability};
pub use consensus::ghostdag::GhostdagProtocol;
pub use consensus::linear::LinearChain;
pub use consensus::manager::DagManager;
