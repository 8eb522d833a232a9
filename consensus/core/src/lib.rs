//! Core types for the dagviz consensus engine
//!
//! This crate defines the block model shared by both consensus variants
//! (linear Nakamoto chain and GHOSTDAG), the consensus metadata each variant
//! writes at insertion time, and the error and parameter types used across
//! the workspace. It holds no graph state of its own.

pub mod block;
pub mod config;
pub mod errors;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use block::{
    Block, ConsensusData, ConsensusKind, ConsensusSummary, GhostdagData, LinearData, SummaryData,
};
pub use config::Params;
pub use errors::ConsensusError;

/// Unique block identifier within a DAG.
///
/// Identifiers are plain strings chosen by the caller (the visualization
/// layer labels blocks "G", "B1", and so on). Lexicographic `Ord` on the
/// underlying string is load-bearing: it is the GHOSTDAG selected-parent
/// tie-break and the deterministic mergeset processing order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_ordering_is_lexicographic() {
        let b1 = BlockId::from("B1");
        let b2 = BlockId::from("B2");
        assert!(b1 < b2);
        assert_eq!(b1.to_string(), "B1");
    }

    #[test]
    fn test_block_id_serializes_transparently() {
        let id = BlockId::from("G");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"G\"");
    }
}
