use crate::BlockId;
use thiserror::Error;

/// Errors surfaced by DAG mutation operations.
///
/// Every error is detected synchronously at the offending operation and
/// insertion is all-or-nothing: a failed `add_block` leaves the graph, the
/// tip set, and the tips history untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("duplicate block id {0}")]
    DuplicateId(BlockId),

    #[error("unknown parent {0}")]
    UnknownParent(BlockId),

    #[error("linear insertion must extend the current tip {tip} (got parent {parent:?})")]
    NonTipExtension { tip: BlockId, parent: Option<BlockId> },

    #[error("unknown block {0}")]
    UnknownBlock(BlockId),

    #[error("unsupported consensus kind: {0}")]
    UnsupportedConsensusKind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConsensusError::UnknownParent(BlockId::from("P"));
        assert_eq!(err.to_string(), "unknown parent P");

        let err = ConsensusError::NonTipExtension {
            tip: BlockId::from("X"),
            parent: Some(BlockId::from("G")),
        };
        assert!(err.to_string().contains("current tip X"));
    }
}
