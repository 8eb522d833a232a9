use serde::{Deserialize, Serialize};

/// Consensus parameters for a single DAG instance.
///
/// An explicit `Params` value is constructed by the caller and handed to the
/// DAG manager; there is no process-wide configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// GHOSTDAG K parameter: bounds the blue mergeset at `k + 1` members
    /// (selected parent included). Ignored by linear DAGs.
    pub ghostdag_k: u32,
    /// Number of past tip-set snapshots retained for delayed observers.
    /// Clamped to at least 1 so the current tip set is always available.
    pub history_capacity: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            ghostdag_k: 18,
            history_capacity: 32,
        }
    }
}

impl Params {
    pub fn with_ghostdag_k(mut self, k: u32) -> Self {
        self.ghostdag_k = k;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }
}
