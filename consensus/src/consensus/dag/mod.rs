//! DAG storage and ancestry queries
//!
//! This module provides:
//! - Block and parent-edge storage (graph store)
//! - Ancestor/anticone reachability queries
//! - Topology operations used for display (tips, anticone, ordering)

pub mod reachability;
pub mod store;
pub mod topology;

pub use reachability::Reachability;
pub use store::GraphStore;
pub use topology::DagTopology;
