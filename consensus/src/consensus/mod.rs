//! Consensus engines and DAG facade
//!
//! Block/DAG storage, reachability queries, the two consensus disciplines
//! (linear Nakamoto chain and GHOSTDAG), and the facade that dispatches
//! insertions between them.

pub mod dag;
pub mod ghostdag;
pub mod linear;
pub mod manager;

pub use dag::{DagTopology, GraphStore, Reachability};
pub use ghostdag::GhostdagProtocol;
pub use linear::LinearChain;
pub use manager::DagManager;
