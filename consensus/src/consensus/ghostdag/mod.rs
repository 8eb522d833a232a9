//! GHOSTDAG consensus implementation
//!
//! Implements the multi-parent consensus variant: selected-parent
//! resolution, mergeset computation relative to the selected parent's past,
//! k-cluster blue/red coloring, and blue-score accumulation.

pub mod protocol;

pub use protocol::GhostdagProtocol;
