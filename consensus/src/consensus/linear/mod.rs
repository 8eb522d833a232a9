//! Linear (Nakamoto) chain engine
//!
//! Single-parent, tip-extension-only insertion with height tracking and
//! atomic whole-chain reorganization.

pub mod chain;

pub use chain::LinearChain;
