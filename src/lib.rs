//! Minimal proof-of-work ledger node: hash-linked blocks, a tunable puzzle
//! gating new blocks, and longest-valid-chain consensus among peers.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod network;
pub mod node;
#[cfg(test)]
mod testing;

pub use blockchain::{Block, Ledger, ValidationMode};
pub use config::NodeConfig;
pub use error::{LedgerError, Result};
pub use node::Node;
