//! Test helpers: mined chains, wire-level tampering and an in-memory fetcher.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::blockchain::{Block, Ledger, search_proof};
use crate::error::{LedgerError, Result};
use crate::network::{ChainFetcher, ChainSnapshot};

/// Genesis plus `blocks` forged blocks, each proof found at `difficulty`.
pub fn mined_chain(blocks: usize, difficulty: u32) -> Vec<Block> {
    let mut ledger = Ledger::new();
    extend(&mut ledger, blocks, difficulty);
    ledger.chain().to_vec()
}

/// Forge `blocks` more blocks onto `ledger`.
pub fn extend(ledger: &mut Ledger, blocks: usize, difficulty: u32) {
    for i in 0..blocks {
        ledger.append_pending(json!({"patient_id": format!("p{i}"), "details": "visit"}));
        let tip = ledger.tip().unwrap().clone();
        let proof = search_proof(tip.proof(), difficulty);
        ledger.forge(proof, tip.hash().to_string());
    }
}

/// Overwrite one field of one block the way a peer payload could, keeping the
/// stated hash.
pub fn rewrite(chain: &[Block], at: usize, field: &str, value: Value) -> Vec<Block> {
    let mut raw = serde_json::to_value(chain).unwrap();
    raw[at][field] = value;
    serde_json::from_value(raw).unwrap()
}

/// Serves fixed snapshots; unknown peers fail like an unreachable host.
#[derive(Default)]
pub struct StaticFetcher {
    chains: HashMap<String, Vec<Block>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(mut self, peer: &str, chain: Vec<Block>) -> Self {
        self.chains.insert(peer.to_string(), chain);
        self
    }
}

#[async_trait]
impl ChainFetcher for StaticFetcher {
    async fn fetch_chain(&self, address: &str) -> Result<ChainSnapshot> {
        self.chains
            .get(address)
            .map(|chain| ChainSnapshot {
                length: chain.len(),
                chain: chain.clone(),
            })
            .ok_or_else(|| LedgerError::transport(address, "connection refused"))
    }
}
