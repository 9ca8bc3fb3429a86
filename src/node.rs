//! The node's whole mutable state: ledger, peers and difficulty.
//!
//! Chain and pending buffer share one lock so that forging and chain
//! replacement never interleave. Proof search and peer fetches run without
//! holding it.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use log::info;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::blockchain::{
    Block, CancelFlag, Difficulty, Ledger, SearchBudget, SearchError, ValidationMode, search_proof,
    search_proof_bounded, validate_chain_with,
};
use crate::config::NodeConfig;
use crate::error::{LedgerError, Result};
use crate::network::{ChainFetcher, PeerRegistry, longest_valid_chain};

pub struct Node {
    id: String,
    ledger: Mutex<Ledger>,
    peers: Mutex<PeerRegistry>,
    difficulty: Difficulty,
    validation_mode: ValidationMode,
}

impl Node {
    /// Start a node with a fresh genesis-only ledger.
    pub fn new(difficulty: u32, validation_mode: ValidationMode) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4().simple().to_string(),
            ledger: Mutex::new(Ledger::new()),
            peers: Mutex::new(PeerRegistry::new()),
            difficulty: Difficulty::new(difficulty)?,
            validation_mode,
        })
    }

    pub fn from_config(config: &NodeConfig) -> Result<Self> {
        Self::new(config.difficulty, config.validation_mode)
    }

    /// Identifier used as the recipient of mining rewards.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().expect("mutex poisoned")
    }

    fn peers(&self) -> MutexGuard<'_, PeerRegistry> {
        self.peers.lock().expect("mutex poisoned")
    }

    /* ---------- ledger ---------- */

    /// The genesis block anchoring the current chain.
    pub fn genesis(&self) -> Block {
        self.ledger().chain()[0].clone()
    }

    pub fn append_pending(&self, record: Value) -> u64 {
        self.ledger().append_pending(record)
    }

    pub fn forge(&self, proof: u64, previous_hash: String) -> Block {
        self.ledger().forge(proof, previous_hash).clone()
    }

    pub fn tip(&self) -> Result<Block> {
        self.ledger().tip().cloned()
    }

    pub fn chain(&self) -> Vec<Block> {
        self.ledger().chain().to_vec()
    }

    pub fn pending(&self) -> Vec<Value> {
        self.ledger().pending().to_vec()
    }

    /* ---------- proof of work ---------- */

    pub fn search_proof(&self, last_proof: u64) -> u64 {
        search_proof(last_proof, self.difficulty.get())
    }

    pub fn search_proof_bounded(&self, last_proof: u64, budget: &SearchBudget) -> Result<u64> {
        Ok(search_proof_bounded(last_proof, self.difficulty.get(), budget)?)
    }

    /// Search a proof on the current tip, then forge the pending buffer plus
    /// a reward record for this node on top of it.
    ///
    /// Fails with [`LedgerError::StaleTip`] if the chain moved during the
    /// search, and with a cancelled search error if the budget's flag was
    /// raised before the ledger lock was taken. Nothing is appended in
    /// either case.
    pub fn mine(&self, budget: &SearchBudget) -> Result<Block> {
        let (last_proof, previous_hash) = {
            let ledger = self.ledger();
            let tip = ledger.tip()?;
            (tip.proof(), tip.hash().to_string())
        };
        let proof = self.search_proof_bounded(last_proof, budget)?;
        self.commit_mined(proof, previous_hash, &budget.cancel)
    }

    fn commit_mined(&self, proof: u64, previous_hash: String, cancel: &CancelFlag) -> Result<Block> {
        let mut ledger = self.ledger();
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled.into());
        }
        if ledger.tip()?.hash() != previous_hash {
            return Err(LedgerError::StaleTip {
                expected: previous_hash,
            });
        }
        ledger.append_pending(json!({
            "sender": "0",
            "recipient": self.id,
            "details": "Mining Reward",
        }));
        Ok(ledger.forge(proof, previous_hash).clone())
    }

    /* ---------- validation & consensus ---------- */

    /// Validate `chain` under the current difficulty and configured mode.
    pub fn validate_chain(&self, chain: &[Block]) -> bool {
        validate_chain_with(chain, self.difficulty.get(), self.validation_mode)
    }

    /// Validate this node's own chain.
    pub fn is_valid(&self) -> bool {
        let chain = self.chain();
        self.validate_chain(&chain)
    }

    /// Adopt the longest valid peer chain if it beats ours. Peer failures are
    /// logged and skipped; the local chain is never shortened.
    pub async fn resolve(&self, fetcher: &dyn ChainFetcher) -> Result<bool> {
        let peers = self.list_peers();
        let local_length = self.ledger().len();
        let difficulty = self.difficulty.get();

        let Some(candidate) =
            longest_valid_chain(peers, local_length, difficulty, self.validation_mode, fetcher)
                .await
        else {
            return Ok(false);
        };

        let replaced = self.ledger().replace_if_longer(candidate)?;
        if !replaced {
            info!("local chain grew past the peer candidate during resolution; keeping it");
        }
        Ok(replaced)
    }

    /* ---------- peers ---------- */

    pub fn register_peer(&self, address: &str) -> bool {
        self.peers().register(address)
    }

    pub fn list_peers(&self) -> HashSet<String> {
        self.peers().list()
    }

    /* ---------- difficulty ---------- */

    pub fn difficulty(&self) -> u32 {
        self.difficulty.get()
    }

    pub fn set_difficulty(&self, value: i64) -> Result<u32> {
        self.difficulty.set(value)
    }
}
