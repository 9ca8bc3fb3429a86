use log::info;
use serde_json::Value;

use super::Block;
use super::block::now_timestamp;
use crate::error::{LedgerError, Result};

/// In-memory chain plus the buffer of records waiting for the next block.
///
/// The chain is never empty: construction appends the genesis block.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Value>,
}

impl Ledger {
    /// Initialize a new ledger with a genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
        }
    }

    /// Queue a record for the next forged block. Returns that block's index.
    pub fn append_pending(&mut self, record: Value) -> u64 {
        self.pending.push(record);
        self.chain.len() as u64
    }

    /// Turn the whole pending buffer into a new block on top of the chain and
    /// empty the buffer.
    pub fn forge(&mut self, proof: u64, previous_hash: String) -> &Block {
        let data = Value::Array(std::mem::take(&mut self.pending));
        let block = Block::new(
            self.chain.len() as u64,
            now_timestamp(),
            data,
            proof,
            previous_hash,
        );
        info!(
            "forged block #{} (hash={}, proof={})",
            block.index(),
            block.hash(),
            block.proof()
        );
        self.chain.push(block);
        &self.chain[self.chain.len() - 1]
    }

    /// Return the last block in the chain.
    pub fn tip(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyLedger)
    }

    /// Swap in a whole new chain. The pending buffer is kept.
    pub fn replace(&mut self, chain: Vec<Block>) -> Result<()> {
        if chain.is_empty() {
            return Err(LedgerError::EmptyLedger);
        }
        info!(
            "replacing chain of length {} with length {}",
            self.chain.len(),
            chain.len()
        );
        self.chain = chain;
        Ok(())
    }

    /// Replace only if `chain` is strictly longer than the current one.
    pub fn replace_if_longer(&mut self, chain: Vec<Block>) -> Result<bool> {
        if chain.len() <= self.chain.len() {
            return Ok(false);
        }
        self.replace(chain)?;
        Ok(true)
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Value] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn starts_with_genesis() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.tip().unwrap().index(), 0);
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn append_returns_next_index() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.append_pending(json!({"details": "a"})), 1);
        assert_eq!(ledger.append_pending(json!({"details": "b"})), 1);
        let prev = ledger.tip().unwrap().hash().to_string();
        ledger.forge(5, prev);
        assert_eq!(ledger.append_pending(json!({"details": "c"})), 2);
    }

    #[test]
    fn forge_drains_pending_in_order() {
        let mut ledger = Ledger::new();
        ledger.append_pending(json!("a"));
        ledger.append_pending(json!("b"));
        let prev = ledger.tip().unwrap().hash().to_string();

        let block = ledger.forge(7, prev.clone()).clone();
        assert_eq!(block.index(), 1);
        assert_eq!(block.data(), &json!(["a", "b"]));
        assert_eq!(block.previous_hash(), prev);
        assert_eq!(block.proof(), 7);
        assert!(ledger.pending().is_empty());
        assert_eq!(ledger.tip().unwrap(), &block);
    }

    #[test]
    fn forge_with_empty_pending() {
        let mut ledger = Ledger::new();
        let prev = ledger.tip().unwrap().hash().to_string();
        assert_eq!(ledger.forge(1, prev).data(), &json!([]));
    }

    #[test]
    fn replace_keeps_pending() {
        let mut ledger = Ledger::new();
        ledger.append_pending(json!("keep"));
        let other = Ledger::new();
        ledger.replace(other.chain().to_vec()).unwrap();
        assert_eq!(ledger.chain(), other.chain());
        assert_eq!(ledger.pending(), &[json!("keep")]);
    }

    #[test]
    fn replace_rejects_empty() {
        let mut ledger = Ledger::new();
        assert!(matches!(ledger.replace(Vec::new()), Err(LedgerError::EmptyLedger)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn replace_if_longer_never_shortens() {
        let mut ledger = Ledger::new();
        let prev = ledger.tip().unwrap().hash().to_string();
        ledger.forge(1, prev);

        let same_length = ledger.chain().to_vec();
        assert!(!ledger.replace_if_longer(same_length).unwrap());
        assert!(!ledger.replace_if_longer(vec![Block::genesis()]).unwrap());
        assert_eq!(ledger.len(), 2);
    }
}
