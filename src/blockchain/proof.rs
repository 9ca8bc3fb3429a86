//! Proof-of-work puzzle: find the smallest `proof` such that
//! `sha256(format!("{last_proof}{proof}"))` starts with `difficulty` hex zeros.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use super::canonical::sha256_hex;

/// How often the search loop looks at its cancel flag.
const CANCEL_CHECK_INTERVAL: u64 = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("proof search gave up after {0} candidates")]
    Exhausted(u64),

    #[error("proof search was cancelled")]
    Cancelled,
}

/// Shared flag used to stop a running search from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Limits for a single search call.
#[derive(Debug, Clone, Default)]
pub struct SearchBudget {
    pub max_iterations: Option<u64>,
    pub cancel: CancelFlag,
}

impl SearchBudget {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(max_iterations: u64) -> Self {
        Self {
            max_iterations: Some(max_iterations),
            cancel: CancelFlag::new(),
        }
    }
}

/// Check a candidate proof against the previous block's proof.
pub fn is_valid_proof(last_proof: u64, proof: u64, difficulty: u32) -> bool {
    let digest = sha256_hex(format!("{last_proof}{proof}").as_bytes());
    let difficulty = difficulty as usize;
    difficulty <= digest.len() && digest.bytes().take(difficulty).all(|b| b == b'0')
}

/// Scan `0, 1, 2, ...` and return the first valid proof. Never gives up.
pub fn search_proof(last_proof: u64, difficulty: u32) -> u64 {
    let mut proof = 0u64;
    while !is_valid_proof(last_proof, proof, difficulty) {
        proof += 1;
    }
    proof
}

/// Same scan as [`search_proof`], stopping early when the budget runs out or
/// the cancel flag is raised.
pub fn search_proof_bounded(
    last_proof: u64,
    difficulty: u32,
    budget: &SearchBudget,
) -> Result<u64, SearchError> {
    let mut proof = 0u64;
    loop {
        if let Some(max) = budget.max_iterations {
            if proof >= max {
                return Err(SearchError::Exhausted(max));
            }
        }
        if proof % CANCEL_CHECK_INTERVAL == 0 && budget.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        if is_valid_proof(last_proof, proof, difficulty) {
            return Ok(proof);
        }
        proof += 1;
    }
}
