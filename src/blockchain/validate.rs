use log::debug;

use super::Block;
use super::proof::is_valid_proof;

/// Which checks a validation pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Linkage and puzzle for each adjacent pair; stated hashes are trusted.
    #[default]
    Structural,
    /// Structural, plus every block's hash must match its contents.
    Integrity,
}

/// Structural validation under one difficulty snapshot.
pub fn validate_chain(chain: &[Block], difficulty: u32) -> bool {
    validate_chain_with(chain, difficulty, ValidationMode::Structural)
}

/// Walk the chain pairwise from index 1. Empty and genesis-only chains are
/// valid; genesis is never puzzle-checked.
pub fn validate_chain_with(chain: &[Block], difficulty: u32, mode: ValidationMode) -> bool {
    if mode == ValidationMode::Integrity {
        if let Some(block) = chain.iter().find(|b| !b.has_valid_hash()) {
            debug!("block #{} hash does not match its contents", block.index());
            return false;
        }
    }

    for pair in chain.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);

        if curr.previous_hash() != prev.hash() {
            debug!(
                "block #{} links to {} but predecessor hash is {}",
                curr.index(),
                curr.previous_hash(),
                prev.hash()
            );
            return false;
        }

        if !is_valid_proof(prev.proof(), curr.proof(), difficulty) {
            debug!(
                "block #{} proof {} fails difficulty {difficulty}",
                curr.index(),
                curr.proof()
            );
            return false;
        }
    }

    true
}
