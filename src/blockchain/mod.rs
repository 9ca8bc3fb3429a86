pub mod block;
pub mod canonical;
pub mod difficulty;
pub mod ledger;
pub mod proof;
pub mod validate;

pub use block::Block;
pub use difficulty::Difficulty;
pub use ledger::Ledger;
pub use proof::{CancelFlag, SearchBudget, SearchError, is_valid_proof, search_proof, search_proof_bounded};
pub use validate::{ValidationMode, validate_chain, validate_chain_with};

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Difficulty bounds. A SHA-256 hex digest has 64 digits.
pub const DIFF_MIN: u32 = 1;
pub const DIFF_MAX: u32 = 64;

/// Bootstrap proof of the genesis block; not puzzle-derived.
pub const GENESIS_PROOF: u64 = 100;

/// `previous_hash` sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
