use thiserror::Error;

use crate::blockchain::SearchError;

/// Errors surfaced by the ledger node.
///
/// Chain validity failures (broken linkage, unsatisfied puzzle) are not
/// represented here: validation collapses them into a boolean.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("ledger has no blocks")]
    EmptyLedger,

    #[error("transport error from {peer}: {reason}")]
    Transport { peer: String, reason: String },

    #[error("chain tip moved from {expected} while searching for a proof")]
    StaleTip { expected: String },

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl LedgerError {
    pub fn transport(peer: &str, reason: impl std::fmt::Display) -> Self {
        Self::Transport {
            peer: peer.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
