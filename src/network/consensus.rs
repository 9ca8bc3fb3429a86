//! Longest-valid-chain fork choice.

use log::{debug, info, warn};

use super::ChainFetcher;
use crate::blockchain::{Block, ValidationMode, validate_chain_with};

/// Ask every peer for its chain and return the longest one that is strictly
/// longer than `local_length` and passes validation under `difficulty`.
///
/// A peer that cannot be reached or sends garbage is logged and skipped.
/// Ties never win: the first peer to reach a given length keeps it.
pub async fn longest_valid_chain<I>(
    peers: I,
    local_length: usize,
    difficulty: u32,
    mode: ValidationMode,
    fetcher: &dyn ChainFetcher,
) -> Option<Vec<Block>>
where
    I: IntoIterator<Item = String>,
{
    let mut max_length = local_length;
    let mut candidate = None;

    for peer in peers {
        let snapshot = match fetcher.fetch_chain(&peer).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("could not fetch chain from {peer}: {e}");
                continue;
            }
        };

        if snapshot.length <= max_length {
            debug!(
                "peer {peer} chain length {} does not beat {max_length}",
                snapshot.length
            );
            continue;
        }

        if !validate_chain_with(&snapshot.chain, difficulty, mode) {
            warn!(
                "peer {peer} sent a longer chain ({} blocks) that fails validation",
                snapshot.length
            );
            continue;
        }

        info!("peer {peer} has a longer valid chain ({} blocks)", snapshot.length);
        max_length = snapshot.length;
        candidate = Some(snapshot.chain);
    }

    candidate
}
