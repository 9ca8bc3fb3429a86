//! Retrieval of peer chain snapshots.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::error::{LedgerError, Result};

/// Body of a peer's `/chain` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Something that can ask a peer for its current chain.
///
/// Any failure (unreachable, bad status, malformed body) is a
/// [`LedgerError::Transport`].
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, address: &str) -> Result<ChainSnapshot>;
}

/// Fetches `GET http://{address}{path}` with a per-request timeout.
pub struct HttpChainFetcher {
    client: Client,
    path: String,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration, path: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            path: path.into(),
        })
    }

    fn url(&self, address: &str) -> String {
        format!("http://{address}{}", self.path)
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, address: &str) -> Result<ChainSnapshot> {
        let response = self
            .client
            .get(self.url(address))
            .send()
            .await
            .map_err(|e| LedgerError::transport(address, e))?;

        if !response.status().is_success() {
            return Err(LedgerError::transport(
                address,
                format!("status {}", response.status()),
            ));
        }

        let snapshot = response
            .json::<ChainSnapshot>()
            .await
            .map_err(|e| LedgerError::transport(address, format!("malformed chain: {e}")))?;

        check_snapshot(address, snapshot)
    }
}

/// A snapshot whose declared length disagrees with its blocks is malformed.
fn check_snapshot(address: &str, snapshot: ChainSnapshot) -> Result<ChainSnapshot> {
    if snapshot.length != snapshot.chain.len() {
        return Err(LedgerError::transport(
            address,
            format!(
                "declared length {} but sent {} blocks",
                snapshot.length,
                snapshot.chain.len()
            ),
        ));
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mined_chain;

    #[test]
    fn builds_peer_url() {
        let fetcher = HttpChainFetcher::new(Duration::from_secs(1), "/chain").unwrap();
        assert_eq!(fetcher.url("127.0.0.1:5001"), "http://127.0.0.1:5001/chain");
    }

    #[test]
    fn decodes_reference_payload() {
        let body = r#"{
            "chain": [{
                "index": 0,
                "timestamp": 1700000000.5,
                "data": {"patient_id": "Genesis", "details": "First Block"},
                "proof": 100,
                "previous_hash": "0",
                "hash": "cc49e97437cb590b69dcf2e5be33f273aa8cf25f40250fc0642acd5f3b36532d"
            }],
            "length": 1
        }"#;
        let snapshot: ChainSnapshot = serde_json::from_str(body).unwrap();
        let snapshot = check_snapshot("peer", snapshot).unwrap();
        assert_eq!(snapshot.chain[0].timestamp(), 1700000000.5);
        assert!(snapshot.chain[0].has_valid_hash());
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let snapshot = ChainSnapshot {
            chain: mined_chain(1, 1),
            length: 5,
        };
        assert!(matches!(
            check_snapshot("peer", snapshot),
            Err(LedgerError::Transport { .. })
        ));
    }

    #[actix_web::test]
    async fn unreachable_peer_is_transport_error() {
        let fetcher = HttpChainFetcher::new(Duration::from_millis(500), "/chain").unwrap();
        let err = fetcher.fetch_chain("127.0.0.1:1").await.unwrap_err();
        assert!(matches!(err, LedgerError::Transport { ref peer, .. } if peer == "127.0.0.1:1"));
    }
}
