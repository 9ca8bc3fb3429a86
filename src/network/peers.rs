use std::collections::HashSet;

use log::info;

/// Known peer addresses (`host:port`). Membership only, no ordering.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a peer. Returns `false` if it was already known or is blank.
    pub fn register(&mut self, address: &str) -> bool {
        let address = normalize(address);
        if address.is_empty() {
            return false;
        }
        let added = self.peers.insert(address.to_string());
        if added {
            info!("registered peer {address} ({} known)", self.peers.len());
        }
        added
    }

    pub fn list(&self) -> HashSet<String> {
        self.peers.clone()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }
}

/// `http://127.0.0.1:5001/` and `127.0.0.1:5001` name the same peer.
fn normalize(address: &str) -> &str {
    let address = address.trim();
    let address = address
        .strip_prefix("http://")
        .or_else(|| address.strip_prefix("https://"))
        .unwrap_or(address);
    address.trim_end_matches('/')
}
