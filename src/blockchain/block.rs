use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::canonical::{canonical_json, sha256_hex};
use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};

/// A single committed block. The hash is computed once at construction and
/// no field can be changed afterwards.
///
/// Serialized with exactly the fields `index, timestamp, data, proof,
/// previous_hash, hash`, which is also the peer exchange format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: f64, // Unix seconds (UTC), informational only
    data: Value,
    proof: u64,
    previous_hash: String,
    hash: String,
}

impl Block {
    /// Build a block and compute its hash from the other five fields.
    pub fn new(index: u64, timestamp: f64, data: Value, proof: u64, previous_hash: String) -> Self {
        let hash = Self::digest(index, timestamp, &data, proof, &previous_hash);
        Self {
            index,
            timestamp,
            data,
            proof,
            previous_hash,
            hash,
        }
    }

    /// The fixed first block of every chain.
    pub fn genesis() -> Self {
        Self::new(
            0,
            now_timestamp(),
            json!({ "patient_id": "Genesis", "details": "First Block" }),
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    /// SHA-256 over the sorted-key JSON of every field except `hash`.
    pub fn compute_hash(&self) -> String {
        Self::digest(
            self.index,
            self.timestamp,
            &self.data,
            self.proof,
            &self.previous_hash,
        )
    }

    /// Whether the stored hash matches the block's contents.
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    fn digest(index: u64, timestamp: f64, data: &Value, proof: u64, previous_hash: &str) -> String {
        let preimage = json!({
            "index": index,
            "timestamp": timestamp,
            "data": data,
            "proof": proof,
            "previous_hash": previous_hash,
        });
        sha256_hex(&canonical_json(&preimage))
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn proof(&self) -> u64 {
        self.proof
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// Current time as fractional Unix seconds, microsecond precision.
pub fn now_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
