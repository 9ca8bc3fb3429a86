use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blockchain::{Block, SearchBudget};
use crate::config::NodeConfig;
use crate::network::ChainFetcher;
use crate::node::Node;

/// Shared application state: the node plus how it reaches peers and how long
/// a mining request may search.
pub struct AppState {
    pub node: Node,
    pub fetcher: Box<dyn ChainFetcher>,
    pub pow_timeout: Option<Duration>,
    pub pow_max_iterations: Option<u64>,
}

impl AppState {
    pub fn new(node: Node, fetcher: Box<dyn ChainFetcher>, config: &NodeConfig) -> Self {
        Self {
            node,
            fetcher,
            pow_timeout: config.pow_timeout,
            pow_max_iterations: config.pow_max_iterations,
        }
    }

    pub fn search_budget(&self) -> SearchBudget {
        match self.pow_max_iterations {
            Some(max) => SearchBudget::with_max_iterations(max),
            None => SearchBudget::unbounded(),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
}

#[derive(Serialize, Deserialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub data: Value,
    pub proof: u64,
    pub previous_hash: String,
}

#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ResolveResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_chain: Option<Vec<Block>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<Vec<Block>>,
}

/* ---------- Difficulty API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct DifficultyResponse {
    pub difficulty: u32,
}

#[derive(Serialize, Deserialize)]
pub struct SetDifficultyResponse {
    pub message: String,
    pub difficulty: u32,
}
