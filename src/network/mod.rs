pub mod consensus;
pub mod fetcher;
pub mod peers;

pub use consensus::longest_valid_chain;
pub use fetcher::{ChainFetcher, ChainSnapshot, HttpChainFetcher};
pub use peers::PeerRegistry;
