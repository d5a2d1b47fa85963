//! Compression-aware RPC client: a base ledger connection plus a Digital
//! Asset Standard indexer for compressed NFT proofs and metadata.

pub mod compression_client;
pub mod indexer;
pub mod rpc;

pub use compression_client::{wait_for_asset_proof, CompressionClient};
