pub mod das_api;
pub mod das_indexer;

mod base58;
mod config;
mod error;
mod indexer_trait;
mod types;

pub use base58::{decode_base58_to_fixed_array, decode_base58_to_pubkey, Base58Conversions};
pub use config::{IndexerRpcConfig, RetryConfig};
pub use das_indexer::DasIndexer;
pub use error::IndexerError;
pub use indexer_trait::Indexer;
pub use types::{Asset, AssetProof, CompressionInfo, Hash, COLLECTION_GROUP_KEY};
