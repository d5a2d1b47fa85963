use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use super::{Asset, AssetProof, IndexerError, IndexerRpcConfig};

#[async_trait]
pub trait Indexer: Send + Sync {
    /// Merkle proof of the compressed asset `asset_id`.
    async fn get_asset_proof(
        &self,
        asset_id: &Pubkey,
        config: Option<IndexerRpcConfig>,
    ) -> Result<AssetProof, IndexerError>;

    async fn get_asset(
        &self,
        asset_id: &Pubkey,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Asset, IndexerError>;
}
