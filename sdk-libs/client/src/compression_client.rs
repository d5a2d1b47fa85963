use std::fmt::Debug;

use async_trait::async_trait;
use solana_sdk::{
    account::Account, clock::Slot, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::TransactionStatus;
use tracing::warn;

use crate::{
    indexer::{
        Asset, AssetProof, DasIndexer, Indexer, IndexerError, IndexerRpcConfig, RetryConfig,
    },
    rpc::{RpcConnection, RpcConnectionConfig, RpcError, SolanaRpcConnection, TransactionMeta},
};

/// A base ledger RPC connection paired with a DAS indexer.
///
/// Implements both [`RpcConnection`] and [`Indexer`] by delegation, so code
/// that needs both capabilities takes a single client.
#[derive(Debug)]
pub struct CompressionClient<R, I> {
    pub rpc: R,
    pub indexer: I,
}

impl<R, I> CompressionClient<R, I> {
    pub fn new(rpc: R, indexer: I) -> Self {
        Self { rpc, indexer }
    }
}

impl CompressionClient<SolanaRpcConnection, DasIndexer> {
    /// Client for a ledger RPC at `rpc_url` and an indexer at `indexer_url`.
    /// Many providers serve both from the same url.
    pub fn from_urls(rpc_url: &str, indexer_url: &str) -> Self {
        Self::new(
            SolanaRpcConnection::new(RpcConnectionConfig::new(rpc_url)),
            DasIndexer::new(indexer_url.to_string(), None),
        )
    }
}

#[async_trait]
impl<R, I> RpcConnection for CompressionClient<R, I>
where
    R: RpcConnection,
    I: Indexer + Debug + 'static,
{
    fn get_url(&self) -> String {
        self.rpc.get_url()
    }

    async fn health(&self) -> Result<(), RpcError> {
        self.rpc.health().await
    }

    async fn get_slot(&self) -> Result<Slot, RpcError> {
        self.rpc.get_slot().await
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        self.rpc.get_latest_blockhash().await
    }

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.rpc.get_account(address).await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        self.rpc.send_transaction(transaction).await
    }

    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<TransactionStatus>>, RpcError> {
        self.rpc.get_signature_statuses(signatures).await
    }

    async fn get_transaction_meta(
        &self,
        signature: &Signature,
    ) -> Result<TransactionMeta, RpcError> {
        self.rpc.get_transaction_meta(signature).await
    }
}

#[async_trait]
impl<R, I> Indexer for CompressionClient<R, I>
where
    R: Send + Sync,
    I: Indexer,
{
    async fn get_asset_proof(
        &self,
        asset_id: &Pubkey,
        config: Option<IndexerRpcConfig>,
    ) -> Result<AssetProof, IndexerError> {
        self.indexer.get_asset_proof(asset_id, config).await
    }

    async fn get_asset(
        &self,
        asset_id: &Pubkey,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Asset, IndexerError> {
        self.indexer.get_asset(asset_id, config).await
    }
}

/// Polls the indexer until it serves a proof for `asset_id` that verifies
/// against its own root.
///
/// Right after a mint the indexer may not know the asset yet or may serve a
/// proof from before a concurrent append, so `AssetNotFound` and proofs that
/// do not verify are retried with exponential backoff.
pub async fn wait_for_asset_proof<I: Indexer + ?Sized>(
    indexer: &I,
    asset_id: &Pubkey,
    retry_config: RetryConfig,
) -> Result<AssetProof, IndexerError> {
    let single_attempt = IndexerRpcConfig::new(RetryConfig {
        num_retries: 1,
        ..retry_config.clone()
    });
    let mut attempts = 0;
    loop {
        attempts += 1;
        let (error, retryable) = match indexer
            .get_asset_proof(asset_id, Some(single_attempt.clone()))
            .await
        {
            Ok(proof) if proof.verify() => return Ok(proof),
            Ok(proof) => (
                IndexerError::InvalidResponseData(format!(
                    "proof for {} at node {} does not verify against its root",
                    asset_id, proof.node_index
                )),
                true,
            ),
            Err(e) => {
                let retryable = e.is_retryable() || matches!(e, IndexerError::AssetNotFound(_));
                (e, retryable)
            }
        };

        if !retryable || attempts >= retry_config.num_retries {
            return Err(error);
        }
        let delay = retry_config.delay_for_attempt(attempts);
        warn!(
            "Asset proof for {} not available (attempt {}/{}): {}. Retrying in {:?}",
            asset_id, attempts, retry_config.num_retries, error, delay
        );
        tokio::time::sleep(delay).await;
    }
}
