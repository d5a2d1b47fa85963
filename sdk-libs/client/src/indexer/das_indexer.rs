use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, error, trace, warn};

use super::{
    das_api::{DasAsset, DasAssetProof, GetAssetParams, RpcRequest, RpcResponse},
    Asset, AssetProof, Indexer, IndexerError, IndexerRpcConfig,
};

/// Indexer client for the Digital Asset Standard read API.
pub struct DasIndexer {
    url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl DasIndexer {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self {
            url,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_url(&self) -> String {
        match &self.api_key {
            Some(key) => {
                let separator = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}api-key={}", self.url, separator, key)
            }
            None => self.url.clone(),
        }
    }

    async fn retry<F, Fut, T>(
        &self,
        config: IndexerRpcConfig,
        mut operation: F,
    ) -> Result<T, IndexerError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, IndexerError>>,
    {
        let retry_config = config.retry_config;
        let max_retries = retry_config.num_retries;
        let mut attempts = 0;

        loop {
            attempts += 1;
            trace!("Attempt {}/{}: Executing operation", attempts, max_retries);

            match operation().await {
                Ok(value) => {
                    trace!("Attempt {}/{}: Operation succeeded.", attempts, max_retries);
                    return Ok(value);
                }
                Err(e) => {
                    let is_retryable = e.is_retryable()
                        || (config.retry_not_found && matches!(e, IndexerError::AssetNotFound(_)));

                    if is_retryable && attempts < max_retries {
                        let delay = retry_config.delay_for_attempt(attempts);
                        warn!(
                            "Attempt {}/{}: Operation failed: {}. Retrying in {:?}",
                            attempts, max_retries, e, delay
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        if is_retryable {
                            error!("Operation failed after max retries: {}", e);
                        } else {
                            debug!("Operation failed with non-retryable error: {}", e);
                        }
                        return Err(e);
                    }
                }
            }
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        asset_id: &Pubkey,
    ) -> Result<T, IndexerError> {
        if *asset_id == Pubkey::default() {
            return Err(IndexerError::InvalidParameters(format!(
                "{} needs an asset id, got the default pubkey",
                method
            )));
        }
        let request = RpcRequest::new(
            method.to_string(),
            GetAssetParams {
                id: asset_id.to_string(),
            },
        );

        let response = self
            .client
            .post(self.request_url())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                IndexerError::Transient(format!("{} returned HTTP {}: {}", method, status, body))
            } else {
                IndexerError::InvalidResponseData(format!(
                    "{} returned HTTP {}: {}",
                    method, status, body
                ))
            });
        }

        let response: RpcResponse<T> = serde_json::from_str(&body)?;
        if let Some(error) = response.error {
            if error.message.to_lowercase().contains("not found") {
                return Err(IndexerError::AssetNotFound(asset_id.to_string()));
            }
            return Err(IndexerError::ApiError {
                code: error.code,
                message: error.message,
            });
        }
        response
            .result
            .ok_or_else(|| IndexerError::AssetNotFound(asset_id.to_string()))
    }
}

impl Debug for DasIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DasIndexer").field("url", &self.url).finish()
    }
}

#[async_trait]
impl Indexer for DasIndexer {
    async fn get_asset_proof(
        &self,
        asset_id: &Pubkey,
        config: Option<IndexerRpcConfig>,
    ) -> Result<AssetProof, IndexerError> {
        let config = config.unwrap_or_default();
        self.retry(config, || async {
            let proof: DasAssetProof = self.call("getAssetProof", asset_id).await?;
            AssetProof::try_from(proof)
        })
        .await
    }

    async fn get_asset(
        &self,
        asset_id: &Pubkey,
        config: Option<IndexerRpcConfig>,
    ) -> Result<Asset, IndexerError> {
        let config = config.unwrap_or_default();
        self.retry(config, || async {
            let asset: DasAsset = self.call("getAsset", asset_id).await?;
            Asset::try_from(asset)
        })
        .await
    }
}
