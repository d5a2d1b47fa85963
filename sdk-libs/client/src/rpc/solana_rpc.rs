use std::{
    fmt::{Debug, Formatter},
    str::FromStr,
    time::Duration,
};

use async_trait::async_trait;
use cnft_sdk::event::InnerInstruction;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcSendTransactionConfig, RpcTransactionConfig},
};
use solana_sdk::{
    account::Account,
    clock::Slot,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::{
    option_serializer::OptionSerializer, TransactionStatus, UiInstruction, UiTransactionEncoding,
};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use super::rpc_connection::{RpcConnectionConfig, TransactionMeta};
use crate::rpc::{errors::RpcError, rpc_connection::RpcConnection};

#[derive(Clone, Debug, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Overall time budget across all attempts of one call.
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: 10,
            retry_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct SolanaRpcConnection {
    pub client: RpcClient,
    pub retry_config: RetryConfig,
}

impl Debug for SolanaRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolanaRpcConnection {{ client: {:?} }}",
            self.client.url()
        )
    }
}

impl SolanaRpcConnection {
    pub fn new(config: RpcConnectionConfig) -> Self {
        Self::new_with_retry(config, None)
    }

    pub fn new_with_retry(config: RpcConnectionConfig, retry_config: Option<RetryConfig>) -> Self {
        let commitment_config = config
            .commitment_config
            .unwrap_or(CommitmentConfig::confirmed());
        let client = RpcClient::new_with_commitment(config.url, commitment_config);
        Self {
            client,
            retry_config: retry_config.unwrap_or_default(),
        }
    }

    async fn retry<F, Fut, T>(&self, operation: F) -> Result<T, RpcError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, RpcError>>,
    {
        let mut attempts = 0;
        let start_time = Instant::now();
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_transient() {
                        return Err(e);
                    }
                    attempts += 1;
                    if attempts >= self.retry_config.max_retries
                        || start_time.elapsed() >= self.retry_config.timeout
                    {
                        return Err(e);
                    }
                    warn!(
                        "Operation failed, retrying in {:?} (attempt {}/{}): {:?}",
                        self.retry_config.retry_delay,
                        attempts,
                        self.retry_config.max_retries,
                        e
                    );
                    sleep(self.retry_config.retry_delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl RpcConnection for SolanaRpcConnection {
    fn get_url(&self) -> String {
        self.client.url()
    }

    async fn health(&self) -> Result<(), RpcError> {
        self.retry(|| async { self.client.get_health().await.map_err(RpcError::from) })
            .await
    }

    async fn get_slot(&self) -> Result<Slot, RpcError> {
        self.retry(|| async { self.client.get_slot().await.map_err(RpcError::from) })
            .await
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        self.retry(|| async {
            self.client
                .get_latest_blockhash_with_commitment(CommitmentConfig::confirmed())
                .await
                .map(|(hash, _last_valid_block_height)| hash)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.retry(|| async {
            self.client
                .get_account_with_commitment(&address, self.client.commitment())
                .await
                .map(|response| response.value)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        self.retry(|| async {
            self.client
                .send_transaction_with_config(
                    transaction,
                    RpcSendTransactionConfig {
                        skip_preflight: false,
                        preflight_commitment: Some(self.client.commitment().commitment),
                        max_retries: Some(0),
                        ..Default::default()
                    },
                )
                .await
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<TransactionStatus>>, RpcError> {
        self.retry(|| async {
            self.client
                .get_signature_statuses(signatures)
                .await
                .map(|response| response.value)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_transaction_meta(
        &self,
        signature: &Signature,
    ) -> Result<TransactionMeta, RpcError> {
        let transaction = self
            .retry(|| async {
                self.client
                    .get_transaction_with_config(
                        signature,
                        RpcTransactionConfig {
                            encoding: Some(UiTransactionEncoding::Base64),
                            commitment: Some(self.client.commitment()),
                            max_supported_transaction_version: Some(0),
                        },
                    )
                    .await
                    .map_err(RpcError::from)
            })
            .await?;

        let decoded_transaction = transaction.transaction.transaction.decode().ok_or_else(|| {
            RpcError::CustomError("Failed to decode transaction".to_string())
        })?;
        let meta = transaction.transaction.meta.ok_or_else(|| {
            RpcError::CustomError("Transaction missing metadata information".to_string())
        })?;

        let mut account_keys = decoded_transaction.message.static_account_keys().to_vec();
        if let OptionSerializer::Some(loaded) = &meta.loaded_addresses {
            for key in loaded.writable.iter().chain(loaded.readonly.iter()) {
                account_keys.push(Pubkey::from_str(key).map_err(|e| {
                    RpcError::CustomError(format!("Invalid loaded address {}: {}", key, e))
                })?);
            }
        }

        let mut inner_instructions = Vec::new();
        if let OptionSerializer::Some(inner) = &meta.inner_instructions {
            for ix in inner.iter() {
                for ui_instruction in ix.instructions.iter() {
                    match ui_instruction {
                        UiInstruction::Compiled(ui_compiled_instruction) => {
                            let data = bs58::decode(&ui_compiled_instruction.data)
                                .into_vec()
                                .map_err(|_| {
                                    RpcError::CustomError(
                                        "Failed to decode instruction data".to_string(),
                                    )
                                })?;
                            let program_id = account_keys
                                .get(ui_compiled_instruction.program_id_index as usize)
                                .copied()
                                .ok_or_else(|| {
                                    RpcError::CustomError(
                                        "Inner instruction program index out of range".to_string(),
                                    )
                                })?;
                            inner_instructions.push(InnerInstruction { program_id, data });
                        }
                        UiInstruction::Parsed(_) => {
                            debug!("Skipping parsed inner instruction");
                        }
                    }
                }
            }
        }

        let log_messages = match meta.log_messages {
            OptionSerializer::Some(logs) => logs,
            _ => Vec::new(),
        };

        Ok(TransactionMeta {
            slot: transaction.slot,
            err: meta.err,
            log_messages,
            inner_instructions,
        })
    }
}
