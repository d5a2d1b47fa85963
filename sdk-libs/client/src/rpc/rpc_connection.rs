use std::fmt::Debug;

use async_trait::async_trait;
use cnft_sdk::event::InnerInstruction;
use solana_sdk::{
    account::Account,
    clock::Slot,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use solana_transaction_status::TransactionStatus;

use crate::rpc::errors::RpcError;

#[derive(Debug, Clone)]
pub struct RpcConnectionConfig {
    pub url: String,
    pub commitment_config: Option<CommitmentConfig>,
}

impl RpcConnectionConfig {
    pub fn new(url: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            commitment_config: Some(CommitmentConfig::confirmed()),
        }
    }
}

/// Execution details of a landed transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionMeta {
    pub slot: Slot,
    pub err: Option<TransactionError>,
    pub log_messages: Vec<String>,
    /// Inner instructions in execution order, across all top-level instructions.
    pub inner_instructions: Vec<InnerInstruction>,
}

/// Base ledger RPC capability.
#[async_trait]
pub trait RpcConnection: Send + Sync + Debug + 'static {
    fn get_url(&self) -> String;

    async fn health(&self) -> Result<(), RpcError>;
    async fn get_slot(&self) -> Result<Slot, RpcError>;
    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError>;
    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError>;

    /// Sends a signed transaction. Failed simulations surface as
    /// [`RpcError::TransactionFailed`].
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError>;

    async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<TransactionStatus>>, RpcError>;

    async fn get_transaction_meta(
        &self,
        signature: &Signature,
    ) -> Result<TransactionMeta, RpcError>;
}
