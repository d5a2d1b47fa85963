use async_trait::async_trait;
use cnft_sdk::{
    pda::get_tree_authority_address,
    state::{MerkleTreeState, TreeConfig},
    SdkError,
};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use super::{RpcConnection, RpcError};

#[derive(Error, Debug)]
pub enum TreeAccountsExtError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Sdk(#[from] SdkError),

    #[error("Account {0} not found")]
    AccountNotFound(Pubkey),
}

/// Extension to the RPC connection which reads the accounts backing a
/// compressed NFT tree.
#[async_trait]
pub trait TreeAccountsExt: RpcConnection {
    /// Bubblegum tree config of `merkle_tree`, read from its tree authority.
    async fn get_tree_config(&self, merkle_tree: &Pubkey) -> Result<TreeConfig, TreeAccountsExtError> {
        let tree_authority = get_tree_authority_address(merkle_tree);
        let account = self
            .get_account(tree_authority)
            .await?
            .ok_or(TreeAccountsExtError::AccountNotFound(tree_authority))?;
        Ok(TreeConfig::deserialize_account(&account.data)?)
    }

    async fn get_merkle_tree_state(
        &self,
        merkle_tree: &Pubkey,
    ) -> Result<MerkleTreeState, TreeAccountsExtError> {
        let account = self
            .get_account(*merkle_tree)
            .await?
            .ok_or(TreeAccountsExtError::AccountNotFound(*merkle_tree))?;
        Ok(MerkleTreeState::deserialize_account(&account.data)?)
    }
}

impl<T: RpcConnection> TreeAccountsExt for T {}
