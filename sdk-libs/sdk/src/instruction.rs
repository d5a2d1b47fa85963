use borsh::BorshSerialize;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::{
    constants::{
        MINT_TO_COLLECTION_V1_DISCRIMINATOR, PROGRAM_ID_ACCOUNT_COMPRESSION, PROGRAM_ID_BUBBLEGUM,
        PROGRAM_ID_NOOP, PROGRAM_ID_SYSTEM, PROGRAM_ID_TOKEN_METADATA,
    },
    error::SdkError,
    metadata::MetadataArgs,
    pda::{
        get_bubblegum_signer_address, get_master_edition_address, get_metadata_address,
        get_tree_authority_address,
    },
};

/// Accounts of a `mint_to_collection_v1` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintToCollectionV1Accounts {
    pub tree_authority: Pubkey,
    pub leaf_owner: Pubkey,
    pub leaf_delegate: Pubkey,
    pub merkle_tree: Pubkey,
    pub payer: Pubkey,
    pub tree_delegate: Pubkey,
    pub collection_authority: Pubkey,
    /// Bubblegum program id when the collection authority has no delegate record.
    pub collection_authority_record_pda: Pubkey,
    pub collection_mint: Pubkey,
    pub collection_metadata: Pubkey,
    pub edition_account: Pubkey,
    pub bubblegum_signer: Pubkey,
}

impl MintToCollectionV1Accounts {
    /// Derives every program account from the tree and collection mint.
    /// The payer acts as tree delegate and collection authority.
    pub fn new(
        merkle_tree: Pubkey,
        collection_mint: Pubkey,
        payer: Pubkey,
        leaf_owner: Pubkey,
    ) -> Self {
        Self {
            tree_authority: get_tree_authority_address(&merkle_tree),
            leaf_owner,
            leaf_delegate: leaf_owner,
            merkle_tree,
            payer,
            tree_delegate: payer,
            collection_authority: payer,
            collection_authority_record_pda: PROGRAM_ID_BUBBLEGUM,
            collection_mint,
            collection_metadata: get_metadata_address(&collection_mint),
            edition_account: get_master_edition_address(&collection_mint),
            bubblegum_signer: get_bubblegum_signer_address(),
        }
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.tree_authority, false),
            AccountMeta::new_readonly(self.leaf_owner, false),
            AccountMeta::new_readonly(self.leaf_delegate, false),
            AccountMeta::new(self.merkle_tree, false),
            AccountMeta::new(self.payer, true),
            AccountMeta::new_readonly(self.tree_delegate, true),
            AccountMeta::new_readonly(self.collection_authority, true),
            AccountMeta::new_readonly(self.collection_authority_record_pda, false),
            AccountMeta::new_readonly(self.collection_mint, false),
            AccountMeta::new(self.collection_metadata, false),
            AccountMeta::new_readonly(self.edition_account, false),
            AccountMeta::new_readonly(self.bubblegum_signer, false),
            AccountMeta::new_readonly(PROGRAM_ID_NOOP, false),
            AccountMeta::new_readonly(PROGRAM_ID_ACCOUNT_COMPRESSION, false),
            AccountMeta::new_readonly(PROGRAM_ID_TOKEN_METADATA, false),
            AccountMeta::new_readonly(PROGRAM_ID_SYSTEM, false),
        ]
    }
}

pub fn create_mint_to_collection_v1_instruction(
    accounts: &MintToCollectionV1Accounts,
    metadata: &MetadataArgs,
) -> Result<Instruction, SdkError> {
    let mut data = MINT_TO_COLLECTION_V1_DISCRIMINATOR.to_vec();
    metadata.serialize(&mut data)?;

    Ok(Instruction {
        program_id: PROGRAM_ID_BUBBLEGUM,
        accounts: accounts.to_account_metas(),
        data,
    })
}
