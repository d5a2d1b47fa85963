//! Program derived addresses used by a bubblegum mint.
//!
//! Every function here is a pure function of its inputs.

use solana_program::pubkey::Pubkey;

use crate::constants::{
    ASSET_PREFIX, COLLECTION_CPI_PREFIX, EDITION_SUFFIX, METADATA_PREFIX, PROGRAM_ID_BUBBLEGUM,
    PROGRAM_ID_TOKEN_METADATA,
};

/// Tree config account of `merkle_tree`, which is also the tree authority.
pub fn get_tree_authority_address(merkle_tree: &Pubkey) -> Pubkey {
    get_tree_authority_address_and_bump(merkle_tree).0
}

pub fn get_tree_authority_address_and_bump(merkle_tree: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[merkle_tree.as_ref()], &PROGRAM_ID_BUBBLEGUM)
}

/// Signer bubblegum uses when it CPIs into token-metadata to verify a collection.
pub fn get_bubblegum_signer_address() -> Pubkey {
    Pubkey::find_program_address(&[COLLECTION_CPI_PREFIX], &PROGRAM_ID_BUBBLEGUM).0
}

pub fn get_asset_id(merkle_tree: &Pubkey, leaf_index: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[
            ASSET_PREFIX,
            merkle_tree.as_ref(),
            leaf_index.to_le_bytes().as_ref(),
        ],
        &PROGRAM_ID_BUBBLEGUM,
    )
    .0
}

pub fn get_metadata_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            METADATA_PREFIX,
            PROGRAM_ID_TOKEN_METADATA.as_ref(),
            mint.as_ref(),
        ],
        &PROGRAM_ID_TOKEN_METADATA,
    )
    .0
}

pub fn get_master_edition_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            METADATA_PREFIX,
            PROGRAM_ID_TOKEN_METADATA.as_ref(),
            mint.as_ref(),
            EDITION_SUFFIX,
        ],
        &PROGRAM_ID_TOKEN_METADATA,
    )
    .0
}
