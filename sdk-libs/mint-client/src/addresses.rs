use std::str::FromStr;

use cnft_sdk::pda::{get_master_edition_address, get_metadata_address, get_tree_authority_address};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::error::MintError;

/// Parses a base58 address supplied for `field`.
pub fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, MintError> {
    Pubkey::from_str(value.trim()).map_err(|e| MintError::malformed_address(field, e))
}

fn check_derived(field: &str, supplied: Pubkey, derived: Pubkey) -> Result<(), MintError> {
    if supplied != derived {
        return Err(MintError::malformed_address(
            field,
            format!("expected derived address {}, got {}", derived, supplied),
        ));
    }
    Ok(())
}

/// A merkle tree and its bubblegum tree authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRef {
    pub merkle_tree: Pubkey,
    pub tree_authority: Pubkey,
}

impl TreeRef {
    pub fn new(merkle_tree: Pubkey) -> Self {
        let tree_authority = get_tree_authority_address(&merkle_tree);
        debug!("Derived tree authority {} for tree {}", tree_authority, merkle_tree);
        Self {
            merkle_tree,
            tree_authority,
        }
    }

    /// Uses a supplied authority, which must equal the derived one.
    pub fn with_authority(merkle_tree: Pubkey, tree_authority: Pubkey) -> Result<Self, MintError> {
        let tree = Self {
            merkle_tree,
            tree_authority,
        };
        tree.validate()?;
        Ok(tree)
    }

    pub fn validate(&self) -> Result<(), MintError> {
        check_derived(
            "tree_authority",
            self.tree_authority,
            get_tree_authority_address(&self.merkle_tree),
        )
    }
}

/// A verified collection: its mint, metadata and master edition accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionRef {
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub master_edition: Pubkey,
}

impl CollectionRef {
    pub fn new(mint: Pubkey) -> Self {
        let metadata = get_metadata_address(&mint);
        let master_edition = get_master_edition_address(&mint);
        debug!(
            "Derived collection metadata {} and master edition {} for mint {}",
            metadata, master_edition, mint
        );
        Self {
            mint,
            metadata,
            master_edition,
        }
    }

    pub fn with_accounts(
        mint: Pubkey,
        metadata: Pubkey,
        master_edition: Pubkey,
    ) -> Result<Self, MintError> {
        let collection = Self {
            mint,
            metadata,
            master_edition,
        };
        collection.validate()?;
        Ok(collection)
    }

    pub fn validate(&self) -> Result<(), MintError> {
        check_derived(
            "collection_metadata",
            self.metadata,
            get_metadata_address(&self.mint),
        )?;
        check_derived(
            "collection_master_edition",
            self.master_edition,
            get_master_edition_address(&self.mint),
        )
    }
}
