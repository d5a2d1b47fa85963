use solana_program::{keccak, pubkey::Pubkey};

use crate::{error::SdkError, metadata::MetadataArgs, pda::get_asset_id};

/// Leaf schema version hashed into every leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    #[default]
    V1,
}

impl Version {
    pub fn to_bytes(&self) -> u8 {
        match self {
            Version::V1 => 1,
        }
    }
}

/// Contents of a compressed leaf, as bubblegum appends it to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSchema {
    pub version: Version,
    pub id: Pubkey,
    pub owner: Pubkey,
    pub delegate: Pubkey,
    pub nonce: u64,
    pub data_hash: [u8; 32],
    pub creator_hash: [u8; 32],
}

impl LeafSchema {
    pub fn new_v1(
        id: Pubkey,
        owner: Pubkey,
        delegate: Pubkey,
        nonce: u64,
        data_hash: [u8; 32],
        creator_hash: [u8; 32],
    ) -> Self {
        Self {
            version: Version::V1,
            id,
            owner,
            delegate,
            nonce,
            data_hash,
            creator_hash,
        }
    }

    /// Leaf expected for `metadata` minted into `merkle_tree` at `leaf_index`.
    ///
    /// `metadata` must be the record as stored on chain, i.e. with the
    /// collection already marked verified after `mint_to_collection_v1`.
    pub fn from_metadata(
        metadata: &MetadataArgs,
        merkle_tree: &Pubkey,
        leaf_index: u64,
        owner: Pubkey,
        delegate: Pubkey,
    ) -> Result<Self, SdkError> {
        Ok(Self::new_v1(
            get_asset_id(merkle_tree, leaf_index),
            owner,
            delegate,
            leaf_index,
            metadata.hash_metadata()?,
            metadata.hash_creators(),
        ))
    }

    pub fn hash(&self) -> [u8; 32] {
        keccak::hashv(&[
            &[self.version.to_bytes()],
            self.id.as_ref(),
            self.owner.as_ref(),
            self.delegate.as_ref(),
            self.nonce.to_le_bytes().as_ref(),
            self.data_hash.as_ref(),
            self.creator_hash.as_ref(),
        ])
        .to_bytes()
    }
}
