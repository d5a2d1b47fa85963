use cnft_sdk::{merkle::verify_proof, metadata::Creator};
use solana_sdk::pubkey::Pubkey;

use super::{
    base58::{decode_base58_option_to_pubkey, decode_base58_to_fixed_array, decode_base58_to_pubkey},
    das_api::{DasAsset, DasAssetProof, DasCompression},
    error::IndexerError,
};

pub type Hash = [u8; 32];

pub const COLLECTION_GROUP_KEY: &str = "collection";

/// Merkle proof of a compressed asset, as served by the indexer.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetProof {
    pub root: Hash,
    /// Sibling hashes from the leaf level upwards.
    pub proof: Vec<Hash>,
    pub node_index: u64,
    pub leaf: Hash,
    pub tree_id: Pubkey,
}

impl AssetProof {
    pub fn depth(&self) -> usize {
        self.proof.len()
    }

    /// Leaf index derived from the node index: `node_index - 2^depth`.
    pub fn leaf_index(&self) -> Result<u32, IndexerError> {
        let first_leaf = 1u64.checked_shl(self.depth() as u32).ok_or_else(|| {
            IndexerError::InvalidResponseData(format!("proof depth {} too large", self.depth()))
        })?;
        self.node_index
            .checked_sub(first_leaf)
            .filter(|index| *index < first_leaf)
            .and_then(|index| u32::try_from(index).ok())
            .ok_or_else(|| {
                IndexerError::InvalidResponseData(format!(
                    "node index {} is not a leaf of a depth {} tree",
                    self.node_index,
                    self.depth()
                ))
            })
    }

    /// Recomputes the root from `leaf` and `proof` and compares it with `root`.
    pub fn verify(&self) -> bool {
        match self.leaf_index() {
            Ok(leaf_index) => verify_proof(&self.root, &self.leaf, &self.proof, leaf_index),
            Err(_) => false,
        }
    }
}

impl TryFrom<DasAssetProof> for AssetProof {
    type Error = IndexerError;

    fn try_from(value: DasAssetProof) -> Result<Self, Self::Error> {
        let proof = value
            .proof
            .iter()
            .map(|node| decode_base58_to_fixed_array("proof", node))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            root: decode_base58_to_fixed_array("root", &value.root)?,
            proof,
            node_index: value.node_index,
            leaf: decode_base58_to_fixed_array("leaf", &value.leaf)?,
            tree_id: decode_base58_to_pubkey("tree_id", &value.tree_id)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionInfo {
    pub data_hash: Hash,
    pub creator_hash: Hash,
    pub asset_hash: Hash,
    pub tree: Pubkey,
    pub seq: u64,
    pub leaf_id: u64,
}

impl TryFrom<DasCompression> for CompressionInfo {
    type Error = IndexerError;

    fn try_from(value: DasCompression) -> Result<Self, Self::Error> {
        Ok(Self {
            data_hash: decode_base58_to_fixed_array("data_hash", &value.data_hash)?,
            creator_hash: decode_base58_to_fixed_array("creator_hash", &value.creator_hash)?,
            asset_hash: decode_base58_to_fixed_array("asset_hash", &value.asset_hash)?,
            tree: decode_base58_to_pubkey("tree", &value.tree)?,
            seq: value.seq,
            leaf_id: value.leaf_id,
        })
    }
}

/// A digital asset as described by the indexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: Pubkey,
    pub interface: String,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    /// Present only for compressed assets.
    pub compression: Option<CompressionInfo>,
    pub owner: Pubkey,
    pub delegate: Option<Pubkey>,
    pub frozen: bool,
    pub royalty_basis_points: u16,
    pub primary_sale_happened: bool,
    pub creators: Vec<Creator>,
    pub collection: Option<Pubkey>,
    pub mutable: bool,
    pub burnt: bool,
}

impl Asset {
    pub fn is_compressed(&self) -> bool {
        self.compression.is_some()
    }
}

impl TryFrom<DasAsset> for Asset {
    type Error = IndexerError;

    fn try_from(value: DasAsset) -> Result<Self, Self::Error> {
        let content = value.content.unwrap_or_default();
        let compression = value
            .compression
            .filter(|compression| compression.compressed)
            .map(CompressionInfo::try_from)
            .transpose()?;
        let creators = value
            .creators
            .iter()
            .map(|creator| {
                Ok(Creator {
                    address: decode_base58_to_pubkey("creator", &creator.address)?,
                    verified: creator.verified,
                    share: creator.share,
                })
            })
            .collect::<Result<Vec<_>, IndexerError>>()?;
        let collection = value
            .grouping
            .iter()
            .find(|group| group.group_key == COLLECTION_GROUP_KEY)
            .map(|group| decode_base58_to_pubkey("collection", &group.group_value))
            .transpose()?;
        let (royalty_basis_points, primary_sale_happened) = value
            .royalty
            .map(|royalty| (royalty.basis_points, royalty.primary_sale_happened))
            .unwrap_or_default();

        Ok(Self {
            id: decode_base58_to_pubkey("id", &value.id)?,
            interface: value.interface,
            name: content.metadata.name,
            symbol: content.metadata.symbol,
            uri: content.json_uri,
            compression,
            owner: decode_base58_to_pubkey("owner", &value.ownership.owner)?,
            delegate: decode_base58_option_to_pubkey("delegate", &value.ownership.delegate)?,
            frozen: value.ownership.frozen,
            royalty_basis_points,
            primary_sale_happened,
            creators,
            collection,
            mutable: value.mutable,
            burnt: value.burnt,
        })
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::keccak;

    use super::*;
    use crate::indexer::base58::Base58Conversions;

    fn hash_pair(left: &Hash, right: &Hash) -> Hash {
        keccak::hashv(&[&left[..], &right[..]]).to_bytes()
    }

    #[test]
    fn test_leaf_index_and_verify() {
        let leaves: Vec<Hash> = (1u8..=4).map(|i| [i; 32]).collect();
        let left = hash_pair(&leaves[0], &leaves[1]);
        let right = hash_pair(&leaves[2], &leaves[3]);
        let root = hash_pair(&left, &right);

        let proof = AssetProof {
            root,
            proof: vec![leaves[3], left],
            node_index: 4 + 2,
            leaf: leaves[2],
            tree_id: Pubkey::new_unique(),
        };
        assert_eq!(proof.leaf_index().unwrap(), 2);
        assert!(proof.verify());

        let mut wrong_index = proof.clone();
        wrong_index.node_index = 4 + 3;
        assert!(!wrong_index.verify());

        let mut not_a_leaf = proof.clone();
        not_a_leaf.node_index = 3;
        assert!(not_a_leaf.leaf_index().is_err());
        assert!(!not_a_leaf.verify());
    }

    #[test]
    fn test_asset_proof_try_from() {
        let tree = Pubkey::new_unique();
        let das = DasAssetProof {
            root: [1u8; 32].to_base58(),
            proof: vec![[2u8; 32].to_base58(), [3u8; 32].to_base58()],
            node_index: 5,
            leaf: [4u8; 32].to_base58(),
            tree_id: tree.to_string(),
        };
        let proof = AssetProof::try_from(das.clone()).unwrap();
        assert_eq!(proof.proof, vec![[2u8; 32], [3u8; 32]]);
        assert_eq!(proof.tree_id, tree);
        assert_eq!(proof.leaf_index().unwrap(), 1);

        let bad = DasAssetProof {
            root: "not-base58!".to_string(),
            ..das
        };
        assert!(matches!(
            AssetProof::try_from(bad),
            Err(IndexerError::Base58Decode { .. })
        ));
    }
}
