//! Read-only views of the accounts a mint depends on.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::{
    constants::{CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1, TREE_CONFIG_DISCRIMINATOR},
    error::SdkError,
};

/// Bubblegum tree config, stored at the tree authority address.
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    pub tree_creator: Pubkey,
    pub tree_delegate: Pubkey,
    pub total_mint_capacity: u64,
    pub num_minted: u64,
    pub is_public: bool,
}

impl TreeConfig {
    pub fn deserialize_account(data: &[u8]) -> Result<Self, SdkError> {
        if data.len() < 8 {
            return Err(SdkError::AccountDataTooShort {
                expected: 8,
                actual: data.len(),
            });
        }
        if data[..8] != TREE_CONFIG_DISCRIMINATOR {
            return Err(SdkError::InvalidDiscriminator);
        }
        // Later program versions append fields, read only the prefix.
        let mut rest = &data[8..];
        Ok(Self::deserialize(&mut rest)?)
    }

    /// Mints left before bubblegum refuses with `InsufficientMintCapacity`.
    pub fn remaining_capacity(&self) -> u64 {
        self.total_mint_capacity.saturating_sub(self.num_minted)
    }

    pub fn is_delegate(&self, signer: &Pubkey) -> bool {
        self.tree_creator == *signer || self.tree_delegate == *signer
    }
}

const ACCOUNT_TYPE_CONCURRENT_MERKLE_TREE: u8 = 1;
const HEADER_VERSION_V1: u8 = 0;
const NODE_SIZE: usize = 32;

/// Header of an SPL concurrent merkle tree account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrentMerkleTreeHeader {
    pub max_buffer_size: u32,
    pub max_depth: u32,
    pub authority: Pubkey,
    pub creation_slot: u64,
}

#[derive(BorshDeserialize)]
struct HeaderDataV1 {
    max_buffer_size: u32,
    max_depth: u32,
    authority: Pubkey,
    creation_slot: u64,
}

impl ConcurrentMerkleTreeHeader {
    pub fn deserialize_account(data: &[u8]) -> Result<Self, SdkError> {
        if data.len() < CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1 {
            return Err(SdkError::AccountDataTooShort {
                expected: CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1,
                actual: data.len(),
            });
        }
        if data[0] != ACCOUNT_TYPE_CONCURRENT_MERKLE_TREE {
            return Err(SdkError::UnsupportedTreeAccount(format!(
                "account type {}",
                data[0]
            )));
        }
        if data[1] != HEADER_VERSION_V1 {
            return Err(SdkError::UnsupportedTreeAccount(format!(
                "header version {}",
                data[1]
            )));
        }
        let mut rest = &data[2..];
        let header = HeaderDataV1::deserialize(&mut rest)?;
        Ok(Self {
            max_buffer_size: header.max_buffer_size,
            max_depth: header.max_depth,
            authority: header.authority,
            creation_slot: header.creation_slot,
        })
    }

    /// Number of leaves the tree can hold.
    pub fn capacity(&self) -> u64 {
        1u64.checked_shl(self.max_depth).unwrap_or(u64::MAX)
    }

    /// Byte offset of the rightmost leaf index inside the account.
    fn rightmost_index_offset(&self) -> usize {
        let depth = self.max_depth as usize;
        let change_log_size = NODE_SIZE + NODE_SIZE * depth + 8;
        CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1
            + 24
            + self.max_buffer_size as usize * change_log_size
            + NODE_SIZE * depth
            + NODE_SIZE
    }
}

/// Header plus the counters of a concurrent merkle tree account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MerkleTreeState {
    pub header: ConcurrentMerkleTreeHeader,
    pub sequence_number: u64,
    /// Index the next appended leaf receives.
    pub next_leaf_index: u32,
}

impl MerkleTreeState {
    pub fn deserialize_account(data: &[u8]) -> Result<Self, SdkError> {
        let header = ConcurrentMerkleTreeHeader::deserialize_account(data)?;
        let offset = header.rightmost_index_offset();
        if data.len() < offset + 4 {
            return Err(SdkError::AccountDataTooShort {
                expected: offset + 4,
                actual: data.len(),
            });
        }
        let mut sequence_number = [0u8; 8];
        sequence_number.copy_from_slice(
            &data[CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1..CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1 + 8],
        );
        let mut next_leaf_index = [0u8; 4];
        next_leaf_index.copy_from_slice(&data[offset..offset + 4]);
        Ok(Self {
            header,
            sequence_number: u64::from_le_bytes(sequence_number),
            next_leaf_index: u32::from_le_bytes(next_leaf_index),
        })
    }

    pub fn is_full(&self) -> bool {
        u64::from(self.next_leaf_index) >= self.header.capacity()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn tree_account(
        max_depth: u32,
        max_buffer_size: u32,
        authority: Pubkey,
        sequence_number: u64,
        next_leaf_index: u32,
    ) -> Vec<u8> {
        let header = ConcurrentMerkleTreeHeader {
            max_buffer_size,
            max_depth,
            authority,
            creation_slot: 11,
        };
        let mut data = vec![ACCOUNT_TYPE_CONCURRENT_MERKLE_TREE, HEADER_VERSION_V1];
        data.extend_from_slice(&max_buffer_size.to_le_bytes());
        data.extend_from_slice(&max_depth.to_le_bytes());
        data.extend_from_slice(authority.as_ref());
        data.extend_from_slice(&11u64.to_le_bytes());
        data.extend_from_slice(&[0u8; 6]);
        data.extend_from_slice(&sequence_number.to_le_bytes());
        let offset = header.rightmost_index_offset();
        data.resize(offset, 0);
        data.extend_from_slice(&next_leaf_index.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        data
    }

    #[test]
    fn test_tree_config_round_trip() {
        let config = TreeConfig {
            tree_creator: Pubkey::new_unique(),
            tree_delegate: Pubkey::new_unique(),
            total_mint_capacity: 8,
            num_minted: 3,
            is_public: false,
        };
        let mut data = TREE_CONFIG_DISCRIMINATOR.to_vec();
        config.serialize(&mut data).unwrap();
        // is_decompressible
        data.push(1);

        let decoded = TreeConfig::deserialize_account(&data).unwrap();
        assert_eq!(decoded, config);
        assert_eq!(decoded.remaining_capacity(), 5);
        assert!(decoded.is_delegate(&config.tree_delegate));
        assert!(decoded.is_delegate(&config.tree_creator));
        assert!(!decoded.is_delegate(&Pubkey::new_unique()));
    }

    #[test]
    fn test_tree_config_rejects_bad_data() {
        assert_eq!(
            TreeConfig::deserialize_account(&[1, 2]),
            Err(SdkError::AccountDataTooShort {
                expected: 8,
                actual: 2
            })
        );
        assert_eq!(
            TreeConfig::deserialize_account(&[0u8; 100]),
            Err(SdkError::InvalidDiscriminator)
        );
        assert!(matches!(
            TreeConfig::deserialize_account(&TREE_CONFIG_DISCRIMINATOR),
            Err(SdkError::Borsh(_))
        ));
    }

    #[test]
    fn test_merkle_tree_state() {
        let authority = Pubkey::new_unique();
        let data = tree_account(3, 8, authority, 6, 5);
        let state = MerkleTreeState::deserialize_account(&data).unwrap();
        assert_eq!(state.header.max_depth, 3);
        assert_eq!(state.header.max_buffer_size, 8);
        assert_eq!(state.header.authority, authority);
        assert_eq!(state.header.creation_slot, 11);
        assert_eq!(state.header.capacity(), 8);
        assert_eq!(state.sequence_number, 6);
        assert_eq!(state.next_leaf_index, 5);
        assert!(!state.is_full());

        let full = tree_account(3, 8, authority, 8, 8);
        assert!(MerkleTreeState::deserialize_account(&full).unwrap().is_full());
    }

    #[test]
    fn test_merkle_tree_state_rejects_bad_data() {
        let mut data = tree_account(3, 8, Pubkey::new_unique(), 0, 0);
        assert!(matches!(
            MerkleTreeState::deserialize_account(&data[..data.len() - 8]),
            Err(SdkError::AccountDataTooShort { .. })
        ));
        data[0] = 0;
        assert!(matches!(
            MerkleTreeState::deserialize_account(&data),
            Err(SdkError::UnsupportedTreeAccount(_))
        ));
    }
}
