use std::collections::HashSet;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{keccak, pubkey::Pubkey};

use crate::{
    constants::{
        CREATOR_SHARE_TOTAL, MAX_CREATOR_LIMIT, MAX_NAME_LENGTH, MAX_SELLER_FEE_BASIS_POINTS,
        MAX_SYMBOL_LENGTH, MAX_URI_LENGTH,
    },
    error::SdkError,
};

#[derive(BorshSerialize, BorshDeserialize, PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum TokenProgramVersion {
    #[default]
    Original,
    Token2022,
}

#[derive(BorshSerialize, BorshDeserialize, PartialEq, Eq, Debug, Clone)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    /// In percentages, not basis points.
    pub share: u8,
}

impl Creator {
    pub fn new(address: Pubkey, share: u8) -> Self {
        Self {
            address,
            verified: false,
            share,
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum TokenStandard {
    NonFungible,
    FungibleAsset,
    Fungible,
    NonFungibleEdition,
}

#[derive(BorshSerialize, BorshDeserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum UseMethod {
    Burn,
    Multiple,
    Single,
}

#[derive(BorshSerialize, BorshDeserialize, PartialEq, Eq, Debug, Clone)]
pub struct Uses {
    pub use_method: UseMethod,
    pub remaining: u64,
    pub total: u64,
}

#[derive(BorshSerialize, BorshDeserialize, PartialEq, Eq, Debug, Clone)]
pub struct Collection {
    pub verified: bool,
    pub key: Pubkey,
}

/// Metadata of a compressed asset, serialized with the bubblegum layout.
#[derive(BorshSerialize, BorshDeserialize, PartialEq, Eq, Debug, Clone)]
pub struct MetadataArgs {
    /// The name of the asset
    pub name: String,
    /// The symbol for the asset
    pub symbol: String,
    /// URI pointing to JSON representing the asset
    pub uri: String,
    /// Royalty basis points that goes to creators in secondary sales (0-10000)
    pub seller_fee_basis_points: u16,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
    /// nonce for easy calculation of editions, if present
    pub edition_nonce: Option<u8>,
    pub token_standard: Option<TokenStandard>,
    pub collection: Option<Collection>,
    pub uses: Option<Uses>,
    pub token_program_version: TokenProgramVersion,
    pub creators: Vec<Creator>,
}

impl Default for MetadataArgs {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            uri: String::new(),
            seller_fee_basis_points: 0,
            primary_sale_happened: false,
            is_mutable: true,
            edition_nonce: Some(0),
            token_standard: Some(TokenStandard::NonFungible),
            collection: None,
            uses: None,
            token_program_version: TokenProgramVersion::Original,
            creators: Vec::new(),
        }
    }
}

impl MetadataArgs {
    /// Checks the record against the limits the bubblegum program enforces
    /// on mint, so that an invalid record never reaches the network.
    ///
    /// `signers` are the keys that will sign the mint transaction; a creator
    /// may only be marked verified if it is one of them.
    pub fn validate(&self, signers: &[Pubkey]) -> Result<(), SdkError> {
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(SdkError::MetadataNameTooLong(self.name.len()));
        }
        if self.symbol.len() > MAX_SYMBOL_LENGTH {
            return Err(SdkError::MetadataSymbolTooLong(self.symbol.len()));
        }
        if self.uri.len() > MAX_URI_LENGTH {
            return Err(SdkError::MetadataUriTooLong(self.uri.len()));
        }
        if self.seller_fee_basis_points > MAX_SELLER_FEE_BASIS_POINTS {
            return Err(SdkError::MetadataBasisPointsTooHigh(
                self.seller_fee_basis_points,
            ));
        }
        if self.token_standard != Some(TokenStandard::NonFungible) {
            return Err(SdkError::TokenStandardNotSupported);
        }
        self.validate_creators(signers)
    }

    fn validate_creators(&self, signers: &[Pubkey]) -> Result<(), SdkError> {
        if self.creators.is_empty() {
            return Ok(());
        }
        if self.creators.len() > MAX_CREATOR_LIMIT {
            return Err(SdkError::CreatorsTooLong(self.creators.len()));
        }

        let mut seen = HashSet::with_capacity(self.creators.len());
        let mut total: u32 = 0;
        for creator in self.creators.iter() {
            if !seen.insert(creator.address) {
                return Err(SdkError::DuplicateCreatorAddress(creator.address));
            }
            if creator.verified && !signers.contains(&creator.address) {
                return Err(SdkError::UnsignedVerifiedCreator(creator.address));
            }
            total += u32::from(creator.share);
        }
        if total != CREATOR_SHARE_TOTAL {
            return Err(SdkError::CreatorShareTotalMustBe100(total));
        }
        Ok(())
    }

    /// Points the record at `collection_mint`, as `mint_to_collection_v1`
    /// requires. The program flips `verified` itself.
    pub fn with_collection(mut self, collection_mint: &Pubkey) -> Result<Self, SdkError> {
        match &self.collection {
            None => {
                self.collection = Some(Collection {
                    verified: false,
                    key: *collection_mint,
                });
                Ok(self)
            }
            Some(collection) if collection.key != *collection_mint => {
                Err(SdkError::CollectionMismatch {
                    expected: *collection_mint,
                    found: collection.key,
                })
            }
            Some(collection) if collection.verified => Err(SdkError::CollectionAlreadyVerified),
            Some(_) => Ok(self),
        }
    }

    pub fn hash_creators(&self) -> [u8; 32] {
        let creator_data = self
            .creators
            .iter()
            .map(|c| [c.address.as_ref(), &[c.verified as u8], &[c.share]].concat())
            .collect::<Vec<_>>();

        keccak::hashv(
            creator_data
                .iter()
                .map(|c| c.as_slice())
                .collect::<Vec<&[u8]>>()
                .as_ref(),
        )
        .to_bytes()
    }

    /// The seller fee is hashed a second time next to the serialized record
    /// so marketplaces can read it without the full metadata.
    pub fn hash_metadata(&self) -> Result<[u8; 32], SdkError> {
        let metadata_args_hash = keccak::hashv(&[self.try_to_vec()?.as_slice()]);
        Ok(keccak::hashv(&[
            &metadata_args_hash.to_bytes(),
            &self.seller_fee_basis_points.to_le_bytes(),
        ])
        .to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_with_shares(shares: &[u8]) -> MetadataArgs {
        MetadataArgs {
            name: "NFT Send Game".to_string(),
            symbol: "SSNC".to_string(),
            uri: "https://example.com/board.json".to_string(),
            seller_fee_basis_points: 100,
            creators: shares
                .iter()
                .map(|share| Creator::new(Pubkey::new_unique(), *share))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_shares_summing_to_100() {
        for shares in [
            vec![100],
            vec![99, 1],
            vec![50, 50],
            vec![20, 20, 20, 20, 20],
            vec![0, 100],
        ] {
            assert_eq!(metadata_with_shares(&shares).validate(&[]), Ok(()));
        }
    }

    #[test]
    fn test_validate_rejects_share_total() {
        for (shares, total) in [
            (vec![99, 2], 101),
            (vec![99], 99),
            (vec![0], 0),
            (vec![255, 101], 356),
        ] {
            assert_eq!(
                metadata_with_shares(&shares).validate(&[]),
                Err(SdkError::CreatorShareTotalMustBe100(total))
            );
        }
    }

    #[test]
    fn test_validate_share_sum_does_not_wrap() {
        // 200 + 156 wraps to 100 in u8 arithmetic.
        assert_eq!(
            metadata_with_shares(&[200, 156]).validate(&[]),
            Err(SdkError::CreatorShareTotalMustBe100(356))
        );
    }

    #[test]
    fn test_validate_without_creators() {
        assert_eq!(metadata_with_shares(&[]).validate(&[]), Ok(()));
    }

    #[test]
    fn test_validate_limits() {
        let mut metadata = metadata_with_shares(&[100]);
        metadata.name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert_eq!(
            metadata.validate(&[]),
            Err(SdkError::MetadataNameTooLong(MAX_NAME_LENGTH + 1))
        );

        let mut metadata = metadata_with_shares(&[100]);
        metadata.symbol = "x".repeat(MAX_SYMBOL_LENGTH + 1);
        assert!(matches!(
            metadata.validate(&[]),
            Err(SdkError::MetadataSymbolTooLong(_))
        ));

        let mut metadata = metadata_with_shares(&[100]);
        metadata.uri = "x".repeat(MAX_URI_LENGTH + 1);
        assert!(matches!(
            metadata.validate(&[]),
            Err(SdkError::MetadataUriTooLong(_))
        ));

        let mut metadata = metadata_with_shares(&[100]);
        metadata.seller_fee_basis_points = 10_001;
        assert_eq!(
            metadata.validate(&[]),
            Err(SdkError::MetadataBasisPointsTooHigh(10_001))
        );

        let metadata = metadata_with_shares(&[20, 20, 20, 20, 10, 10]);
        assert_eq!(metadata.validate(&[]), Err(SdkError::CreatorsTooLong(6)));

        let mut metadata = metadata_with_shares(&[100]);
        metadata.token_standard = Some(TokenStandard::Fungible);
        assert_eq!(
            metadata.validate(&[]),
            Err(SdkError::TokenStandardNotSupported)
        );
    }

    #[test]
    fn test_validate_duplicate_creator() {
        let mut metadata = metadata_with_shares(&[50, 50]);
        let address = metadata.creators[0].address;
        metadata.creators[1].address = address;
        assert_eq!(
            metadata.validate(&[]),
            Err(SdkError::DuplicateCreatorAddress(address))
        );
    }

    #[test]
    fn test_validate_verified_creator_must_sign() {
        let mut metadata = metadata_with_shares(&[99, 1]);
        metadata.creators[0].verified = true;
        let creator = metadata.creators[0].address;
        assert_eq!(
            metadata.validate(&[]),
            Err(SdkError::UnsignedVerifiedCreator(creator))
        );
        assert_eq!(metadata.validate(&[creator]), Ok(()));
    }

    #[test]
    fn test_with_collection() {
        let collection_mint = Pubkey::new_unique();
        let metadata = metadata_with_shares(&[100])
            .with_collection(&collection_mint)
            .unwrap();
        assert_eq!(
            metadata.collection,
            Some(Collection {
                verified: false,
                key: collection_mint
            })
        );
        // Idempotent for the same collection.
        assert!(metadata.clone().with_collection(&collection_mint).is_ok());

        let other = Pubkey::new_unique();
        assert_eq!(
            metadata.with_collection(&other),
            Err(SdkError::CollectionMismatch {
                expected: other,
                found: collection_mint
            })
        );
    }

    #[test]
    fn test_borsh_layout_field_order() {
        let metadata = MetadataArgs {
            name: "a".to_string(),
            symbol: "b".to_string(),
            uri: "c".to_string(),
            seller_fee_basis_points: 0x0201,
            primary_sale_happened: false,
            is_mutable: true,
            edition_nonce: None,
            token_standard: Some(TokenStandard::NonFungible),
            collection: None,
            uses: None,
            token_program_version: TokenProgramVersion::Original,
            creators: vec![],
        };
        let bytes = metadata.try_to_vec().unwrap();
        let expected: Vec<u8> = [
            &[1, 0, 0, 0, b'a'][..],
            &[1, 0, 0, 0, b'b'],
            &[1, 0, 0, 0, b'c'],
            &[0x01, 0x02],
            &[0],    // primary_sale_happened
            &[1],    // is_mutable
            &[0],    // edition_nonce: None
            &[1, 0], // token_standard: Some(NonFungible)
            &[0],    // collection: None
            &[0],    // uses: None
            &[0],    // token_program_version: Original
            &[0, 0, 0, 0],
        ]
        .concat();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_hash_creators_matches_manual_concat() {
        let metadata = metadata_with_shares(&[99, 1]);
        let a = &metadata.creators[0];
        let b = &metadata.creators[1];
        let expected = keccak::hashv(&[
            &[a.address.as_ref(), &[0], &[99]].concat(),
            &[b.address.as_ref(), &[0], &[1]].concat(),
        ])
        .to_bytes();
        assert_eq!(metadata.hash_creators(), expected);
    }

    #[test]
    fn test_hash_metadata_depends_on_fee() {
        let metadata = metadata_with_shares(&[100]);
        let mut other = metadata.clone();
        other.seller_fee_basis_points = 101;
        assert_ne!(
            metadata.hash_metadata().unwrap(),
            other.hash_metadata().unwrap()
        );
        assert_eq!(
            metadata.hash_metadata().unwrap(),
            metadata.clone().hash_metadata().unwrap()
        );
    }
}
