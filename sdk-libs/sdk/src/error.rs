use solana_program::pubkey::Pubkey;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SdkError {
    #[error("Name in metadata is too long: {0} bytes")]
    MetadataNameTooLong(usize),
    #[error("Symbol in metadata is too long: {0} bytes")]
    MetadataSymbolTooLong(usize),
    #[error("Uri in metadata is too long: {0} bytes")]
    MetadataUriTooLong(usize),
    #[error("Basis points in metadata cannot exceed 10000, got {0}")]
    MetadataBasisPointsTooHigh(u16),
    #[error("Creators list too long: {0}")]
    CreatorsTooLong(usize),
    #[error("Duplicate creator address in metadata: {0}")]
    DuplicateCreatorAddress(Pubkey),
    #[error("Creator shares must sum to 100, got {0}")]
    CreatorShareTotalMustBe100(u32),
    #[error("Verified creator {0} is not a signer of the mint")]
    UnsignedVerifiedCreator(Pubkey),
    #[error("Token standard not supported, compressed assets must be NonFungible")]
    TokenStandardNotSupported,
    #[error("Collection {found} in metadata does not match collection mint {expected}")]
    CollectionMismatch { expected: Pubkey, found: Pubkey },
    #[error("Collection in metadata must not be pre-verified")]
    CollectionAlreadyVerified,
    #[error("Account data too short: expected at least {expected} bytes, got {actual}")]
    AccountDataTooShort { expected: usize, actual: usize },
    #[error("Account discriminator mismatch")]
    InvalidDiscriminator,
    #[error("Unsupported merkle tree account: {0}")]
    UnsupportedTreeAccount(String),
    #[error("Borsh error: {0}")]
    Borsh(String),
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Borsh(err.to_string())
    }
}
