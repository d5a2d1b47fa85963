/// Custom error codes returned by the bubblegum program.
///
/// Anchor numbers them from 6000 in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum BubblegumError {
    AssetOwnerMismatch = 6000,
    PublicKeyMismatch,
    HashingMismatch,
    UnsupportedSchemaVersion,
    CreatorShareTotalMustBe100,
    DuplicateCreatorAddress,
    CreatorDidNotVerify,
    CreatorNotFound,
    NoCreatorsPresent,
    CreatorHashMismatch,
    DataHashMismatch,
    CreatorsTooLong,
    MetadataNameTooLong,
    MetadataSymbolTooLong,
    MetadataUriTooLong,
    MetadataBasisPointsTooHigh,
    TreeAuthorityIncorrect,
    InsufficientMintCapacity,
    NumericalOverflowError,
    IncorrectOwner,
    CollectionCannotBeVerifiedInThisInstruction,
    CollectionNotFound,
    AlreadyVerified,
    AlreadyUnverified,
    UpdateAuthorityIncorrect,
    LeafAuthorityMustSign,
    CollectionMustBeSized,
    MetadataMintMismatch,
    InvalidCollectionAuthority,
    InvalidDelegateRecord,
}

const ALL: [BubblegumError; 30] = [
    BubblegumError::AssetOwnerMismatch,
    BubblegumError::PublicKeyMismatch,
    BubblegumError::HashingMismatch,
    BubblegumError::UnsupportedSchemaVersion,
    BubblegumError::CreatorShareTotalMustBe100,
    BubblegumError::DuplicateCreatorAddress,
    BubblegumError::CreatorDidNotVerify,
    BubblegumError::CreatorNotFound,
    BubblegumError::NoCreatorsPresent,
    BubblegumError::CreatorHashMismatch,
    BubblegumError::DataHashMismatch,
    BubblegumError::CreatorsTooLong,
    BubblegumError::MetadataNameTooLong,
    BubblegumError::MetadataSymbolTooLong,
    BubblegumError::MetadataUriTooLong,
    BubblegumError::MetadataBasisPointsTooHigh,
    BubblegumError::TreeAuthorityIncorrect,
    BubblegumError::InsufficientMintCapacity,
    BubblegumError::NumericalOverflowError,
    BubblegumError::IncorrectOwner,
    BubblegumError::CollectionCannotBeVerifiedInThisInstruction,
    BubblegumError::CollectionNotFound,
    BubblegumError::AlreadyVerified,
    BubblegumError::AlreadyUnverified,
    BubblegumError::UpdateAuthorityIncorrect,
    BubblegumError::LeafAuthorityMustSign,
    BubblegumError::CollectionMustBeSized,
    BubblegumError::MetadataMintMismatch,
    BubblegumError::InvalidCollectionAuthority,
    BubblegumError::InvalidDelegateRecord,
];

impl BubblegumError {
    pub fn from_code(code: u32) -> Option<Self> {
        ALL.iter().copied().find(|e| *e as u32 == code)
    }

    pub fn code(&self) -> u32 {
        *self as u32
    }
}

impl std::fmt::Display for BubblegumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}
