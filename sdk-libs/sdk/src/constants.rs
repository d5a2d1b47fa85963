use solana_program::{pubkey, pubkey::Pubkey};

/// ID of the bubblegum program.
pub const PROGRAM_ID_BUBBLEGUM: Pubkey = pubkey!("BGUMAp9Gq7iTEuizy4pqaxsTyUCBK68MDfK752saRPUY");
/// ID of the SPL account-compression program.
pub const PROGRAM_ID_ACCOUNT_COMPRESSION: Pubkey =
    pubkey!("cmtDvXumGCrqC1Age74AVPhSRVXJMd8PJS91L8KbNCK");
/// ID of the SPL noop program used as log wrapper.
pub const PROGRAM_ID_NOOP: Pubkey = pubkey!("noopb9bkMVfRPU8AsbpTUg8AQkHtKwMYZiFUjNRtMmV");
/// ID of the token-metadata program.
pub const PROGRAM_ID_TOKEN_METADATA: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
pub const PROGRAM_ID_SYSTEM: Pubkey = pubkey!("11111111111111111111111111111111");

pub const ASSET_PREFIX: &[u8] = b"asset";
pub const COLLECTION_CPI_PREFIX: &[u8] = b"collection_cpi";
pub const METADATA_PREFIX: &[u8] = b"metadata";
pub const EDITION_SUFFIX: &[u8] = b"edition";

pub const MINT_TO_COLLECTION_V1_DISCRIMINATOR: [u8; 8] = [153, 18, 178, 47, 197, 158, 86, 15];
pub const TREE_CONFIG_DISCRIMINATOR: [u8; 8] = [122, 245, 175, 248, 171, 34, 0, 207];

// Token-metadata limits, mirrored by bubblegum.
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;
pub const MAX_CREATOR_LIMIT: usize = 5;
pub const MAX_SELLER_FEE_BASIS_POINTS: u16 = 10_000;
pub const CREATOR_SHARE_TOTAL: u32 = 100;

/// Size of the SPL concurrent merkle tree header (account type, version and v1 data).
pub const CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1: usize = 2 + 54;
