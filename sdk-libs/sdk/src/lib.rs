//! Account layouts, address derivations and instruction builders for minting
//! compressed NFTs with the bubblegum program.
//!
//! Everything in this crate is pure: no network access and no signing.

pub mod constants;
pub use constants::*;
pub mod error;
pub mod event;
pub mod instruction;
pub mod leaf_schema;
pub mod merkle;
pub mod metadata;
pub mod pda;
pub mod program_error;
pub mod state;

pub use error::SdkError;
pub use instruction::{create_mint_to_collection_v1_instruction, MintToCollectionV1Accounts};
pub use leaf_schema::LeafSchema;
pub use metadata::{Collection, Creator, MetadataArgs, TokenProgramVersion, TokenStandard};
pub use program_error::BubblegumError;
pub use state::{ConcurrentMerkleTreeHeader, MerkleTreeState, TreeConfig};
