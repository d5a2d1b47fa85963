//! Builds, signs, submits and confirms bubblegum `mint_to_collection_v1`
//! transactions against a [`cnft_client::CompressionClient`].

pub mod actions;
pub mod addresses;
pub mod attempt;
pub mod confirmation;
pub mod error;
pub mod send_transaction;

pub use actions::{MintOutcome, MintToCollection};
pub use addresses::{parse_pubkey, CollectionRef, TreeRef};
pub use attempt::{InvalidTransition, MintAttempt, MintState};
pub use confirmation::ConfirmationConfig;
pub use error::{MintError, RejectionKind};
