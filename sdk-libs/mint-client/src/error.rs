use cnft_client::{indexer::IndexerError, rpc::RpcError};
use cnft_sdk::{
    constants::{PROGRAM_ID_ACCOUNT_COMPRESSION, PROGRAM_ID_BUBBLEGUM},
    BubblegumError, SdkError,
};
use solana_sdk::{
    instruction::InstructionError, signature::Signature, transaction::TransactionError,
};
use thiserror::Error;

use crate::attempt::InvalidTransition;

/// Why the ledger refused a mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    TreeFull,
    InsufficientMintCapacity,
    CollectionNotVerified,
    CollectionMismatch,
    SignerMismatch,
    MetadataRejected,
    Other,
}

#[derive(Error, Debug)]
pub enum MintError {
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(SdkError),

    #[error("Malformed address for {field}: {reason}")]
    MalformedAddress { field: String, reason: String },

    #[error("Transient query error: {0}")]
    TransientQueryError(String),

    #[error("Program rejected the mint ({kind:?}): {reason}")]
    ProgramRejected {
        kind: RejectionKind,
        reason: String,
        /// Custom program error code, when the failure carried one.
        code: Option<u32>,
        logs: Vec<String>,
    },

    /// No confirmation within the budget. The transaction may still land.
    #[error("Transaction {signature} not confirmed in time")]
    SubmissionTimeout { signature: Signature },

    #[error("Tree sequence conflict: {reason}")]
    SequenceConflict {
        signature: Option<Signature>,
        reason: String,
    },

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

impl MintError {
    pub fn malformed_address(field: &str, reason: impl ToString) -> Self {
        Self::MalformedAddress {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Worth retrying as-is (transient) or after a rebuild (sequence conflict).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MintError::TransientQueryError(_) | MintError::SequenceConflict { .. }
        )
    }

    /// The outcome on the ledger is unknown; re-query before minting again.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, MintError::SubmissionTimeout { .. })
    }

    /// Maps a failed transaction to a mint error.
    ///
    /// The innermost failing program in `logs` decides how a custom error
    /// code is read, since bubblegum and account compression both number
    /// their errors from 6000.
    pub fn from_transaction_error(
        error: &TransactionError,
        logs: &[String],
        signature: Option<Signature>,
    ) -> Self {
        if matches!(error, TransactionError::BlockhashNotFound) {
            return MintError::TransientQueryError(format!("{}", error));
        }
        let code = match error {
            TransactionError::InstructionError(_, InstructionError::Custom(code)) => Some(*code),
            _ => None,
        };

        if logs_mention(logs, TREE_FULL_LOGS) {
            return Self::rejected(RejectionKind::TreeFull, error.to_string(), code, logs);
        }

        let failing = failing_program(logs);
        if failing == Some(PROGRAM_ID_ACCOUNT_COMPRESSION.to_string()) {
            if logs_mention(logs, SEQUENCE_CONFLICT_LOGS) {
                return MintError::SequenceConflict {
                    signature,
                    reason: error.to_string(),
                };
            }
            return Self::rejected(RejectionKind::Other, error.to_string(), code, logs);
        }

        // Without logs the outermost program, bubblegum, is assumed.
        let bubblegum_failed = failing
            .map(|program| program == PROGRAM_ID_BUBBLEGUM.to_string())
            .unwrap_or(true);
        match code.and_then(BubblegumError::from_code) {
            Some(bubblegum_error) if bubblegum_failed => Self::rejected(
                rejection_kind(bubblegum_error),
                format!("{}: {}", error, bubblegum_error),
                code,
                logs,
            ),
            _ => Self::rejected(RejectionKind::Other, error.to_string(), code, logs),
        }
    }

    fn rejected(kind: RejectionKind, reason: String, code: Option<u32>, logs: &[String]) -> Self {
        MintError::ProgramRejected {
            kind,
            reason,
            code,
            logs: logs.to_vec(),
        }
    }
}

// Lowercase. Account compression reports every tree failure under the
// generic `ConcurrentMerkleTreeError` code, so only the message tells them apart.
const TREE_FULL_LOGS: &[&str] = &["tree is full"];
const SEQUENCE_CONFLICT_LOGS: &[&str] = &[
    "invalidproof",
    "invalid root recomputed",
    "leafcontentsmodified",
    "does not match the supplied proof",
];

fn rejection_kind(error: BubblegumError) -> RejectionKind {
    use BubblegumError::*;
    match error {
        InsufficientMintCapacity => RejectionKind::InsufficientMintCapacity,
        CollectionNotFound | CollectionMustBeSized | CollectionCannotBeVerifiedInThisInstruction => {
            RejectionKind::CollectionNotVerified
        }
        MetadataMintMismatch | AlreadyVerified | AlreadyUnverified => {
            RejectionKind::CollectionMismatch
        }
        TreeAuthorityIncorrect
        | InvalidCollectionAuthority
        | InvalidDelegateRecord
        | UpdateAuthorityIncorrect
        | LeafAuthorityMustSign
        | PublicKeyMismatch
        | IncorrectOwner => RejectionKind::SignerMismatch,
        CreatorShareTotalMustBe100
        | DuplicateCreatorAddress
        | CreatorDidNotVerify
        | CreatorNotFound
        | NoCreatorsPresent
        | CreatorHashMismatch
        | DataHashMismatch
        | CreatorsTooLong
        | MetadataNameTooLong
        | MetadataSymbolTooLong
        | MetadataUriTooLong
        | MetadataBasisPointsTooHigh => RejectionKind::MetadataRejected,
        _ => RejectionKind::Other,
    }
}

/// Program id of the first `Program <id> failed` line, i.e. the innermost
/// program that returned the error.
fn failing_program(logs: &[String]) -> Option<String> {
    logs.iter().find_map(|line| {
        let rest = line.strip_prefix("Program ")?;
        let (program, tail) = rest.split_once(' ')?;
        tail.starts_with("failed").then(|| program.to_string())
    })
}

fn logs_mention(logs: &[String], needles: &[&str]) -> bool {
    logs.iter().any(|line| {
        let line = line.to_lowercase();
        needles.iter().any(|needle| line.contains(needle))
    })
}

impl From<RpcError> for MintError {
    fn from(error: RpcError) -> Self {
        match error.transaction_error() {
            Some(transaction_error) => {
                MintError::from_transaction_error(transaction_error, error.logs(), None)
            }
            None => MintError::TransientQueryError(error.to_string()),
        }
    }
}

impl From<IndexerError> for MintError {
    fn from(error: IndexerError) -> Self {
        MintError::TransientQueryError(error.to_string())
    }
}
