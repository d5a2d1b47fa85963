use std::io;

use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    rpc_request::{RpcError as RpcRequestError, RpcResponseErrorData},
};
use solana_sdk::transaction::TransactionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("TransactionError: {0}")]
    TransactionError(#[from] Box<TransactionError>),

    /// The node simulated the transaction and it failed.
    #[error("Transaction failed: {error}")]
    TransactionFailed {
        error: TransactionError,
        logs: Vec<String>,
    },

    #[error("ClientError: {0}")]
    ClientError(#[from] Box<ClientError>),

    #[error("IoError: {0}")]
    IoError(#[from] Box<io::Error>),

    #[error("Error: `{0}`")]
    CustomError(String),
}

impl From<TransactionError> for RpcError {
    fn from(err: TransactionError) -> Self {
        RpcError::TransactionError(Box::new(err))
    }
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        match err.kind() {
            ClientErrorKind::RpcError(RpcRequestError::RpcResponseError {
                data: RpcResponseErrorData::SendTransactionPreflightFailure(result),
                ..
            }) => {
                if let Some(error) = result.err.clone() {
                    return RpcError::TransactionFailed {
                        error,
                        logs: result.logs.clone().unwrap_or_default(),
                    };
                }
            }
            ClientErrorKind::TransactionError(error) => {
                return RpcError::TransactionError(Box::new(error.clone()));
            }
            _ => {}
        }
        RpcError::ClientError(Box::new(err))
    }
}

impl From<io::Error> for RpcError {
    fn from(err: io::Error) -> Self {
        RpcError::IoError(Box::new(err))
    }
}

impl RpcError {
    /// Transport faults that may succeed when repeated.
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::IoError(_) => true,
            RpcError::ClientError(err) => matches!(
                err.kind(),
                ClientErrorKind::Io(_)
                    | ClientErrorKind::Reqwest(_)
                    | ClientErrorKind::RpcError(RpcRequestError::RpcRequestError(_))
            ),
            _ => false,
        }
    }

    /// Ledger-level error of the transaction, if this is one.
    pub fn transaction_error(&self) -> Option<&TransactionError> {
        match self {
            RpcError::TransactionError(error) => Some(error.as_ref()),
            RpcError::TransactionFailed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn logs(&self) -> &[String] {
        match self {
            RpcError::TransactionFailed { logs, .. } => logs,
            _ => &[],
        }
    }
}
