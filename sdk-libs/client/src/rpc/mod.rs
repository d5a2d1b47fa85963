#![allow(clippy::result_large_err)]

pub mod errors;
pub mod merkle_tree;
pub mod rpc_connection;
pub mod solana_rpc;

pub use errors::RpcError;
pub use merkle_tree::{TreeAccountsExt, TreeAccountsExtError};
pub use rpc_connection::{RpcConnection, RpcConnectionConfig, TransactionMeta};
pub use solana_rpc::{RetryConfig, SolanaRpcConnection};
