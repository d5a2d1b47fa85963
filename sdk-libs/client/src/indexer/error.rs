use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexerError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Transport failure or server error, worth retrying.
    #[error("Transient indexer error: {0}")]
    Transient(String),

    /// JSON-RPC error object returned by the indexer.
    #[error("API error (code: {code}): {message}")]
    ApiError { code: i64, message: String },

    #[error("Invalid response data: {0}")]
    InvalidResponseData(String),

    #[error("Base58 decode error: {field} - {message}")]
    Base58Decode { field: String, message: String },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl IndexerError {
    pub fn base58_decode_error(field: &str, message: &str) -> Self {
        Self::Base58Decode {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::ApiError { .. })
    }
}

impl From<reqwest::Error> for IndexerError {
    fn from(err: reqwest::Error) -> Self {
        IndexerError::Transient(err.to_string())
    }
}

impl From<serde_json::Error> for IndexerError {
    fn from(err: serde_json::Error) -> Self {
        IndexerError::InvalidResponseData(err.to_string())
    }
}
