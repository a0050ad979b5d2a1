use mediaminer_core::MinerError;
use thiserror::Error;

/// Errors raised by a [`KnowledgeBase`](crate::KnowledgeBase) implementation.
#[derive(Debug, Error)]
pub enum KbError {
    /// The HTTP transport failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status and no error payload.
    #[error("unexpected HTTP status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The service answered with an error payload.
    #[error("API error {code}: {message}")]
    Api {
        /// Error code reported by the service.
        code: u16,
        /// Error message reported by the service.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The call was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl KbError {
    /// Converts into the pipeline error taxonomy, tagging it with the operation.
    pub fn into_miner(self, operation: impl Into<String>) -> MinerError {
        let operation = operation.into();
        match self {
            Self::Cancelled => MinerError::Cancelled { operation },
            other => MinerError::Service {
                operation,
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for knowledge-base calls.
pub type Result<T> = std::result::Result<T, KbError>;
