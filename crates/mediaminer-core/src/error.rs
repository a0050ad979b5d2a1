use thiserror::Error;

/// Coarse classification of a [`MinerError`], used when reporting a failed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The knowledge base answered, but with nothing usable.
    NotFound,
    /// Transport or protocol failure, including cancellation.
    Service,
    /// The guessed identity could not be turned into a query.
    MalformedIdentity,
    /// The output sink rejected the update batch.
    Sink,
    /// Anything that points at a bug rather than an external condition.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotFound => "not-found",
            Self::Service => "service",
            Self::MalformedIdentity => "malformed-identity",
            Self::Sink => "sink",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while resolving and extracting metadata for a file.
#[derive(Debug, Error)]
pub enum MinerError {
    /// A well-formed answer with no usable match.
    #[error("not found: {reason}")]
    NotFound {
        /// Why the answer was rejected.
        reason: String,
    },

    /// The knowledge-base service failed.
    #[error("{operation} failed: {message}")]
    Service {
        /// What was being attempted, including the identifier involved.
        operation: String,
        /// The underlying transport or protocol message.
        message: String,
    },

    /// The in-flight call was cancelled by the host.
    #[error("{operation} cancelled")]
    Cancelled {
        /// What was being attempted.
        operation: String,
    },

    /// The guessed identity cannot be expressed as a query.
    #[error("malformed identity: {0}")]
    MalformedIdentity(String),

    /// The output sink refused the update.
    #[error("output sink error: {0}")]
    Sink(String),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),
}

impl MinerError {
    /// Shorthand for [`MinerError::NotFound`].
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    /// Returns the coarse kind used for failure reporting.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Service { .. } | Self::Cancelled { .. } => ErrorKind::Service,
            Self::MalformedIdentity(_) => ErrorKind::MalformedIdentity,
            Self::Sink(_) => ErrorKind::Sink,
            Self::RegexError(_) => ErrorKind::Internal,
        }
    }

    /// Returns `true` if the failure came from a host cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Result type alias for mediaminer operations.
pub type Result<T> = std::result::Result<T, MinerError>;
