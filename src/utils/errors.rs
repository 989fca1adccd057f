use thiserror::Error;

/// Failure taxonomy for the client core.
///
/// Every expected failure mode is captured in one of these variants and
/// surfaced through `Result` values or retained state; nothing in the
/// crate panics for an expected failure. Variants carry owned strings so
/// states that hold an error stay cheaply cloneable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure with no usable response. Retryable only by an
    /// explicit user action; the core never retries on its own.
    #[error("network error: {0}")]
    Network(String),

    /// Credentials or role were rejected by the backend. The message is
    /// the backend-supplied reason when one was given.
    #[error("{0}")]
    AuthRejected(String),

    /// An authenticated call was answered with 401/403. Drives a forced,
    /// idempotent transition to the unauthenticated state.
    #[error("session expired")]
    SessionExpired,

    /// The caller passed malformed input. Rejected before any network
    /// call is issued.
    #[error("{0}")]
    Validation(String),

    /// The response body did not match the expected shape. The original
    /// payload is never partially applied.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The persistent key-value store failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn network<E: std::fmt::Display>(err: E) -> Self {
        Self::Network(err.to_string())
    }

    pub fn malformed<E: std::fmt::Display>(err: E) -> Self {
        Self::MalformedResponse(err.to_string())
    }

    pub fn storage<E: std::fmt::Display>(err: E) -> Self {
        Self::Storage(err.to_string())
    }
}
