//! Error types for the reliefmatch allocation engine.
//!
//! All errors use the `RM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: validation errors
//! - 3xx: matching errors
//! - 5xx: audit / storage errors
//!
//! Quantity-mutator precondition failures and rejected shipment transitions
//! are deliberately *not* errors: those operations report `false` and leave
//! state unchanged.

use thiserror::Error;

/// Central error enum for all reliefmatch operations.
#[derive(Debug, Error)]
pub enum ReliefError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// A constructor or scoring input failed validation (empty required
    /// string, non-positive quantity, etc.). Surfaced to the caller.
    #[error("RM_ERR_100: Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // =================================================================
    // Matching Errors (3xx)
    // =================================================================
    /// An unexpected failure during a matching pass. By the time this is
    /// returned, every recorded quantity change has been rolled back.
    #[error("RM_ERR_300: Matching aborted: {reason}")]
    MatchingAborted { reason: String },

    // =================================================================
    // Audit / Storage Errors (5xx)
    // =================================================================
    /// A storage-layer operation failed.
    #[error("RM_ERR_500: Storage error: {reason}")]
    Storage { reason: String },

    /// Serialization / deserialization error.
    #[error("RM_ERR_501: Serialization error: {0}")]
    Serialization(String),

    /// I/O error (disk). Audit file appends swallow this by design; only
    /// bulk export and storage implementations surface it.
    #[error("RM_ERR_502: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ReliefError>;

impl ReliefError {
    /// Shorthand for `InvalidArgument` with a formatted reason.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for ReliefError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
