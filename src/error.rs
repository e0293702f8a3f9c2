//! Error taxonomy for the projection engine

use thiserror::Error;

/// Errors surfaced by the projection engine
#[derive(Debug, Error)]
pub enum ModelError {
    /// Malformed or out-of-range configuration. Raised synchronously before
    /// any period is computed; the offending field is named so callers can
    /// point at it.
    #[error("invalid assumptions: {field}: {reason}")]
    InvalidAssumptions { field: String, reason: String },
}

impl ModelError {
    /// Shorthand for an `InvalidAssumptions` error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAssumptions {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
