//! Claims domain errors

use thiserror::Error;

use core_kernel::{ClaimId, PortError};
use crate::claim::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Missing or malformed input; nothing was stored
    #[error("Validation error: {0}")]
    Validation(String),

    /// The action is not valid for the claim's current status; claim unchanged
    #[error("Claim {claim_id} cannot move from {from} to {to}")]
    InvalidState {
        claim_id: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    },

    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    /// The actor has no authority over the claim or operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Repository error: {0}")]
    Repository(#[from] PortError),
}

impl ClaimError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ClaimError::Unauthorized(message.into())
    }

    /// Short machine-readable kind, used in bulk reports and API bodies
    pub fn kind(&self) -> &'static str {
        match self {
            ClaimError::Validation(_) => "validation_error",
            ClaimError::InvalidState { .. } => "invalid_state",
            ClaimError::ClaimNotFound(_) => "not_found",
            ClaimError::Unauthorized(_) => "unauthorized",
            ClaimError::Repository(_) => "repository_error",
        }
    }
}
