//! Identity domain errors

use thiserror::Error;

use core_kernel::{SignupRequestId, UserId};

use crate::bootstrap::BootstrapStep;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// One or more form rules failed; the flow did not advance
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The operation is not available at the flow's current step
    #[error("Cannot {operation} at step {step}")]
    InvalidStep {
        operation: &'static str,
        step: BootstrapStep,
    },

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Signup request not found: {0}")]
    SignupNotFound(SignupRequestId),

    #[error("Signup request {0} is awaiting approval")]
    SignupAwaitingApproval(SignupRequestId),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl IdentityError {
    pub fn validation(message: impl Into<String>) -> Self {
        IdentityError::Validation(vec![message.into()])
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        IdentityError::Unauthorized(message.into())
    }

    pub fn user_not_found(id: UserId) -> Self {
        IdentityError::UserNotFound(id.to_string())
    }

    /// User-facing messages for validation failures
    pub fn messages(&self) -> Vec<String> {
        match self {
            IdentityError::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<serde_json::Error> for IdentityError {
    fn from(e: serde_json::Error) -> Self {
        IdentityError::Storage(e.to_string())
    }
}
