//! Request handlers

pub mod auth;
pub mod claims;
pub mod currency;
pub mod health;
pub mod limits;
pub mod session;
pub mod users;

use core_kernel::Role;

use crate::auth::AuthUser;
use crate::error::ApiError;

/// Rejects callers whose role is not in `allowed`
pub(crate) fn require_role(user: &AuthUser, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!("Not available to the {} role", user.role)))
    }
}
