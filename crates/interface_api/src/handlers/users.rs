//! User administration and signup approval handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use core_kernel::{Role, SignupRequestId, UserId};
use domain_identity::{SignupRequest, UserDetailsUpdate};

use super::require_role;
use crate::auth::AuthUser;
use crate::dto::users::UserResponse;
use crate::{error::ApiError, home_currency, AppState};

/// Admins see every user, managers see their team
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = match user.role {
        Role::Admin => state.users.list(),
        Role::Manager => state.users.team_of(user.user_id),
        Role::Employee => return Err(ApiError::forbidden("Employees cannot list users")),
    };
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Edits designation, department and reviewing manager
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<UserId>,
    Json(update): Json<UserDetailsUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let account = state.users.update_details(&user.actor(), user_id, &update)?;
    Ok(Json(account.into()))
}

pub async fn list_signups(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SignupRequest>>, ApiError> {
    require_role(&user, &[Role::Admin])?;
    Ok(Json(state.users.pending_signups()))
}

/// Approves a signup; the applicant may then set a password
///
/// A new manager starts with the default ceiling in their home currency.
pub async fn approve_signup(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<SignupRequestId>,
) -> Result<Json<UserResponse>, ApiError> {
    let account = state.users.approve_signup(&user.actor(), id)?;
    if account.role == Role::Manager {
        let currency = home_currency(&state.currency, &account);
        state.claims.seed_default_limit(account.id, currency).await?;
    }
    Ok(Json(account.into()))
}
