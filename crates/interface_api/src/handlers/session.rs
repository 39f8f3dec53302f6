//! Session handlers

use axum::{extract::State, Extension, Json};

use domain_identity::ProfileUpdate;

use crate::auth::AuthUser;
use crate::dto::auth::{LogoutResponse, SessionResponse};
use crate::{error::ApiError, AppState};

pub async fn current_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .sessions
        .current(user.session_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(session.into()))
}

/// Logout: clears every stored session key
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Json<LogoutResponse> {
    let route = state.sessions.close(user.session_id).await;
    tracing::info!(user_id = %user.user_id, "Logged out");
    Json(route.into())
}

/// Edits location and display currency
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<SessionResponse>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }

    let account = state.users.update_profile(user.user_id, &update)?;
    let default = state.currency.default_currency(user.role, account.nationality);
    let profile = state.users.profile(user.user_id, default)?;
    let session = state.sessions.update_profile(user.session_id, &profile).await?;
    Ok(Json(session.into()))
}
