//! Claim limit handlers

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use core_kernel::{Currency, Money, Role, UserId};
use domain_claims::ClaimLimit;
use domain_identity::UserAccount;

use super::require_role;
use crate::auth::AuthUser;
use crate::dto::claims::MoneyResponse;
use crate::dto::limits::{LimitResponse, SetLimitRequest};
use crate::{error::ApiError, home_currency, AppState};

/// Lists manager ceilings
///
/// Admins see every manager; a manager sees only their own ceiling. A limit
/// counts as explicit once an admin has set it.
pub async fn list_limits(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<LimitResponse>>, ApiError> {
    require_role(&user, &[Role::Manager, Role::Admin])?;

    let explicit: HashMap<UserId, ClaimLimit> = state
        .claims
        .limits()
        .await?
        .into_iter()
        .map(|l| (l.manager_id, l))
        .collect();

    let managers: Vec<UserAccount> = match user.role {
        Role::Admin => state
            .users
            .list()
            .into_iter()
            .filter(|u| u.role == Role::Manager)
            .collect(),
        _ => vec![state.users.get(user.user_id)?],
    };

    let mut limits = Vec::with_capacity(managers.len());
    for manager in managers {
        let response = match explicit.get(&manager.id) {
            Some(limit) => limit_response(&state, &manager, limit),
            None => LimitResponse {
                manager_id: manager.id,
                manager_name: manager.name,
                ceiling: MoneyResponse::new(&state.claims.ceiling_for(manager.id).await?, &state.currency),
                explicit: false,
                updated_by: None,
                updated_at: None,
            },
        };
        limits.push(response);
    }
    Ok(Json(limits))
}

/// Sets a manager's ceiling (admin only)
pub async fn set_limit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(manager_id): Path<UserId>,
    Json(request): Json<SetLimitRequest>,
) -> Result<Json<LimitResponse>, ApiError> {
    require_role(&user, &[Role::Admin])?;

    let manager = state.users.get(manager_id)?;
    if manager.role != Role::Manager {
        return Err(ApiError::validation(format!("{} is not a manager", manager.name)));
    }

    let currency = match request.currency.as_deref() {
        Some(code) => Currency::new(code)?,
        None => home_currency(&state.currency, &manager),
    };
    let ceiling = Money::new(request.ceiling, currency);
    let limit = state.claims.set_limit(&user.actor(), manager_id, ceiling).await?;

    Ok(Json(limit_response(&state, &manager, &limit)))
}

fn limit_response(state: &AppState, manager: &UserAccount, limit: &ClaimLimit) -> LimitResponse {
    LimitResponse {
        manager_id: manager.id,
        manager_name: manager.name.clone(),
        ceiling: MoneyResponse::new(&limit.ceiling, &state.currency),
        explicit: limit.updated_by.is_some(),
        updated_by: limit.updated_by,
        updated_at: Some(limit.updated_at),
    }
}
