//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{ClaimId, Currency, Role};
use domain_claims::{ActivityEntry, ClaimSummary, SubmitClaimRequest};

use super::require_role;
use crate::auth::AuthUser;
use crate::dto::claims::*;
use crate::{error::ApiError, home_currency, AppState};

/// Submits a new claim
///
/// Employee claims are routed to the employee's manager. A second submit
/// from the same user while the first is still running is refused.
pub async fn submit_claim(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SubmitClaimBody>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    let _guard = state.in_flight.acquire(format!("submit:{}", user.user_id))?;

    let account = state.users.get(user.user_id)?;
    let currency = match body.currency.as_deref() {
        Some(code) => Currency::new(code)?,
        None => home_currency(&state.currency, &account),
    };

    let claim = state
        .claims
        .submit(SubmitClaimRequest {
            owner: user.actor(),
            manager_id: account.manager_id,
            title: body.title,
            amount: body.amount,
            currency,
            category: body.category,
            description: body.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ClaimResponse::new(&claim, &state.currency))))
}

/// Lists the caller's working set of claims
pub async fn list_claims(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let claims = state.claims.list_for(&user.actor()).await?;
    Ok(Json(
        claims
            .iter()
            .map(|c| ClaimResponse::new(c, &state.currency))
            .collect(),
    ))
}

/// Terminal claims: approved expenses, approved claims
pub async fn claim_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let claims = state.claims.history_for(&user.actor()).await?;
    Ok(Json(
        claims
            .iter()
            .map(|c| ClaimResponse::new(c, &state.currency))
            .collect(),
    ))
}

pub async fn claim_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ClaimSummary>, ApiError> {
    Ok(Json(state.claims.summary_for(&user.actor()).await?))
}

pub async fn get_claim(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<ClaimId>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.claims.get(&user.actor(), id).await?;
    Ok(Json(ClaimResponse::new(&claim, &state.currency)))
}

pub async fn approve_claim(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<ClaimId>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let outcome = state.engine.approve(id, &user.actor()).await?;
    Ok(Json(TransitionResponse::new(&outcome, &state.currency)))
}

pub async fn reject_claim(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<ClaimId>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let outcome = state.engine.reject(id, &user.actor()).await?;
    Ok(Json(TransitionResponse::new(&outcome, &state.currency)))
}

pub async fn flag_claim(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<ClaimId>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let outcome = state.engine.flag(id, &user.actor()).await?;
    Ok(Json(TransitionResponse::new(&outcome, &state.currency)))
}

/// Applies approve/reject to many claims; per-claim outcomes in the body
pub async fn bulk_action(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<BulkRequest>,
) -> Result<Json<BulkResponse>, ApiError> {
    require_role(&user, &[Role::Manager, Role::Admin])?;
    if request.claim_ids.is_empty() {
        return Err(ApiError::validation("Select at least one claim"));
    }

    let report = state
        .engine
        .apply_bulk(&request.claim_ids, request.action, &user.actor())
        .await;
    Ok(Json(BulkResponse::from(&report)))
}

/// Recent approval decisions (admin notifications)
pub async fn recent_activity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
    require_role(&user, &[Role::Admin])?;
    Ok(Json(state.engine.recent_activity(query.limit)))
}
