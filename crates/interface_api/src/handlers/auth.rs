//! Session bootstrap handlers
//!
//! `login` and `signup` open a flow; the remaining steps address it by id.
//! A flow whose opening step fails is discarded, so nothing is committed.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Duration, Utc};
use tracing::info;

use core_kernel::FlowId;
use domain_identity::{LoginForm, RoleLoginForm, SignupForm};

use crate::auth::create_token;
use crate::dto::auth::*;
use crate::{error::ApiError, AppState};

/// Checks first-step credentials and opens a flow at role selection
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<FlowResponse>, ApiError> {
    let flow_id = state.flows.start();
    let result = state
        .flows
        .with_flow(flow_id, |flow| flow.login(&form, &state.users));

    match result {
        Ok(step) => Ok(Json(FlowResponse::new(flow_id, step))),
        Err(e) => {
            state.flows.remove(flow_id);
            Err(e.into())
        }
    }
}

/// Files a signup request; the flow waits at the approval gate
pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> Result<Json<SignupResponse>, ApiError> {
    let flow_id = state.flows.start();
    let result = state
        .flows
        .with_flow(flow_id, |flow| Ok((flow.signup(&form, &state.users)?, flow.step())));

    match result {
        Ok((request, step)) => Ok(Json(SignupResponse {
            flow: FlowResponse::new(flow_id, step),
            request_id: request.id,
            message: "Signup request submitted! Approval may take 2-3 working days.",
        })),
        Err(e) => {
            state.flows.remove(flow_id);
            Err(e.into())
        }
    }
}

pub async fn set_password(
    State(state): State<AppState>,
    Path(flow_id): Path<FlowId>,
    Json(request): Json<SetPasswordRequest>,
) -> Result<Json<FlowResponse>, ApiError> {
    let step = state
        .flows
        .with_flow(flow_id, |flow| flow.set_password(&request.password, &state.users))?;
    Ok(Json(FlowResponse::new(flow_id, step)))
}

pub async fn select_role(
    State(state): State<AppState>,
    Path(flow_id): Path<FlowId>,
    Json(request): Json<SelectRoleRequest>,
) -> Result<Json<FlowResponse>, ApiError> {
    let step = state.flows.with_flow(flow_id, |flow| flow.select_role(request.role))?;
    Ok(Json(FlowResponse::new(flow_id, step)))
}

pub async fn back(
    State(state): State<AppState>,
    Path(flow_id): Path<FlowId>,
) -> Result<Json<FlowResponse>, ApiError> {
    let step = state.flows.with_flow(flow_id, |flow| flow.back())?;
    Ok(Json(FlowResponse::new(flow_id, step)))
}

/// Completes the flow, opens a session, and issues its token
pub async fn role_login(
    State(state): State<AppState>,
    Path(flow_id): Path<FlowId>,
    Json(form): Json<RoleLoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let currency = state.currency.clone();
    let session = state.flows.with_flow(flow_id, |flow| {
        flow.role_login(&form, &state.users, |role, nationality| {
            currency.default_currency(role, nationality)
        })
    })?;
    state.flows.remove(flow_id);

    let token = create_token(
        &session,
        flow_id,
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )?;
    let expires_at = Utc::now() + Duration::seconds(state.config.jwt_expiration_secs as i64);
    state.sessions.open(flow_id, &session, expires_at).await?;

    info!(user_id = %session.user.id, role = %session.role, "Session established");
    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer",
        expires_in: state.config.jwt_expiration_secs,
        session: session.into(),
    }))
}
