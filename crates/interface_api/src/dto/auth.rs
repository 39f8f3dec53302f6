//! Bootstrap flow and session DTOs

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, FlowId, Role, SignupRequestId};
use domain_identity::{BootstrapStep, Profile, Route, Session, SessionUser};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    pub flow_id: FlowId,
    #[serde(flatten)]
    pub step: BootstrapStep,
    pub route: &'static str,
}

impl FlowResponse {
    pub fn new(flow_id: FlowId, step: BootstrapStep) -> Self {
        Self {
            flow_id,
            step,
            route: step.route().path(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    #[serde(flatten)]
    pub flow: FlowResponse,
    pub request_id: SignupRequestId,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRoleRequest {
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: SessionUser,
    pub role: Role,
    pub nationality: Option<Currency>,
    pub profile: Profile,
    pub route: &'static str,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        let route = session.landing_route().path();
        Self {
            user: session.user,
            role: session.role,
            nationality: session.nationality,
            profile: session.profile,
            route,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub session: SessionResponse,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub route: &'static str,
}

impl From<Route> for LogoutResponse {
    fn from(route: Route) -> Self {
        Self { route: route.path() }
    }
}
