//! Session bootstrap flow
//!
//! ```text
//! Credentials ──login──▶ RoleSelection ──select_role──▶ RoleLogin ──role_login──▶ Complete
//!      │  ▲                    │ back                      │ back
//!      │  └────────────────────┘◀──────────────────────────┘
//!      └──signup──▶ ApprovalPending ──set_password──▶ Credentials
//! ```
//!
//! Every operation validates first and only then moves the flow. A failed
//! operation leaves the step exactly where it was.
//!
//! Flows idle for longer than their time-to-live are evicted. A flow parked
//! at the approval gate gets a longer allowance than one mid-login.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::{Currency, FlowId, Role, SignupRequestId};

use crate::error::IdentityError;
use crate::session::{Route, Session, SessionUser};
use crate::users::{SignupRequest, UserAccount, UserDirectory};
use crate::validation::{CredentialValidator, LoginForm, RoleLoginForm, SignupForm};

/// Idle allowance for a flow between login steps
pub const DEFAULT_FLOW_TTL_SECS: i64 = 15 * 60;
/// Allowance for a flow waiting on signup approval
pub const DEFAULT_APPROVAL_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum BootstrapStep {
    Credentials,
    ApprovalPending { request_id: SignupRequestId },
    RoleSelection,
    RoleLogin { role: Role },
    Complete { role: Role },
}

impl BootstrapStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BootstrapStep::Credentials => "credentials",
            BootstrapStep::ApprovalPending { .. } => "approval_pending",
            BootstrapStep::RoleSelection => "role_selection",
            BootstrapStep::RoleLogin { .. } => "role_login",
            BootstrapStep::Complete { .. } => "complete",
        }
    }

    /// The client page that renders this step
    pub fn route(&self) -> Route {
        match self {
            BootstrapStep::Credentials | BootstrapStep::ApprovalPending { .. } => Route::Auth,
            BootstrapStep::RoleSelection | BootstrapStep::RoleLogin { .. } => Route::RoleSelect,
            BootstrapStep::Complete { role } => Route::Dashboard(*role),
        }
    }
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapFlow {
    id: FlowId,
    step: BootstrapStep,
    account: Option<UserAccount>,
    firm_code: Option<String>,
    last_active: DateTime<Utc>,
}

impl BootstrapFlow {
    pub fn new() -> Self {
        Self {
            id: FlowId::new_v7(),
            step: BootstrapStep::Credentials,
            account: None,
            firm_code: None,
            last_active: Utc::now(),
        }
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn step(&self) -> BootstrapStep {
        self.step
    }

    /// When the flow last moved
    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// The account identified at the credentials step
    pub fn account(&self) -> Option<&UserAccount> {
        self.account.as_ref()
    }

    /// Checks the first-step credentials and identifies the user
    pub fn login(&mut self, form: &LoginForm, directory: &UserDirectory) -> Result<BootstrapStep, IdentityError> {
        self.expect_step("log in", matches!(self.step, BootstrapStep::Credentials))?;
        CredentialValidator::validate_login(form).into_result()?;

        let account = directory
            .find_by_name(&form.name)
            .ok_or_else(|| IdentityError::UserNotFound(form.name.trim().to_string()))?;

        self.account = Some(account);
        self.firm_code = Some(form.firm_code.trim().to_string());
        self.advance(BootstrapStep::RoleSelection)
    }

    /// Files a signup request and parks the flow at the approval gate
    pub fn signup(&mut self, form: &SignupForm, directory: &UserDirectory) -> Result<SignupRequest, IdentityError> {
        self.expect_step("sign up", matches!(self.step, BootstrapStep::Credentials))?;
        let request = directory.submit_signup(form)?;
        self.advance(BootstrapStep::ApprovalPending { request_id: request.id })?;
        Ok(request)
    }

    /// Sets the password once an admin approved the signup
    pub fn set_password(&mut self, password: &str, directory: &UserDirectory) -> Result<BootstrapStep, IdentityError> {
        let BootstrapStep::ApprovalPending { request_id } = self.step else {
            return Err(self.invalid("set a password"));
        };
        CredentialValidator::validate_password(password).into_result()?;
        directory.complete_signup(request_id)?;
        self.advance(BootstrapStep::Credentials)
    }

    pub fn select_role(&mut self, role: Role) -> Result<BootstrapStep, IdentityError> {
        self.expect_step("select a role", matches!(self.step, BootstrapStep::RoleSelection))?;
        self.advance(BootstrapStep::RoleLogin { role })
    }

    /// Steps back one page
    pub fn back(&mut self) -> Result<BootstrapStep, IdentityError> {
        let previous = match self.step {
            BootstrapStep::RoleLogin { .. } => BootstrapStep::RoleSelection,
            BootstrapStep::RoleSelection | BootstrapStep::ApprovalPending { .. } => {
                self.account = None;
                self.firm_code = None;
                BootstrapStep::Credentials
            }
            BootstrapStep::Credentials | BootstrapStep::Complete { .. } => {
                return Err(self.invalid("go back"));
            }
        };
        self.advance(previous)
    }

    /// Role-scoped credential re-entry; completes the flow
    ///
    /// `default_currency` picks the display currency for users who never
    /// chose one, given their role and nationality.
    pub fn role_login<F>(
        &mut self,
        form: &RoleLoginForm,
        directory: &UserDirectory,
        default_currency: F,
    ) -> Result<Session, IdentityError>
    where
        F: FnOnce(Role, Option<Currency>) -> Currency,
    {
        let BootstrapStep::RoleLogin { role } = self.step else {
            return Err(self.invalid("log in with a role"));
        };
        CredentialValidator::validate_role_login(role, form).into_result()?;

        let account_id = self
            .account
            .as_ref()
            .map(|a| a.id)
            .ok_or_else(|| self.invalid("log in with a role"))?;
        // Re-read so admin edits made since the first step are visible
        let account = directory.get(account_id)?;
        if account.role != role {
            return Err(IdentityError::validation(format!(
                "{} is not registered as {}",
                account.name, role
            )));
        }

        let currency = default_currency(role, account.nationality);
        let profile = directory.profile(account.id, currency)?;
        let session = Session {
            user: SessionUser {
                id: account.id,
                name: account.name.clone(),
                firm_code: self.firm_code.clone().unwrap_or_default(),
                started_at: Utc::now(),
            },
            role,
            nationality: account.nationality,
            profile,
        };

        self.account = Some(account);
        self.advance(BootstrapStep::Complete { role })?;
        Ok(session)
    }

    fn expect_step(&self, operation: &'static str, ok: bool) -> Result<(), IdentityError> {
        if ok {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> IdentityError {
        IdentityError::InvalidStep {
            operation,
            step: self.step,
        }
    }

    fn advance(&mut self, next: BootstrapStep) -> Result<BootstrapStep, IdentityError> {
        debug!(flow_id = %self.id, from = %self.step, to = %next, "Bootstrap step");
        self.step = next;
        self.last_active = Utc::now();
        Ok(next)
    }

    fn is_expired(&self, now: DateTime<Utc>, idle_ttl: Duration, approval_ttl: Duration) -> bool {
        let ttl = match self.step {
            BootstrapStep::ApprovalPending { .. } => approval_ttl,
            _ => idle_ttl,
        };
        now - self.last_active > ttl
    }
}

impl Default for BootstrapFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Flows in progress, keyed by id
#[derive(Debug)]
pub struct BootstrapFlows {
    flows: Mutex<HashMap<FlowId, BootstrapFlow>>,
    idle_ttl: Duration,
    approval_ttl: Duration,
}

impl BootstrapFlows {
    pub fn new() -> Self {
        Self::with_ttl(
            Duration::seconds(DEFAULT_FLOW_TTL_SECS),
            Duration::seconds(DEFAULT_APPROVAL_TTL_SECS),
        )
    }

    pub fn with_ttl(idle_ttl: Duration, approval_ttl: Duration) -> Self {
        Self {
            flows: Mutex::new(HashMap::new()),
            idle_ttl,
            approval_ttl,
        }
    }

    /// Inserts a fresh flow and returns its id; expired flows are swept first
    pub fn start(&self) -> FlowId {
        let flow = BootstrapFlow::new();
        let id = flow.id();
        let mut flows = self.lock();
        self.sweep(&mut flows, Utc::now());
        flows.insert(id, flow);
        info!(flow_id = %id, "Bootstrap flow started");
        id
    }

    /// Runs `op` against the flow with `id`
    pub fn with_flow<R>(
        &self,
        id: FlowId,
        op: impl FnOnce(&mut BootstrapFlow) -> Result<R, IdentityError>,
    ) -> Result<R, IdentityError> {
        let mut flows = self.lock();
        let expired = flows
            .get(&id)
            .is_some_and(|f| f.is_expired(Utc::now(), self.idle_ttl, self.approval_ttl));
        if expired {
            flows.remove(&id);
        }
        let flow = flows
            .get_mut(&id)
            .ok_or_else(|| IdentityError::validation(format!("Unknown or expired flow {}", id)))?;
        op(flow)
    }

    /// Drops flows idle past their allowance as of `now`
    pub fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let mut flows = self.lock();
        self.sweep(&mut flows, now)
    }

    fn sweep(&self, flows: &mut HashMap<FlowId, BootstrapFlow>, now: DateTime<Utc>) -> usize {
        let before = flows.len();
        flows.retain(|_, f| !f.is_expired(now, self.idle_ttl, self.approval_ttl));
        let evicted = before - flows.len();
        if evicted > 0 {
            debug!(evicted, "Expired bootstrap flows evicted");
        }
        evicted
    }

    pub fn step(&self, id: FlowId) -> Option<BootstrapStep> {
        self.lock().get(&id).map(|f| f.step())
    }

    pub fn remove(&self, id: FlowId) -> Option<BootstrapFlow> {
        self.lock().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<FlowId, BootstrapFlow>> {
        self.flows.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for BootstrapFlows {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age(flows: &BootstrapFlows, id: FlowId, by: Duration) {
        let mut map = flows.lock();
        let flow = map.get_mut(&id).unwrap();
        flow.last_active = flow.last_active - by;
    }

    #[test]
    fn test_idle_flows_are_evicted() {
        let flows = BootstrapFlows::with_ttl(Duration::minutes(15), Duration::days(7));
        let abandoned: Vec<FlowId> = (0..5).map(|_| flows.start()).collect();
        let fresh = flows.start();
        for id in &abandoned {
            age(&flows, *id, Duration::minutes(16));
        }

        assert_eq!(flows.evict_expired(Utc::now()), 5);
        assert_eq!(flows.len(), 1);
        assert!(flows.step(fresh).is_some());
    }

    #[test]
    fn test_approval_gate_gets_longer_allowance() {
        let flows = BootstrapFlows::with_ttl(Duration::minutes(15), Duration::days(7));
        let id = flows.start();
        flows.lock().get_mut(&id).unwrap().step = BootstrapStep::ApprovalPending {
            request_id: SignupRequestId::new(),
        };

        age(&flows, id, Duration::hours(2));
        assert_eq!(flows.evict_expired(Utc::now()), 0);

        age(&flows, id, Duration::days(8));
        assert_eq!(flows.evict_expired(Utc::now()), 1);
        assert!(flows.is_empty());
    }

    #[test]
    fn test_expired_flow_is_refused_and_dropped() {
        let flows = BootstrapFlows::with_ttl(Duration::minutes(15), Duration::days(7));
        let id = flows.start();
        age(&flows, id, Duration::minutes(30));

        let result = flows.with_flow(id, |flow| flow.select_role(Role::Manager));
        assert!(matches!(result, Err(IdentityError::Validation(_))));
        assert!(flows.is_empty());
    }

    #[test]
    fn test_start_sweeps_abandoned_flows() {
        let flows = BootstrapFlows::with_ttl(Duration::minutes(15), Duration::days(7));
        for _ in 0..50 {
            let id = flows.start();
            age(&flows, id, Duration::hours(1));
        }
        flows.start();
        assert_eq!(flows.len(), 1);
    }
}
