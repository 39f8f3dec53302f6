//! HTTP API Layer
//!
//! This crate provides the REST API for the Aprova expense approval system
//! using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: session bootstrap, claims, limits, users, currencies
//! - **Middleware**: JWT authentication against live sessions, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::in_memory(config)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod sessions;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use chrono::{DateTime, Utc};
use tracing::debug;

use core_kernel::{CoreError, Currency, Money, Role, SingleFlight};
use domain_claims::{
    ApprovalEngine, ClaimLimit, ClaimRepository, ClaimStore, InMemoryClaimRepository, LimitPolicy,
};
use domain_currency::CurrencyResolver;
use domain_identity::{demo_users, BootstrapFlows, UserAccount, UserDirectory};

use crate::config::ApiConfig;
use crate::handlers::{auth as auth_handlers, claims, currency, health, limits, session, users};
use crate::middleware::{audit_middleware, auth_middleware};
use crate::sessions::SessionRegistry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub repository: Arc<dyn ClaimRepository>,
    pub claims: Arc<ClaimStore>,
    pub engine: Arc<ApprovalEngine>,
    pub currency: Arc<CurrencyResolver>,
    pub users: Arc<UserDirectory>,
    pub flows: Arc<BootstrapFlows>,
    pub sessions: SessionRegistry,
    pub in_flight: SingleFlight,
}

impl AppState {
    /// Wires every component over `repository`
    pub fn new(
        config: ApiConfig,
        repository: Arc<dyn ClaimRepository>,
        users: UserDirectory,
    ) -> Result<Self, CoreError> {
        let policy = LimitPolicy::new(config.default_ceiling()?);
        let currency = CurrencyResolver::new(config.fallback_currency()?);

        Ok(Self {
            claims: Arc::new(ClaimStore::new(repository.clone(), policy)),
            engine: Arc::new(ApprovalEngine::new(repository.clone(), policy)),
            repository,
            currency: Arc::new(currency),
            users: Arc::new(users),
            flows: Arc::new(BootstrapFlows::with_ttl(config.flow_ttl(), config.signup_ttl())),
            sessions: SessionRegistry::new(),
            in_flight: SingleFlight::new(),
            config,
        })
    }

    /// In-memory state seeded with the demo users
    ///
    /// Each demo manager starts with the default ceiling amount in their own
    /// home currency, so their team's claims compare like for like.
    pub fn in_memory(config: ApiConfig) -> Result<Self, CoreError> {
        let accounts = demo_users();
        let ceiling = config.default_ceiling()?;
        let resolver = CurrencyResolver::new(config.fallback_currency()?);
        let limits = accounts
            .iter()
            .filter(|account| account.role == Role::Manager)
            .map(|manager| {
                let currency = home_currency(&resolver, manager);
                ClaimLimit::new(manager.id, Money::new(ceiling.amount(), currency))
            })
            .collect();

        let users = UserDirectory::with_users(accounts)
            .map_err(|e| CoreError::Configuration(e.to_string()))?;
        Self::new(config, Arc::new(InMemoryClaimRepository::with_limits(limits)), users)
    }

    /// Drops bootstrap flows and sessions that have outlived their allowance
    pub async fn evict_expired(&self, now: DateTime<Utc>) -> (usize, usize) {
        let flows = self.flows.evict_expired(now);
        let sessions = self.sessions.evict_expired(now).await;
        debug!(flows, sessions, "Expiry sweep finished");
        (flows, sessions)
    }
}

/// The currency an account works in: the profile choice, else its role default
pub fn home_currency(resolver: &CurrencyResolver, account: &UserAccount) -> Currency {
    account
        .display_currency
        .unwrap_or_else(|| resolver.default_currency(account.role, account.nationality))
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Session bootstrap, before a token exists
    let auth_routes = Router::new()
        .route("/login", post(auth_handlers::login))
        .route("/signup", post(auth_handlers::signup))
        .route("/flows/:id/password", post(auth_handlers::set_password))
        .route("/flows/:id/role", post(auth_handlers::select_role))
        .route("/flows/:id/back", post(auth_handlers::back))
        .route("/flows/:id/role-login", post(auth_handlers::role_login));

    let session_routes = Router::new()
        .route("/", get(session::current_session).delete(session::logout))
        .route("/profile", put(session::update_profile));

    let claims_routes = Router::new()
        .route("/", get(claims::list_claims).post(claims::submit_claim))
        .route("/history", get(claims::claim_history))
        .route("/summary", get(claims::claim_summary))
        .route("/activity", get(claims::recent_activity))
        .route("/bulk", post(claims::bulk_action))
        .route("/:id", get(claims::get_claim))
        .route("/:id/approve", post(claims::approve_claim))
        .route("/:id/reject", post(claims::reject_claim))
        .route("/:id/flag", post(claims::flag_claim));

    let limits_routes = Router::new()
        .route("/", get(limits::list_limits))
        .route("/:manager_id", put(limits::set_limit));

    let users_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/:id", put(users::update_user));

    let signups_routes = Router::new()
        .route("/", get(users::list_signups))
        .route("/:id/approve", post(users::approve_signup));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/session", session_routes)
        .nest("/claims", claims_routes)
        .nest("/limits", limits_routes)
        .nest("/users", users_routes)
        .nest("/signups", signups_routes)
        .route("/currencies", get(currency::list_currencies))
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/auth", auth_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
