//! Identity Domain
//!
//! Everything between "open the app" and "land on a dashboard":
//!
//! - [`validation`]: credential and signup form rules
//! - [`bootstrap`]: the login / signup / role-selection flow
//! - [`session`]: the session object and its key-value storage
//! - [`users`]: registered users, signup approvals, admin edits
//! - [`profile`]: the user-facing profile view

pub mod bootstrap;
pub mod error;
pub mod profile;
pub mod session;
pub mod users;
pub mod validation;

pub use bootstrap::{
    BootstrapFlow, BootstrapFlows, BootstrapStep, DEFAULT_APPROVAL_TTL_SECS, DEFAULT_FLOW_TTL_SECS,
};
pub use error::IdentityError;
pub use profile::{Profile, ProfileUpdate};
pub use session::{InMemorySessionStorage, Route, Session, SessionContext, SessionStorage, SessionUser, SESSION_KEYS};
pub use users::{demo_users, SignupRequest, SignupStatus, UserAccount, UserDetailsUpdate, UserDirectory};
pub use validation::{CredentialValidator, LoginForm, RoleLoginForm, SignupForm, ValidationResult};
