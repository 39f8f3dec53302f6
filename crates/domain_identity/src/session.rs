//! Session context
//!
//! A [`Session`] is produced when the bootstrap flow completes. The
//! [`SessionContext`] writes it into a key-value [`SessionStorage`] on
//! `init` and wipes every key on `teardown`. Records are overwritten
//! wholesale, never merged.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{Currency, Role, UserId};

use crate::error::IdentityError;
use crate::profile::Profile;

pub const KEY_USER: &str = "user";
pub const KEY_ROLE: &str = "userRole";
pub const KEY_NATIONALITY: &str = "userNationality";
pub const KEY_PROFILE: &str = "userProfile";

/// Every key a session writes
pub const SESSION_KEYS: [&str; 4] = [KEY_USER, KEY_ROLE, KEY_NATIONALITY, KEY_PROFILE];

/// Client-side destinations the flow can send a user to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Landing,
    Auth,
    RoleSelect,
    Dashboard(Role),
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Auth => "/auth",
            Route::RoleSelect => "/role-select",
            Route::Dashboard(Role::Employee) => "/employee",
            Route::Dashboard(Role::Manager) => "/manager",
            Route::Dashboard(Role::Admin) => "/admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub firm_code: String,
    pub started_at: DateTime<Utc>,
}

/// The authenticated identity and the selected role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    pub role: Role,
    pub nationality: Option<Currency>,
    pub profile: Profile,
}

impl Session {
    pub fn actor(&self) -> core_kernel::Actor {
        core_kernel::Actor::new(self.user.id, self.role)
    }

    pub fn landing_route(&self) -> Route {
        Route::Dashboard(self.role)
    }
}

/// String key-value storage scoped to one client
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
    fn clear(&self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }

    fn clear(&self) {
        self.entries().clear();
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}

#[derive(Debug, Default)]
pub struct SessionContext<S: SessionStorage> {
    storage: S,
}

impl<S: SessionStorage> SessionContext<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes the session, replacing whatever was stored before
    pub fn init(&self, session: &Session) -> Result<(), IdentityError> {
        let user = serde_json::to_string(&session.user)?;
        let profile = serde_json::to_string(&session.profile)?;

        self.storage.set(KEY_USER, user);
        self.storage.set(KEY_ROLE, session.role.as_str().to_string());
        match session.nationality {
            Some(code) => self.storage.set(KEY_NATIONALITY, code.to_string()),
            None => self.storage.remove(KEY_NATIONALITY),
        }
        self.storage.set(KEY_PROFILE, profile);

        info!(user_id = %session.user.id, role = %session.role, "Session initialised");
        Ok(())
    }

    /// Reads the session back; `None` before `init` or after `teardown`
    pub fn current(&self) -> Result<Option<Session>, IdentityError> {
        let (Some(user), Some(role), Some(profile)) = (
            self.storage.get(KEY_USER),
            self.storage.get(KEY_ROLE),
            self.storage.get(KEY_PROFILE),
        ) else {
            return Ok(None);
        };

        let role: Role = role
            .parse()
            .map_err(|e: core_kernel::CoreError| IdentityError::Storage(e.to_string()))?;
        let nationality = match self.storage.get(KEY_NATIONALITY) {
            Some(code) => Some(Currency::new(&code).map_err(|e| IdentityError::Storage(e.to_string()))?),
            None => None,
        };

        Ok(Some(Session {
            user: serde_json::from_str(&user)?,
            role,
            nationality,
            profile: serde_json::from_str(&profile)?,
        }))
    }

    /// Overwrites the stored profile
    pub fn update_profile(&self, profile: &Profile) -> Result<Session, IdentityError> {
        let mut session = self
            .current()?
            .ok_or_else(|| IdentityError::unauthorized("No active session"))?;
        self.storage.set(KEY_PROFILE, serde_json::to_string(profile)?);
        session.profile = profile.clone();
        Ok(session)
    }

    /// Clears every stored key and sends the user back to authentication
    pub fn teardown(&self) -> Route {
        self.storage.clear();
        info!("Session cleared");
        Route::Auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            user: SessionUser {
                id: UserId::new(),
                name: "Jane Doe".to_string(),
                firm_code: "M100".to_string(),
                started_at: Utc::now(),
            },
            role: Role::Manager,
            nationality: None,
            profile: Profile {
                name: "Jane Doe".to_string(),
                designation: None,
                department: None,
                location: None,
                manager: None,
                currency: Currency::USD,
            },
        }
    }

    #[test]
    fn test_init_overwrites_wholesale() {
        let context = SessionContext::new(InMemorySessionStorage::new());
        let mut first = session();
        first.nationality = Some(Currency::GBP);
        context.init(&first).unwrap();
        assert!(context.storage().get(KEY_NATIONALITY).is_some());

        let second = session();
        context.init(&second).unwrap();
        assert!(context.storage().get(KEY_NATIONALITY).is_none());
        assert_eq!(context.current().unwrap(), Some(second));
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Auth.path(), "/auth");
        assert_eq!(Route::Dashboard(Role::Manager).path(), "/manager");
    }
}
