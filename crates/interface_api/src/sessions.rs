//! Live sessions, one [`SessionContext`] per completed bootstrap flow
//!
//! A session lives no longer than the token issued for it. Expired entries
//! read as ended and are dropped by [`SessionRegistry::evict_expired`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::FlowId;
use domain_identity::{IdentityError, InMemorySessionStorage, Profile, Route, Session, SessionContext};

type Context = SessionContext<InMemorySessionStorage>;

#[derive(Debug)]
struct Entry {
    context: Arc<Context>,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default, Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<FlowId, Entry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialises storage for a new session that ends at `expires_at`
    pub async fn open(
        &self,
        id: FlowId,
        session: &Session,
        expires_at: DateTime<Utc>,
    ) -> Result<(), IdentityError> {
        let context = Context::new(InMemorySessionStorage::new());
        context.init(session)?;
        let entry = Entry {
            context: Arc::new(context),
            expires_at,
        };
        self.sessions.write().await.insert(id, entry);
        Ok(())
    }

    pub async fn is_active(&self, id: FlowId) -> bool {
        self.live(id).await.is_some()
    }

    pub async fn current(&self, id: FlowId) -> Result<Option<Session>, IdentityError> {
        match self.live(id).await {
            Some(context) => context.current(),
            None => Ok(None),
        }
    }

    pub async fn update_profile(&self, id: FlowId, profile: &Profile) -> Result<Session, IdentityError> {
        let context = self
            .live(id)
            .await
            .ok_or_else(|| IdentityError::unauthorized("No active session"))?;
        context.update_profile(profile)
    }

    /// Tears the session down; returns where the client goes next
    pub async fn close(&self, id: FlowId) -> Route {
        match self.sessions.write().await.remove(&id) {
            Some(entry) => entry.context.teardown(),
            None => Route::Auth,
        }
    }

    /// Tears down every session past its expiry as of `now`
    pub async fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            let live = entry.is_live(now);
            if !live {
                entry.context.teardown();
            }
            live
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "Expired sessions evicted");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn live(&self, id: FlowId) -> Option<Arc<Context>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|entry| entry.is_live(Utc::now()))
            .map(|entry| entry.context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use core_kernel::{Currency, Role, UserId};
    use domain_identity::SessionUser;

    fn session() -> Session {
        Session {
            user: SessionUser {
                id: UserId::new(),
                name: "Jane Smith".to_string(),
                firm_code: "ACME".to_string(),
                started_at: Utc::now(),
            },
            role: Role::Manager,
            nationality: None,
            profile: Profile {
                name: "Jane Smith".to_string(),
                designation: None,
                department: None,
                location: None,
                manager: None,
                currency: Currency::USD,
            },
        }
    }

    #[tokio::test]
    async fn test_session_ends_at_expiry() {
        let registry = SessionRegistry::new();
        let id = FlowId::new();
        registry
            .open(id, &session(), Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert!(!registry.is_active(id).await);
        assert!(registry.current(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_evicted() {
        let registry = SessionRegistry::new();
        let now = Utc::now();
        for _ in 0..3 {
            registry
                .open(FlowId::new(), &session(), now + Duration::minutes(5))
                .await
                .unwrap();
        }
        let keeper = FlowId::new();
        registry
            .open(keeper, &session(), now + Duration::hours(2))
            .await
            .unwrap();

        assert_eq!(registry.evict_expired(now + Duration::hours(1)).await, 3);
        assert_eq!(registry.len().await, 1);
        assert!(registry.is_active(keeper).await);
    }
}
