//! Claims Domain Ports
//!
//! The `ClaimRepository` port decouples the claim store and approval engine
//! from storage. The bundled [`memory::InMemoryClaimRepository`] keeps
//! everything for the process lifetime; a durable adapter only needs to
//! implement the same trait.
//!
//! ```rust,ignore
//! use domain_claims::ports::{ClaimRepository, memory::InMemoryClaimRepository};
//! use std::sync::Arc;
//!
//! let repository: Arc<dyn ClaimRepository> = Arc::new(InMemoryClaimRepository::new());
//! let store = ClaimStore::new(repository.clone(), policy);
//! let engine = ApprovalEngine::new(repository, policy);
//! ```

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, HealthCheckable, PortError, UserId};

use crate::claim::Claim;
use crate::limits::ClaimLimit;

/// Storage port for claims and manager ceilings
#[async_trait]
pub trait ClaimRepository: DomainPort + HealthCheckable {
    /// Stores a new claim; fails with `Conflict` if the id already exists
    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Retrieves a claim, or `PortError::NotFound`
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Replaces a stored claim; fails with `NotFound` if it does not exist
    async fn update_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Returns every claim, newest first
    async fn list_claims(&self) -> Result<Vec<Claim>, PortError>;

    async fn get_limit(&self, manager_id: UserId) -> Result<Option<ClaimLimit>, PortError>;

    /// Inserts or overwrites the limit for `limit.manager_id`
    async fn put_limit(&self, limit: &ClaimLimit) -> Result<(), PortError>;

    async fn list_limits(&self) -> Result<Vec<ClaimLimit>, PortError>;
}

/// In-memory implementation of `ClaimRepository`
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    #[derive(Debug, Default, Clone)]
    pub struct InMemoryClaimRepository {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
        limits: Arc<RwLock<HashMap<UserId, ClaimLimit>>>,
    }

    impl InMemoryClaimRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with limits, e.g. seeded ceilings at startup
        pub fn with_limits(limits: Vec<ClaimLimit>) -> Self {
            let limits = limits.into_iter().map(|l| (l.manager_id, l)).collect();
            Self {
                claims: Arc::default(),
                limits: Arc::new(RwLock::new(limits)),
            }
        }

        pub async fn claim_count(&self) -> usize {
            self.claims.read().await.len()
        }
    }

    impl DomainPort for InMemoryClaimRepository {}

    #[async_trait]
    impl HealthCheckable for InMemoryClaimRepository {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("in-memory-claims")
        }
    }

    #[async_trait]
    impl ClaimRepository for InMemoryClaimRepository {
        async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            if claims.contains_key(&claim.id()) {
                return Err(PortError::conflict(format!("Claim {} already exists", claim.id())));
            }
            claims.insert(claim.id(), claim.clone());
            Ok(())
        }

        async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn update_claim(&self, claim: &Claim) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            match claims.get_mut(&claim.id()) {
                Some(stored) => {
                    *stored = claim.clone();
                    Ok(())
                }
                None => Err(PortError::not_found("Claim", claim.id())),
            }
        }

        async fn list_claims(&self) -> Result<Vec<Claim>, PortError> {
            let mut claims: Vec<Claim> = self.claims.read().await.values().cloned().collect();
            claims.sort_by(|a, b| {
                b.created_at()
                    .cmp(&a.created_at())
                    .then_with(|| b.id().cmp(&a.id()))
            });
            Ok(claims)
        }

        async fn get_limit(&self, manager_id: UserId) -> Result<Option<ClaimLimit>, PortError> {
            Ok(self.limits.read().await.get(&manager_id).cloned())
        }

        async fn put_limit(&self, limit: &ClaimLimit) -> Result<(), PortError> {
            self.limits.write().await.insert(limit.manager_id, limit.clone());
            Ok(())
        }

        async fn list_limits(&self) -> Result<Vec<ClaimLimit>, PortError> {
            let mut limits: Vec<ClaimLimit> = self.limits.read().await.values().cloned().collect();
            limits.sort_by_key(|l| l.manager_id);
            Ok(limits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryClaimRepository;
    use super::*;
    use crate::claim::SubmitClaimRequest;
    use core_kernel::{Actor, Currency, Money};
    use rust_decimal_macros::dec;

    fn claim() -> Claim {
        Claim::submit(SubmitClaimRequest {
            owner: Actor::employee(UserId::new()),
            manager_id: None,
            title: "Taxi".to_string(),
            amount: dec!(300),
            currency: Currency::INR,
            category: "travel".to_string(),
            description: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repository = InMemoryClaimRepository::new();
        let claim = claim();
        repository.insert_claim(&claim).await.unwrap();

        assert_eq!(repository.get_claim(claim.id()).await.unwrap(), claim);
        assert!(matches!(
            repository.insert_claim(&claim).await,
            Err(PortError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_unknown_claim_is_not_found() {
        let repository = InMemoryClaimRepository::new();
        let err = repository.update_claim(&claim()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repository = InMemoryClaimRepository::new();
        let first = claim();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = claim();
        repository.insert_claim(&first).await.unwrap();
        repository.insert_claim(&second).await.unwrap();

        let listed = repository.list_claims().await.unwrap();
        assert_eq!(listed[0].id(), second.id());
        assert_eq!(listed[1].id(), first.id());
    }

    #[tokio::test]
    async fn test_put_limit_overwrites() {
        let manager = UserId::new();
        let repository = InMemoryClaimRepository::with_limits(vec![ClaimLimit::new(
            manager,
            Money::new(dec!(10000), Currency::INR),
        )]);

        repository
            .put_limit(&ClaimLimit::new(manager, Money::new(dec!(12000), Currency::INR)))
            .await
            .unwrap();

        let limit = repository.get_limit(manager).await.unwrap().unwrap();
        assert_eq!(limit.ceiling.amount(), dec!(12000));
        assert_eq!(repository.list_limits().await.unwrap().len(), 1);
    }
}
