//! Claim Entity Store
//!
//! Owns the canonical collection of claims and manager ceilings behind the
//! [`ClaimRepository`] port. Status changes are not exposed here; they go
//! through [`crate::workflow::ApprovalEngine`].

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use core_kernel::{Actor, ClaimId, Currency, Money, Role, UserId};

use crate::claim::{Claim, SubmitClaimRequest};
use crate::error::ClaimError;
use crate::limits::{ClaimLimit, LimitPolicy};
use crate::ports::ClaimRepository;
use crate::summary::ClaimSummary;

pub struct ClaimStore {
    repository: Arc<dyn ClaimRepository>,
    policy: LimitPolicy,
}

impl ClaimStore {
    pub fn new(repository: Arc<dyn ClaimRepository>, policy: LimitPolicy) -> Self {
        Self { repository, policy }
    }

    /// Validates and stores a new pending claim
    ///
    /// # Errors
    ///
    /// `ClaimError::Validation` if the amount is not positive, the category
    /// is unknown, the title is empty, or the owner cannot submit claims.
    #[instrument(skip(self, request), fields(owner = %request.owner.user_id, role = %request.owner.role))]
    pub async fn submit(&self, request: SubmitClaimRequest) -> Result<Claim, ClaimError> {
        let claim = Claim::submit(request)?;
        self.repository.insert_claim(&claim).await?;

        info!(
            claim_id = %claim.id(),
            amount = %claim.amount(),
            category = %claim.category(),
            "Claim submitted"
        );
        Ok(claim)
    }

    /// Retrieves a claim visible to `actor`
    ///
    /// Claims outside the actor's view (working list or history) are
    /// reported as not found.
    pub async fn get(&self, actor: &Actor, id: ClaimId) -> Result<Claim, ClaimError> {
        let claim = self.load(id).await?;
        if claim.is_visible_to(actor) || claim.is_in_history_of(actor) {
            Ok(claim)
        } else {
            Err(ClaimError::ClaimNotFound(id))
        }
    }

    /// Lists the claims `actor` owns or holds approval authority over
    ///
    /// - employee: own claims
    /// - manager: own claims plus the team's open, non-escalated claims
    /// - admin: manager claims, escalated claims, unassigned employee claims
    pub async fn list_for(&self, actor: &Actor) -> Result<Vec<Claim>, ClaimError> {
        let claims = self.repository.list_claims().await?;
        Ok(claims
            .into_iter()
            .filter(|c| c.is_visible_to(actor))
            .collect())
    }

    /// Lists terminal claims in `actor`'s history, newest first
    pub async fn history_for(&self, actor: &Actor) -> Result<Vec<Claim>, ClaimError> {
        let claims = self.repository.list_claims().await?;
        Ok(claims
            .into_iter()
            .filter(|c| c.is_in_history_of(actor))
            .collect())
    }

    /// Dashboard statistics over the actor's working list and history
    pub async fn summary_for(&self, actor: &Actor) -> Result<ClaimSummary, ClaimError> {
        let claims = self.repository.list_claims().await?;
        let visible: Vec<&Claim> = claims
            .iter()
            .filter(|c| c.is_visible_to(actor) || c.is_in_history_of(actor))
            .collect();
        Ok(ClaimSummary::from_claims(visible))
    }

    /// Overwrites a manager's approval ceiling (admin only)
    #[instrument(skip(self, actor), fields(admin = %actor.user_id))]
    pub async fn set_limit(
        &self,
        actor: &Actor,
        manager_id: UserId,
        ceiling: Money,
    ) -> Result<ClaimLimit, ClaimError> {
        if actor.role != Role::Admin {
            return Err(ClaimError::unauthorized("Only admins can set claim limits"));
        }
        if !ceiling.is_positive() {
            return Err(ClaimError::validation("Ceiling must be greater than zero"));
        }

        let limit = ClaimLimit {
            manager_id,
            ceiling,
            updated_by: Some(actor.user_id),
            updated_at: Utc::now(),
        };
        self.repository.put_limit(&limit).await?;

        info!(manager_id = %manager_id, ceiling = %ceiling, "Claim limit updated");
        Ok(limit)
    }

    /// Gives `manager_id` the default ceiling amount in `currency`
    ///
    /// Leaves an existing limit untouched. Seeded limits carry no
    /// `updated_by`, which marks them as defaults rather than admin edits.
    pub async fn seed_default_limit(&self, manager_id: UserId, currency: Currency) -> Result<ClaimLimit, ClaimError> {
        if let Some(existing) = self.repository.get_limit(manager_id).await? {
            return Ok(existing);
        }
        let limit = ClaimLimit::new(
            manager_id,
            Money::new(self.policy.default_ceiling().amount(), currency),
        );
        self.repository.put_limit(&limit).await?;
        info!(manager_id = %manager_id, ceiling = %limit.ceiling, "Default claim limit seeded");
        Ok(limit)
    }

    pub async fn limits(&self) -> Result<Vec<ClaimLimit>, ClaimError> {
        Ok(self.repository.list_limits().await?)
    }

    /// The ceiling the engine will apply to `manager_id`
    pub async fn ceiling_for(&self, manager_id: UserId) -> Result<Money, ClaimError> {
        let limit = self.repository.get_limit(manager_id).await?;
        Ok(self.policy.effective_ceiling(limit.as_ref()))
    }

    async fn load(&self, id: ClaimId) -> Result<Claim, ClaimError> {
        self.repository.get_claim(id).await.map_err(|e| {
            if e.is_not_found() {
                ClaimError::ClaimNotFound(id)
            } else {
                ClaimError::Repository(e)
            }
        })
    }
}
