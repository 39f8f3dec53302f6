//! Approval Workflow Engine
//!
//! Applies status transitions and encodes the escalation policy:
//!
//! ```text
//! pending ──approve/reject──▶ approved | rejected
//!    │
//!    └──flag──▶ flagged ──approve/reject──▶ approved | rejected
//! ```
//!
//! A manager approving a claim above their ceiling does not approve it: the
//! claim stays in its current status, is marked escalated, and moves to the
//! admin queue. Bulk actions run the same single-claim path for every id.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use core_kernel::{Actor, ClaimId, Money, Role};

use crate::activity::{ActivityEntry, ActivityKind, ActivityLog};
use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;
use crate::limits::LimitPolicy;
use crate::ports::ClaimRepository;

/// Decision applied to one or many claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Approve,
    Reject,
}

/// Result of a successful call into the engine
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The requested status change was applied
    Applied(Claim),
    /// The manager's ceiling was exceeded; claim forwarded to admin
    Escalated { claim: Claim, ceiling: Money },
}

impl TransitionOutcome {
    pub fn claim(&self) -> &Claim {
        match self {
            TransitionOutcome::Applied(claim) => claim,
            TransitionOutcome::Escalated { claim, .. } => claim,
        }
    }

    pub fn into_claim(self) -> Claim {
        match self {
            TransitionOutcome::Applied(claim) => claim,
            TransitionOutcome::Escalated { claim, .. } => claim,
        }
    }

    pub fn is_escalated(&self) -> bool {
        matches!(self, TransitionOutcome::Escalated { .. })
    }
}

/// Per-claim result inside a bulk report
#[derive(Debug)]
pub struct BulkItem {
    pub claim_id: ClaimId,
    pub result: Result<TransitionOutcome, ClaimError>,
}

/// Outcome of `apply_bulk`, one item per requested id, in request order
#[derive(Debug)]
pub struct BulkReport {
    pub action: BulkAction,
    pub items: Vec<BulkItem>,
}

impl BulkReport {
    pub fn applied_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.result, Ok(TransitionOutcome::Applied(_))))
            .count()
    }

    pub fn escalated_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.result, Ok(TransitionOutcome::Escalated { .. })))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_err()).count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.items.iter().all(|i| matches!(i.result, Ok(TransitionOutcome::Applied(_))))
    }
}

pub struct ApprovalEngine {
    repository: Arc<dyn ClaimRepository>,
    policy: LimitPolicy,
    activity: ActivityLog,
    // Serializes read-modify-write cycles against the repository
    transition_lock: Mutex<()>,
}

impl ApprovalEngine {
    pub fn new(repository: Arc<dyn ClaimRepository>, policy: LimitPolicy) -> Self {
        Self {
            repository,
            policy,
            activity: ActivityLog::default(),
            transition_lock: Mutex::new(()),
        }
    }

    /// Approves a pending or flagged claim
    ///
    /// Managers are checked against their ceiling; an amount above it (or in
    /// a different currency) escalates the claim instead of approving it.
    pub async fn approve(&self, claim_id: ClaimId, actor: &Actor) -> Result<TransitionOutcome, ClaimError> {
        let _guard = self.transition_lock.lock().await;
        let mut claim = self.load_decidable(claim_id, actor).await?;
        ensure_transition(&claim, ClaimStatus::Approved)?;

        if actor.role == Role::Manager {
            let limit = self.repository.get_limit(actor.user_id).await?;
            let ceiling = self.policy.effective_ceiling(limit.as_ref());
            let check = self.policy.check(&claim.amount(), &ceiling);

            if check.requires_escalation() {
                claim.escalate();
                self.repository.update_claim(&claim).await?;
                self.activity
                    .record(claim_id, ActivityKind::Escalated, *actor, claim.amount());

                warn!(
                    claim_id = %claim_id,
                    manager = %actor.user_id,
                    amount = %claim.amount(),
                    ceiling = %ceiling,
                    check = ?check,
                    "Claim exceeds manager ceiling, escalated to admin"
                );
                return Ok(TransitionOutcome::Escalated { claim, ceiling });
            }
        }

        self.apply(claim, ClaimStatus::Approved, actor).await
    }

    /// Rejects a pending or flagged claim; no ceiling check
    pub async fn reject(&self, claim_id: ClaimId, actor: &Actor) -> Result<TransitionOutcome, ClaimError> {
        let _guard = self.transition_lock.lock().await;
        let claim = self.load_decidable(claim_id, actor).await?;
        self.apply(claim, ClaimStatus::Rejected, actor).await
    }

    /// Holds a pending claim for review
    pub async fn flag(&self, claim_id: ClaimId, actor: &Actor) -> Result<TransitionOutcome, ClaimError> {
        let _guard = self.transition_lock.lock().await;
        let claim = self.load_decidable(claim_id, actor).await?;
        self.apply(claim, ClaimStatus::Flagged, actor).await
    }

    /// Applies `action` to each id independently
    ///
    /// One claim's failure or escalation never blocks the others; the
    /// report carries a per-id outcome.
    pub async fn apply_bulk(&self, claim_ids: &[ClaimId], action: BulkAction, actor: &Actor) -> BulkReport {
        let mut items = Vec::with_capacity(claim_ids.len());
        for &claim_id in claim_ids {
            let result = match action {
                BulkAction::Approve => self.approve(claim_id, actor).await,
                BulkAction::Reject => self.reject(claim_id, actor).await,
            };
            items.push(BulkItem { claim_id, result });
        }

        let report = BulkReport { action, items };
        info!(
            action = ?action,
            actor = %actor.user_id,
            applied = report.applied_count(),
            escalated = report.escalated_count(),
            failed = report.failed_count(),
            "Bulk action processed"
        );
        report
    }

    /// Most recent decisions, newest first
    pub fn recent_activity(&self, limit: usize) -> Vec<ActivityEntry> {
        self.activity.recent(limit)
    }

    async fn apply(
        &self,
        mut claim: Claim,
        target: ClaimStatus,
        actor: &Actor,
    ) -> Result<TransitionOutcome, ClaimError> {
        let from = claim.status();
        claim.transition(target, actor)?;
        self.repository.update_claim(&claim).await?;

        let kind = match target {
            ClaimStatus::Approved => ActivityKind::Approved,
            ClaimStatus::Rejected => ActivityKind::Rejected,
            _ => ActivityKind::Flagged,
        };
        self.activity.record(claim.id(), kind, *actor, claim.amount());

        info!(
            claim_id = %claim.id(),
            from = %from,
            to = %target,
            actor = %actor.user_id,
            role = %actor.role,
            "Claim transition applied"
        );
        Ok(TransitionOutcome::Applied(claim))
    }

    async fn load_decidable(&self, claim_id: ClaimId, actor: &Actor) -> Result<Claim, ClaimError> {
        let claim = self.repository.get_claim(claim_id).await.map_err(|e| {
            if e.is_not_found() {
                ClaimError::ClaimNotFound(claim_id)
            } else {
                ClaimError::Repository(e)
            }
        })?;

        if !claim.is_decidable_by(actor) {
            return Err(ClaimError::unauthorized(format!(
                "{} {} has no authority over claim {}",
                actor.role, actor.user_id, claim_id
            )));
        }
        Ok(claim)
    }
}

fn ensure_transition(claim: &Claim, target: ClaimStatus) -> Result<(), ClaimError> {
    if claim.status().can_transition_to(target) {
        Ok(())
    } else {
        Err(ClaimError::InvalidState {
            claim_id: claim.id(),
            from: claim.status(),
            to: target,
        })
    }
}
