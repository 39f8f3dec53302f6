//! Claims DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money, Role, UserId};
use domain_claims::{BulkAction, BulkReport, Claim, ClaimCategory, ClaimStatus, TransitionOutcome};
use domain_currency::CurrencyResolver;

#[derive(Debug, Deserialize)]
pub struct SubmitClaimBody {
    pub title: String,
    pub amount: Decimal,
    /// Defaults to the caller's display currency
    #[serde(default)]
    pub currency: Option<String>,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: ClaimId,
    pub owner_role: Role,
    pub owner_id: UserId,
    pub manager_id: Option<UserId>,
    pub title: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub formatted_amount: String,
    pub category: ClaimCategory,
    pub status: ClaimStatus,
    pub escalated: bool,
    pub approver_role: Option<Role>,
    pub approver_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClaimResponse {
    pub fn new(claim: &Claim, currency: &CurrencyResolver) -> Self {
        Self {
            id: claim.id(),
            owner_role: claim.owner_role(),
            owner_id: claim.owner_id(),
            manager_id: claim.manager_id(),
            title: claim.title().to_string(),
            description: claim.description().map(str::to_string),
            amount: claim.amount().amount(),
            currency: claim.amount().currency().to_string(),
            formatted_amount: currency.format_money(&claim.amount()),
            category: claim.category(),
            status: claim.status(),
            escalated: claim.is_escalated(),
            approver_role: claim.approver_role(),
            approver_id: claim.approver_id(),
            created_at: claim.created_at(),
            updated_at: claim.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoneyResponse {
    pub amount: Decimal,
    pub currency: String,
    pub formatted: String,
}

impl MoneyResponse {
    pub fn new(money: &Money, currency: &CurrencyResolver) -> Self {
        Self {
            amount: money.amount(),
            currency: money.currency().to_string(),
            formatted: currency.format_money(money),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Applied,
    Escalated,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub outcome: OutcomeKind,
    pub claim: ClaimResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<MoneyResponse>,
}

impl TransitionResponse {
    pub fn new(outcome: &TransitionOutcome, currency: &CurrencyResolver) -> Self {
        match outcome {
            TransitionOutcome::Applied(claim) => Self {
                outcome: OutcomeKind::Applied,
                claim: ClaimResponse::new(claim, currency),
                ceiling: None,
            },
            TransitionOutcome::Escalated { claim, ceiling } => Self {
                outcome: OutcomeKind::Escalated,
                claim: ClaimResponse::new(claim, currency),
                ceiling: Some(MoneyResponse::new(ceiling, currency)),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub claim_ids: Vec<ClaimId>,
    pub action: BulkAction,
}

#[derive(Debug, Serialize)]
pub struct BulkItemResponse {
    pub claim_id: ClaimId,
    pub outcome: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ClaimStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub action: BulkAction,
    pub applied: usize,
    pub escalated: usize,
    pub failed: usize,
    pub results: Vec<BulkItemResponse>,
}

impl From<&BulkReport> for BulkResponse {
    fn from(report: &BulkReport) -> Self {
        let results = report
            .items
            .iter()
            .map(|item| match &item.result {
                Ok(outcome) => BulkItemResponse {
                    claim_id: item.claim_id,
                    outcome: if outcome.is_escalated() {
                        OutcomeKind::Escalated
                    } else {
                        OutcomeKind::Applied
                    },
                    status: Some(outcome.claim().status()),
                    error: None,
                    message: None,
                },
                Err(e) => BulkItemResponse {
                    claim_id: item.claim_id,
                    outcome: OutcomeKind::Failed,
                    status: None,
                    error: Some(e.kind().to_string()),
                    message: Some(e.to_string()),
                },
            })
            .collect();

        Self {
            action: report.action,
            applied: report.applied_count(),
            escalated: report.escalated_count(),
            failed: report.failed_count(),
            results,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(default = "default_activity_limit")]
    pub limit: usize,
}

fn default_activity_limit() -> usize {
    20
}
