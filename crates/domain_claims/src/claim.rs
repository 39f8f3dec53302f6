//! Claim aggregate

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{Actor, ClaimId, Currency, Money, Role, UserId, MONEY_SCALE};
use crate::error::ClaimError;

/// Largest amount a single claim may carry
pub const MAX_CLAIM_AMOUNT: Decimal = dec!(1_000_000_000_000);

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    /// Submitted, awaiting a decision
    Pending,
    /// Approved (terminal)
    Approved,
    /// Rejected (terminal)
    Rejected,
    /// Held for review; still needs a terminal decision
    Flagged,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Flagged => "flagged",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }

    /// Returns true if a decision (approve/reject) can still be made
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, target),
            (Pending, Approved) |
            (Pending, Rejected) |
            (Pending, Flagged) |
            (Flagged, Approved) |
            (Flagged, Rejected)
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimCategory {
    Travel,
    Meals,
    Supplies,
    Events,
    Other,
}

impl ClaimCategory {
    pub const ALL: [ClaimCategory; 5] = [
        ClaimCategory::Travel,
        ClaimCategory::Meals,
        ClaimCategory::Supplies,
        ClaimCategory::Events,
        ClaimCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimCategory::Travel => "travel",
            ClaimCategory::Meals => "meals",
            ClaimCategory::Supplies => "supplies",
            ClaimCategory::Events => "events",
            ClaimCategory::Other => "other",
        }
    }
}

impl fmt::Display for ClaimCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimCategory {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ClaimCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| ClaimError::validation(format!("Unknown category: {}", s.trim())))
    }
}

/// Input for submitting a new claim
///
/// Category arrives as free text so that unknown values surface as
/// validation errors rather than deserialization failures.
#[derive(Debug, Clone)]
pub struct SubmitClaimRequest {
    pub owner: Actor,
    /// Reviewing manager for employee claims; ignored for manager claims
    pub manager_id: Option<UserId>,
    pub title: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub category: String,
    pub description: Option<String>,
}

/// An expense claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    id: ClaimId,
    owner_role: Role,
    owner_id: UserId,
    manager_id: Option<UserId>,
    title: String,
    description: Option<String>,
    amount: Money,
    category: ClaimCategory,
    status: ClaimStatus,
    escalated: bool,
    approver_role: Option<Role>,
    approver_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Claim {
    /// Validates a submission and creates a pending claim
    pub fn submit(request: SubmitClaimRequest) -> Result<Self, ClaimError> {
        if !request.owner.role.can_submit() {
            return Err(ClaimError::validation(format!(
                "Role {} cannot submit claims",
                request.owner.role
            )));
        }

        let title = request.title.trim();
        if title.is_empty() {
            return Err(ClaimError::validation("Title is required"));
        }
        if request.category.trim().is_empty() {
            return Err(ClaimError::validation("Category is required"));
        }
        let category: ClaimCategory = request.category.parse()?;

        if request.amount.normalize().scale() > MONEY_SCALE {
            return Err(ClaimError::validation(format!(
                "Amount supports at most {} decimal places",
                MONEY_SCALE
            )));
        }
        let amount = Money::new(request.amount, request.currency);
        if !amount.is_positive() {
            return Err(ClaimError::validation("Amount must be greater than zero"));
        }
        if amount.amount() > MAX_CLAIM_AMOUNT {
            return Err(ClaimError::validation(format!(
                "Amount cannot exceed {}",
                MAX_CLAIM_AMOUNT
            )));
        }

        let manager_id = match request.owner.role {
            Role::Employee => request.manager_id,
            _ => None,
        };
        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let now = Utc::now();
        Ok(Self {
            id: ClaimId::new_v7(),
            owner_role: request.owner.role,
            owner_id: request.owner.user_id,
            manager_id,
            title: title.to_string(),
            description,
            amount,
            category,
            status: ClaimStatus::Pending,
            escalated: false,
            approver_role: None,
            approver_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> ClaimId {
        self.id
    }

    pub fn owner_role(&self) -> Role {
        self.owner_role
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn manager_id(&self) -> Option<UserId> {
        self.manager_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn category(&self) -> ClaimCategory {
        self.category
    }

    pub fn status(&self) -> ClaimStatus {
        self.status
    }

    pub fn is_escalated(&self) -> bool {
        self.escalated
    }

    pub fn approver_role(&self) -> Option<Role> {
        self.approver_role
    }

    pub fn approver_id(&self) -> Option<UserId> {
        self.approver_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// True for claims an admin arbitrates: manager claims, escalated
    /// claims, and employee claims with no reviewing manager
    pub fn is_in_admin_queue(&self) -> bool {
        self.owner_role == Role::Manager || self.escalated || self.manager_id.is_none()
    }

    /// Returns true if `actor` holds decision authority over this claim
    pub fn is_decidable_by(&self, actor: &Actor) -> bool {
        match actor.role {
            Role::Employee => false,
            Role::Manager => {
                self.owner_role == Role::Employee
                    && self.manager_id == Some(actor.user_id)
                    && !self.escalated
            }
            Role::Admin => self.is_in_admin_queue(),
        }
    }

    /// Returns true if this claim appears in `actor`'s working list
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        match actor.role {
            Role::Employee => self.owner_id == actor.user_id,
            Role::Manager => {
                self.owner_id == actor.user_id
                    || (self.is_decidable_by(actor) && self.status.is_open())
            }
            Role::Admin => self.is_in_admin_queue(),
        }
    }

    /// Returns true if this terminal claim belongs in `actor`'s history
    pub fn is_in_history_of(&self, actor: &Actor) -> bool {
        if !self.status.is_terminal() {
            return false;
        }
        match actor.role {
            Role::Employee => self.owner_id == actor.user_id,
            Role::Manager => {
                self.owner_id == actor.user_id || self.manager_id == Some(actor.user_id)
            }
            Role::Admin => self.approver_role == Some(Role::Admin),
        }
    }

    /// Moves the claim to `target`, recording the deciding actor
    pub(crate) fn transition(&mut self, target: ClaimStatus, actor: &Actor) -> Result<(), ClaimError> {
        if !self.status.can_transition_to(target) {
            return Err(ClaimError::InvalidState {
                claim_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.approver_role = Some(actor.role);
        self.approver_id = Some(actor.user_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Forwards the claim to the admin queue; never undone
    pub(crate) fn escalate(&mut self) {
        if !self.escalated {
            self.escalated = true;
            self.updated_at = Utc::now();
        }
    }
}
