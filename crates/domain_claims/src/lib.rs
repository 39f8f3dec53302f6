//! Claims Domain
//!
//! Expense claims, manager approval ceilings, and the approval workflow.
//!
//! # Claim Lifecycle
//!
//! ```text
//! pending -> approved | rejected
//! pending -> flagged -> approved | rejected
//! ```
//!
//! Claims are created through [`ClaimStore`] and change status only through
//! [`ApprovalEngine`]. A manager approval above the manager's ceiling marks
//! the claim escalated and hands it to the admin queue.

pub mod activity;
pub mod claim;
pub mod error;
pub mod limits;
pub mod ports;
pub mod store;
pub mod summary;
pub mod workflow;

pub use activity::{ActivityEntry, ActivityKind, ActivityLog};
pub use claim::{Claim, ClaimCategory, ClaimStatus, SubmitClaimRequest};
pub use error::ClaimError;
pub use limits::{CeilingCheck, ClaimLimit, LimitPolicy};
pub use ports::{memory::InMemoryClaimRepository, ClaimRepository};
pub use store::ClaimStore;
pub use summary::ClaimSummary;
pub use workflow::{ApprovalEngine, BulkAction, BulkItem, BulkReport, TransitionOutcome};
