//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than bare `assert_eq!`.

use core_kernel::{Money, Role};
use domain_claims::{BulkReport, Claim, ClaimError, ClaimStatus, TransitionOutcome};

pub fn assert_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status(),
        expected,
        "Claim {} is {}, expected {}",
        claim.id(),
        claim.status(),
        expected
    );
}

/// Asserts the outcome escalated and left the claim pending
pub fn assert_escalated(outcome: &TransitionOutcome) {
    match outcome {
        TransitionOutcome::Escalated { claim, .. } => {
            assert!(claim.is_escalated(), "Escalated outcome without the escalated flag");
            assert_status(claim, ClaimStatus::Pending);
        }
        TransitionOutcome::Applied(claim) => {
            panic!("Expected escalation, claim {} moved to {}", claim.id(), claim.status())
        }
    }
}

/// Asserts the outcome was applied by `role`
pub fn assert_decided_by(outcome: &TransitionOutcome, expected: ClaimStatus, role: Role) {
    match outcome {
        TransitionOutcome::Applied(claim) => {
            assert_status(claim, expected);
            assert_eq!(claim.approver_role(), Some(role), "Unexpected approver role");
        }
        TransitionOutcome::Escalated { claim, ceiling } => {
            panic!("Claim {} escalated over ceiling {}", claim.id(), ceiling)
        }
    }
}

pub fn assert_invalid_state<T: std::fmt::Debug>(result: Result<T, ClaimError>) {
    match result {
        Err(ClaimError::InvalidState { .. }) => {}
        other => panic!("Expected InvalidState, got {:?}", other),
    }
}

pub fn assert_unauthorized<T: std::fmt::Debug>(result: Result<T, ClaimError>) {
    match result {
        Err(ClaimError::Unauthorized(_)) => {}
        other => panic!("Expected Unauthorized, got {:?}", other),
    }
}

/// Asserts the counts of a bulk report and that they cover every item
pub fn assert_bulk_counts(report: &BulkReport, applied: usize, escalated: usize, failed: usize) {
    assert_eq!(
        (report.applied_count(), report.escalated_count(), report.failed_count()),
        (applied, escalated, failed),
        "Bulk counts (applied, escalated, failed) mismatch"
    );
    assert_eq!(applied + escalated + failed, report.items.len());
}

pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        (actual.currency(), actual.amount()),
        (expected.currency(), expected.amount()),
        "Money mismatch: actual={}, expected={}",
        actual,
        expected
    );
}
