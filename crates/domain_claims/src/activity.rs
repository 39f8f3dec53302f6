//! Approval activity feed
//!
//! A bounded, newest-first log of decisions made by the approval engine.
//! Admin dashboards read it as their notification stream.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ActivityId, Actor, ClaimId, Money};

/// What happened to a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Approved,
    Rejected,
    Flagged,
    Escalated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: ActivityId,
    pub claim_id: ClaimId,
    pub kind: ActivityKind,
    pub actor: Actor,
    pub amount: Money,
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ActivityLog {
    capacity: usize,
    entries: Mutex<VecDeque<ActivityEntry>>,
}

impl ActivityLog {
    pub const DEFAULT_CAPACITY: usize = 200;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub fn record(&self, claim_id: ClaimId, kind: ActivityKind, actor: Actor, amount: Money) {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.push_front(ActivityEntry {
            id: ActivityId::new_v7(),
            claim_id,
            kind,
            actor,
            amount,
            at: Utc::now(),
        });
        entries.truncate(self.capacity);
    }

    /// Returns up to `limit` entries, newest first
    pub fn recent(&self, limit: usize) -> Vec<ActivityEntry> {
        let entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.iter().take(limit).cloned().collect()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Currency, UserId};
    use rust_decimal_macros::dec;

    #[test]
    fn test_log_is_bounded_and_newest_first() {
        let log = ActivityLog::new(2);
        let actor = Actor::manager(UserId::new());
        let amount = Money::new(dec!(5000), Currency::INR);
        let ids: Vec<ClaimId> = (0..3).map(|_| ClaimId::new()).collect();

        for id in &ids {
            log.record(*id, ActivityKind::Approved, actor, amount);
        }

        let recent = log.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].claim_id, ids[2]);
        assert_eq!(recent[1].claim_id, ids[1]);
    }
}
