//! Manager approval ceilings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Money, UserId};

/// The maximum amount a manager may approve unilaterally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimLimit {
    pub manager_id: UserId,
    pub ceiling: Money,
    pub updated_by: Option<UserId>,
    pub updated_at: DateTime<Utc>,
}

impl ClaimLimit {
    pub fn new(manager_id: UserId, ceiling: Money) -> Self {
        Self {
            manager_id,
            ceiling,
            updated_by: None,
            updated_at: Utc::now(),
        }
    }
}

/// Result of checking a claim amount against a ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeilingCheck {
    WithinCeiling,
    ExceedsCeiling,
    /// Amounts are never converted, so a ceiling in another currency
    /// cannot vouch for the claim
    CurrencyMismatch,
}

impl CeilingCheck {
    pub fn requires_escalation(&self) -> bool {
        !matches!(self, CeilingCheck::WithinCeiling)
    }
}

/// Ceiling rules shared by the store and the approval engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    default_ceiling: Money,
}

impl LimitPolicy {
    /// `default_ceiling` applies to managers without an explicit limit
    pub fn new(default_ceiling: Money) -> Self {
        Self { default_ceiling }
    }

    pub fn default_ceiling(&self) -> Money {
        self.default_ceiling
    }

    /// Picks the explicit limit if there is one
    pub fn effective_ceiling(&self, limit: Option<&ClaimLimit>) -> Money {
        limit.map(|l| l.ceiling).unwrap_or(self.default_ceiling)
    }

    pub fn check(&self, amount: &Money, ceiling: &Money) -> CeilingCheck {
        match amount.exceeds(ceiling) {
            Ok(false) => CeilingCheck::WithinCeiling,
            Ok(true) => CeilingCheck::ExceedsCeiling,
            Err(_) => CeilingCheck::CurrencyMismatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn policy() -> LimitPolicy {
        LimitPolicy::new(Money::new(dec!(10000), Currency::INR))
    }

    #[test]
    fn test_default_applies_without_explicit_limit() {
        assert_eq!(policy().effective_ceiling(None).amount(), dec!(10000));

        let limit = ClaimLimit::new(UserId::new(), Money::new(dec!(15000), Currency::INR));
        assert_eq!(policy().effective_ceiling(Some(&limit)).amount(), dec!(15000));
    }

    #[test]
    fn test_check_outcomes() {
        let p = policy();
        let ceiling = p.default_ceiling();

        assert_eq!(
            p.check(&Money::new(dec!(10000), Currency::INR), &ceiling),
            CeilingCheck::WithinCeiling
        );
        assert_eq!(
            p.check(&Money::new(dec!(15000), Currency::INR), &ceiling),
            CeilingCheck::ExceedsCeiling
        );
        let mismatch = p.check(&Money::new(dec!(5), Currency::USD), &ceiling);
        assert_eq!(mismatch, CeilingCheck::CurrencyMismatch);
        assert!(mismatch.requires_escalation());
    }
}
