//! Dashboard statistics over a set of claims

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{Currency, Money};
use crate::claim::{Claim, ClaimStatus};

/// Counts by status plus per-currency totals
///
/// Totals are kept per currency because amounts are never converted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimSummary {
    pub total_claims: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub flagged: usize,
    pub escalated: usize,
    pub total_amount: BTreeMap<Currency, Money>,
    pub approved_amount: BTreeMap<Currency, Money>,
}

impl ClaimSummary {
    pub fn from_claims<'a>(claims: impl IntoIterator<Item = &'a Claim>) -> Self {
        let mut summary = Self::default();
        for claim in claims {
            summary.total_claims += 1;
            match claim.status() {
                ClaimStatus::Pending => summary.pending += 1,
                ClaimStatus::Approved => summary.approved += 1,
                ClaimStatus::Rejected => summary.rejected += 1,
                ClaimStatus::Flagged => summary.flagged += 1,
            }
            if claim.is_escalated() {
                summary.escalated += 1;
            }

            accumulate(&mut summary.total_amount, claim.amount());
            if claim.status() == ClaimStatus::Approved {
                accumulate(&mut summary.approved_amount, claim.amount());
            }
        }
        summary
    }
}

/// Adds `amount` to its currency's total, pinning the total at the maximum
/// representable amount instead of overflowing
fn accumulate(totals: &mut BTreeMap<Currency, Money>, amount: Money) {
    let currency = amount.currency();
    let entry = totals.entry(currency).or_insert_with(|| Money::zero(currency));
    *entry = entry.checked_add(&amount).unwrap_or_else(|_| {
        warn!(%currency, "Claim total saturated");
        Money::new(Decimal::MAX, currency)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let mut totals = BTreeMap::new();
        let huge = Money::new(dec!(50_000_000_000_000_000_000_000_000_000), Currency::USD);
        for _ in 0..3 {
            accumulate(&mut totals, huge);
        }
        accumulate(&mut totals, Money::new(dec!(10), Currency::INR));

        assert_eq!(totals[&Currency::USD].amount(), Decimal::MAX);
        assert_eq!(totals[&Currency::INR].amount(), dec!(10));
    }
}
