//! Property-Based Test Generators
//!
//! Proptest strategies that produce values inside the domain's rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, Role};
use domain_claims::{BulkAction, ClaimCategory};

pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::JPY),
        Just(Currency::INR),
        Just(Currency::AUD),
        Just(Currency::CAD),
        Just(Currency::SGD),
    ]
}

/// Positive amounts with up to two decimal places
pub fn claim_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..5_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

pub fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Employee), Just(Role::Manager), Just(Role::Admin)]
}

pub fn category_strategy() -> impl Strategy<Value = ClaimCategory> {
    proptest::sample::select(ClaimCategory::ALL.to_vec())
}

pub fn bulk_action_strategy() -> impl Strategy<Value = BulkAction> {
    prop_oneof![Just(BulkAction::Approve), Just(BulkAction::Reject)]
}

/// Firm codes for `role`, in either case
pub fn firm_code_strategy(role: Role) -> impl Strategy<Value = String> {
    let prefix = match role {
        Role::Employee => "[Ee]",
        Role::Manager => "[Mm]",
        Role::Admin => "[Aa]",
    };
    proptest::string::string_regex(&format!("{}[0-9]{{1,5}}", prefix)).expect("valid regex")
}

/// Names accepted by the credential rules
pub fn display_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,10}( [A-Z][a-z]{1,12})?"
}

/// Passwords strictly longer than eight characters
pub fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#]{9,24}"
}
