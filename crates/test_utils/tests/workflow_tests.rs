//! Cross-crate workflows: sign in, submit, decide, format

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Role};
use domain_claims::{BulkAction, ClaimStatus};
use domain_currency::{CurrencyDirectoryPort, CurrencyResolver};
use domain_identity::{BootstrapFlow, BootstrapStep, Route, UserDirectory};
use test_utils::*;

#[tokio::test]
async fn test_signed_in_employee_claim_reaches_manager() {
    let harness = ApprovalHarness::new().await;
    let directory = UserDirectory::with_users(harness.org.accounts()).unwrap();
    let resolver = CurrencyResolver::new(Currency::USD);

    let mut flow = BootstrapFlow::new();
    flow.login(&FormFixtures::login("Arjun Mehta", "E7"), &directory).unwrap();
    flow.select_role(Role::Employee).unwrap();
    let session = flow
        .role_login(&FormFixtures::role_login("e7"), &directory, |role, nationality| {
            resolver.default_currency(role, nationality)
        })
        .unwrap();
    assert_eq!(flow.step(), BootstrapStep::Complete { role: Role::Employee });
    assert_eq!(session.landing_route(), Route::Dashboard(Role::Employee));

    let claim = harness
        .submit(TestClaimBuilder::new(session.actor()).with_manager(harness.org.manager.user_id))
        .await;
    let queue = harness.store.list_for(&harness.org.manager).await.unwrap();
    assert!(queue.iter().any(|c| c.id() == claim.id()));

    let outcome = harness.engine.approve(claim.id(), &harness.org.manager).await.unwrap();
    assert_decided_by(&outcome, ClaimStatus::Approved, Role::Manager);
}

#[tokio::test]
async fn test_escalation_then_admin_decision() {
    let harness = ApprovalHarness::with_manager_ceiling(dec!(10000)).await;
    let id = harness.submit_amount(dec!(15000)).await;

    let outcome = harness.engine.approve(id, &harness.org.manager).await.unwrap();
    assert_escalated(&outcome);

    // Gone from the manager's queue, waiting for the admin
    let manager_queue = harness.store.list_for(&harness.org.manager).await.unwrap();
    assert!(manager_queue.iter().all(|c| c.id() != id));
    let admin_queue = harness.store.list_for(&harness.org.admin).await.unwrap();
    assert!(admin_queue.iter().any(|c| c.id() == id));

    let outcome = harness.engine.approve(id, &harness.org.admin).await.unwrap();
    assert_decided_by(&outcome, ClaimStatus::Approved, Role::Admin);
    assert_invalid_state(harness.engine.reject(id, &harness.org.admin).await);
}

#[tokio::test]
async fn test_default_ceiling_applies_without_explicit_limit() {
    let harness = ApprovalHarness::new().await;
    assert_money_eq(&harness.ceiling().await, &MoneyFixtures::default_ceiling());

    let at_ceiling = harness.submit_amount(dec!(10000)).await;
    let outcome = harness.engine.approve(at_ceiling, &harness.org.manager).await.unwrap();
    assert_decided_by(&outcome, ClaimStatus::Approved, Role::Manager);
}

#[tokio::test]
async fn test_bulk_mixes_outcomes() {
    let harness = ApprovalHarness::with_manager_ceiling(dec!(5000)).await;
    let small = harness.submit_amount(dec!(800)).await;
    let large = harness.submit_amount(dec!(9000)).await;
    let done = harness.submit_amount(dec!(100)).await;
    harness.engine.reject(done, &harness.org.manager).await.unwrap();

    let report = harness
        .engine
        .apply_bulk(&[small, large, done], BulkAction::Approve, &harness.org.manager)
        .await;

    assert_bulk_counts(&report, 1, 1, 1);
    assert_status(&harness.reload(small).await, ClaimStatus::Approved);
    assert_status(&harness.reload(large).await, ClaimStatus::Pending);
    assert_status(&harness.reload(done).await, ClaimStatus::Rejected);
}

#[tokio::test]
async fn test_other_employee_cannot_decide() {
    let harness = ApprovalHarness::new().await;
    let id = harness.submit_amount(dec!(500)).await;
    assert_unauthorized(harness.engine.approve(id, &harness.org.other_employee).await);
}

#[tokio::test]
async fn test_claim_amount_formats_after_directory_load() {
    let harness = ApprovalHarness::new().await;
    let claim = harness
        .submit(harness.claim().with_amount(dec!(2500)).with_currency(Currency::USD))
        .await;

    let resolver = Arc::new(CurrencyResolver::new(Currency::USD));
    assert_eq!(resolver.format_money(&claim.amount()), "USD2,500");

    let directory: Arc<dyn CurrencyDirectoryPort> = Arc::new(sample_directory());
    let task = resolver.spawn_load(directory);
    task.wait().await;

    assert!(resolver.is_loaded());
    assert_eq!(resolver.format_money(&claim.amount()), "$2,500");
}

#[test]
fn test_random_signup_passes_validation() {
    let directory = UserDirectory::new();
    for _ in 0..20 {
        let form = FormFixtures::random_signup("E1");
        let request = directory.submit_signup(&form).unwrap();
        assert_eq!(request.role, Role::Employee);
    }
}

proptest! {
    #[test]
    fn prop_firm_codes_map_to_their_role(
        (role, code) in role_strategy().prop_flat_map(|r| (Just(r), firm_code_strategy(r))),
    ) {
        prop_assert_eq!(Role::from_firm_code(&code), Some(role));
        // Only the prefix matters
        prop_assert_eq!(Role::from_firm_code(&format!("{}999", &code[..1])), Some(role));
    }

    #[test]
    fn prop_generated_credentials_are_valid(
        name in display_name_strategy(),
        password in password_strategy(),
        code in firm_code_strategy(Role::Manager),
    ) {
        let form = domain_identity::LoginForm { name, password, firm_code: code };
        prop_assert!(domain_identity::CredentialValidator::validate_login(&form).is_valid);
    }

    #[test]
    fn prop_submitted_claims_start_pending(
        amount in claim_amount_strategy(),
        currency in currency_strategy(),
        category in category_strategy(),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let harness = ApprovalHarness::new().await;
            let claim = harness
                .submit(
                    harness
                        .claim()
                        .with_amount(amount)
                        .with_currency(currency)
                        .with_category(category.as_str()),
                )
                .await;
            assert_status(&claim, ClaimStatus::Pending);
            assert!(!claim.is_escalated());
        });
    }
}
