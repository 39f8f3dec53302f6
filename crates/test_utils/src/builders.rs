//! Test Data Builders
//!
//! Builders let a test name only the fields it cares about. The
//! [`ApprovalHarness`] wires a store and engine over one in-memory
//! repository the way the server does.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Actor, ClaimId, Currency, Money, UserId};
use domain_claims::{
    ApprovalEngine, Claim, ClaimCategory, ClaimLimit, ClaimRepository, ClaimStore, InMemoryClaimRepository,
    LimitPolicy, SubmitClaimRequest,
};

use crate::fixtures::{MoneyFixtures, OrgFixture};

/// Builder for claim submissions
pub struct TestClaimBuilder {
    owner: Actor,
    manager_id: Option<UserId>,
    title: String,
    amount: Decimal,
    currency: Currency,
    category: String,
    description: Option<String>,
}

impl TestClaimBuilder {
    pub fn new(owner: Actor) -> Self {
        Self {
            owner,
            manager_id: None,
            title: "Client dinner".to_string(),
            amount: dec!(1200),
            currency: Currency::INR,
            category: ClaimCategory::Meals.as_str().to_string(),
            description: None,
        }
    }

    pub fn with_manager(mut self, manager_id: UserId) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> SubmitClaimRequest {
        SubmitClaimRequest {
            owner: self.owner,
            manager_id: self.manager_id,
            title: self.title,
            amount: self.amount,
            currency: self.currency,
            category: self.category,
            description: self.description,
        }
    }
}

/// Store, engine and org sharing one repository
pub struct ApprovalHarness {
    pub org: OrgFixture,
    pub repository: Arc<dyn ClaimRepository>,
    pub store: ClaimStore,
    pub engine: ApprovalEngine,
}

impl ApprovalHarness {
    /// Default ceiling for every manager
    pub async fn new() -> Self {
        Self::build(OrgFixture::new(), None).await
    }

    /// Gives the org's manager an explicit ceiling in INR
    pub async fn with_manager_ceiling(ceiling: Decimal) -> Self {
        Self::build(OrgFixture::new(), Some(ceiling)).await
    }

    async fn build(org: OrgFixture, ceiling: Option<Decimal>) -> Self {
        let limits = ceiling
            .map(|c| vec![ClaimLimit::new(org.manager.user_id, MoneyFixtures::inr(c))])
            .unwrap_or_default();
        let repository: Arc<dyn ClaimRepository> = Arc::new(InMemoryClaimRepository::with_limits(limits));
        let policy = LimitPolicy::new(MoneyFixtures::default_ceiling());

        Self {
            store: ClaimStore::new(repository.clone(), policy),
            engine: ApprovalEngine::new(repository.clone(), policy),
            repository,
            org,
        }
    }

    /// A claim builder for the org's employee, routed to the manager
    pub fn claim(&self) -> TestClaimBuilder {
        TestClaimBuilder::new(self.org.employee).with_manager(self.org.manager.user_id)
    }

    pub async fn submit(&self, builder: TestClaimBuilder) -> Claim {
        self.store.submit(builder.build()).await.unwrap()
    }

    /// Submits an INR claim of `amount` and returns its id
    pub async fn submit_amount(&self, amount: Decimal) -> ClaimId {
        self.submit(self.claim().with_amount(amount)).await.id()
    }

    pub async fn reload(&self, id: ClaimId) -> Claim {
        self.repository.get_claim(id).await.unwrap()
    }

    pub async fn ceiling(&self) -> Money {
        self.store.ceiling_for(self.org.manager.user_id).await.unwrap()
    }
}
