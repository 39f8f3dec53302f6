//! Pre-built Test Fixtures
//!
//! Ready-to-use data for claims, users and forms. Values are predictable
//! unless the function name says otherwise.

use chrono::{DateTime, TimeZone, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Words;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rust_decimal_macros::dec;

use core_kernel::{Actor, Currency, Money, UserId};
use domain_currency::{CountryRecord, StaticDirectory};
use domain_identity::{LoginForm, RoleLoginForm, SignupForm, UserAccount};

/// Password that satisfies the length rule
pub const VALID_PASSWORD: &str = "correct-horse";

pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The default manager ceiling used by the server
    pub fn default_ceiling() -> Money {
        Money::new(dec!(10000), Currency::INR)
    }

    pub fn inr(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    pub fn usd_2500() -> Money {
        Money::new(dec!(2500), Currency::USD)
    }
}

/// A manager with two reports and an admin
pub struct OrgFixture {
    pub manager: Actor,
    pub employee: Actor,
    pub other_employee: Actor,
    pub admin: Actor,
}

impl OrgFixture {
    pub fn new() -> Self {
        Self {
            manager: Actor::manager(UserId::new()),
            employee: Actor::employee(UserId::new()),
            other_employee: Actor::employee(UserId::new()),
            admin: Actor::admin(UserId::new()),
        }
    }

    /// The same org as directory accounts
    pub fn accounts(&self) -> Vec<UserAccount> {
        let mut manager = UserAccount::new("Maya Patel", self.manager.role);
        manager.id = self.manager.user_id;
        let mut employee = UserAccount::new("Arjun Mehta", self.employee.role).with_manager(self.manager.user_id);
        employee.id = self.employee.user_id;
        let mut other = UserAccount::new("Lena Fischer", self.other_employee.role)
            .with_manager(self.manager.user_id)
            .with_nationality(Currency::EUR);
        other.id = self.other_employee.user_id;
        let mut admin = UserAccount::new("Finance Admin", self.admin.role);
        admin.id = self.admin.user_id;
        vec![manager, employee, other, admin]
    }
}

impl Default for OrgFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FormFixtures;

impl FormFixtures {
    pub fn login(name: &str, firm_code: &str) -> LoginForm {
        LoginForm {
            name: name.to_string(),
            password: VALID_PASSWORD.to_string(),
            firm_code: firm_code.to_string(),
        }
    }

    pub fn role_login(code: &str) -> RoleLoginForm {
        RoleLoginForm {
            code: code.to_string(),
            password: VALID_PASSWORD.to_string(),
        }
    }

    /// A valid signup with a random applicant
    pub fn random_signup(firm_code: &str) -> SignupForm {
        SignupForm {
            name: fake_person_name(),
            number: Some("+91 98765-43210".to_string()),
            email: SafeEmail().fake(),
            firm_code: firm_code.to_string(),
            nationality: Some("INR".to_string()),
        }
    }
}

/// A display name made of letters and one space
pub fn fake_person_name() -> String {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    let clean = |s: String| s.chars().filter(|c| c.is_alphabetic()).collect::<String>();
    format!("{} {}", clean(first), clean(last))
}

/// A short random claim title
pub fn fake_claim_title() -> String {
    let words: Vec<String> = Words(2..5).fake();
    words.join(" ")
}

pub struct TemporalFixtures;

impl TemporalFixtures {
    pub fn quarter_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
    }
}

/// A directory with a handful of countries, including duplicate currencies
pub fn sample_directory() -> StaticDirectory {
    StaticDirectory::new(vec![
        CountryRecord::new("India", [("INR", "Indian rupee", "₹")]),
        CountryRecord::new("United States", [("USD", "United States dollar", "$")]),
        CountryRecord::new("Ecuador", [("USD", "United States dollar", "$")]),
        CountryRecord::new("Germany", [("EUR", "Euro", "€")]),
        CountryRecord::new("Singapore", [("SGD", "Singapore dollar", "$")]),
    ])
}
