//! Fixed directory for offline use and tests

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};

use crate::directory::CountryRecord;
use crate::ports::CurrencyDirectoryPort;

#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    countries: Vec<CountryRecord>,
    unavailable: bool,
}

impl StaticDirectory {
    pub fn new(countries: Vec<CountryRecord>) -> Self {
        Self {
            countries,
            unavailable: false,
        }
    }

    /// A directory whose every fetch fails
    pub fn unavailable() -> Self {
        Self {
            countries: Vec::new(),
            unavailable: true,
        }
    }

    /// A small table covering the currencies seeded users rely on
    pub fn common() -> Self {
        Self::new(vec![
            CountryRecord::new("India", [("INR", "Indian rupee", "₹")]),
            CountryRecord::new("United States", [("USD", "United States dollar", "$")]),
            CountryRecord::new("United Kingdom", [("GBP", "British pound", "£")]),
            CountryRecord::new("Germany", [("EUR", "Euro", "€")]),
            CountryRecord::new("Japan", [("JPY", "Japanese yen", "¥")]),
            CountryRecord::new("Singapore", [("SGD", "Singapore dollar", "$")]),
        ])
    }
}

impl DomainPort for StaticDirectory {}

#[async_trait]
impl CurrencyDirectoryPort for StaticDirectory {
    async fn fetch_countries(&self) -> Result<Vec<CountryRecord>, PortError> {
        if self.unavailable {
            return Err(PortError::ServiceUnavailable {
                service: "static-directory".to_string(),
            });
        }
        Ok(self.countries.clone())
    }
}

#[async_trait]
impl HealthCheckable for StaticDirectory {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("static-directory")
    }
}
