//! Currency directory port

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::directory::CountryRecord;

/// Read-only source of country/currency records
#[async_trait]
pub trait CurrencyDirectoryPort: DomainPort + HealthCheckable {
    async fn fetch_countries(&self) -> Result<Vec<CountryRecord>, PortError>;
}
