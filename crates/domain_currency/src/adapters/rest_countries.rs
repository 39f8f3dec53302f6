//! REST Countries adapter
//!
//! Issues a single `GET {base_url}?fields=name,currencies` with no
//! authentication. There is no retry; a failed fetch is reported once and the
//! resolver stays on raw codes.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};

use crate::directory::CountryRecord;
use crate::ports::CurrencyDirectoryPort;

pub const DEFAULT_DIRECTORY_URL: &str = "https://restcountries.com/v3.1/all";

const SERVICE: &str = "rest-countries";

#[derive(Debug, Clone)]
pub struct RestCountriesAdapter {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RestCountriesAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Connection {
                message: "failed to build directory HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: "fetch_countries".to_string(),
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else {
            PortError::Connection {
                message: format!("directory request to {} failed", self.base_url),
                source: Some(Box::new(error)),
            }
        }
    }
}

impl DomainPort for RestCountriesAdapter {}

#[async_trait]
impl CurrencyDirectoryPort for RestCountriesAdapter {
    async fn fetch_countries(&self) -> Result<Vec<CountryRecord>, PortError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("fields", "name,currencies")])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %self.base_url, "Directory returned an error status");
            return Err(PortError::ServiceUnavailable {
                service: format!("{} ({})", SERVICE, response.status()),
            });
        }

        let countries: Vec<CountryRecord> = response.json().await.map_err(|e| PortError::Transformation {
            message: format!("failed to decode directory response: {e}"),
        })?;

        debug!(countries = countries.len(), "Directory fetched");
        Ok(countries)
    }
}

#[async_trait]
impl HealthCheckable for RestCountriesAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let result = self
            .client
            .get(&self.base_url)
            .query(&[("fields", "name")])
            .send()
            .await;

        let (status, message) = match result {
            Ok(response) if response.status().is_success() => (AdapterHealth::Healthy, None),
            Ok(response) => (AdapterHealth::Degraded, Some(format!("status {}", response.status()))),
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };

        HealthCheckResult {
            adapter_id: SERVICE.to_string(),
            status,
            latency_ms: started.elapsed().as_millis() as u64,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_directory_is_connection_error() {
        let adapter = RestCountriesAdapter::new("http://127.0.0.1:9/v3.1/all", Duration::from_millis(500)).unwrap();
        let err = adapter.fetch_countries().await.unwrap_err();
        assert!(err.is_transient());
    }
}
