//! API configuration

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use core_kernel::{Currency, Money, MoneyError};

/// API configuration
///
/// Every field can be overridden with an `API_`-prefixed environment
/// variable, e.g. `API_PORT=9000` or `API_DEFAULT_MANAGER_CEILING=7500`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds; sessions end with their token
    pub jwt_expiration_secs: u64,
    /// Idle allowance for a bootstrap flow between steps
    pub flow_ttl_secs: u64,
    /// Allowance for a flow parked at signup approval
    pub signup_ttl_secs: u64,
    /// How often expired flows and sessions are swept
    pub sweep_interval_secs: u64,
    /// Log level
    pub log_level: String,
    /// Country/currency directory endpoint
    pub directory_url: String,
    pub directory_timeout_secs: u64,
    /// Display currency for non-admins without a nationality
    pub fallback_currency: String,
    /// Ceiling for managers without an explicit limit
    pub default_manager_ceiling: Decimal,
    pub ceiling_currency: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            flow_ttl_secs: domain_identity::DEFAULT_FLOW_TTL_SECS as u64,
            signup_ttl_secs: domain_identity::DEFAULT_APPROVAL_TTL_SECS as u64,
            sweep_interval_secs: 60,
            log_level: "info".to_string(),
            directory_url: domain_currency::adapters::rest_countries::DEFAULT_DIRECTORY_URL.to_string(),
            directory_timeout_secs: 10,
            fallback_currency: "USD".to_string(),
            default_manager_ceiling: dec!(10000),
            ceiling_currency: "INR".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment, on top of the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expiration_secs", defaults.jwt_expiration_secs as i64)?
            .set_default("flow_ttl_secs", defaults.flow_ttl_secs as i64)?
            .set_default("signup_ttl_secs", defaults.signup_ttl_secs as i64)?
            .set_default("sweep_interval_secs", defaults.sweep_interval_secs as i64)?
            .set_default("log_level", defaults.log_level)?
            .set_default("directory_url", defaults.directory_url)?
            .set_default("directory_timeout_secs", defaults.directory_timeout_secs as i64)?
            .set_default("fallback_currency", defaults.fallback_currency)?
            .set_default("default_manager_ceiling", defaults.default_manager_ceiling.to_string())?
            .set_default("ceiling_currency", defaults.ceiling_currency)?
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn directory_timeout(&self) -> Duration {
        Duration::from_secs(self.directory_timeout_secs)
    }

    pub fn flow_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.flow_ttl_secs as i64)
    }

    pub fn signup_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.signup_ttl_secs as i64)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    pub fn fallback_currency(&self) -> Result<Currency, MoneyError> {
        Currency::new(&self.fallback_currency)
    }

    pub fn default_ceiling(&self) -> Result<Money, MoneyError> {
        let currency = Currency::new(&self.ceiling_currency)?;
        if self.default_manager_ceiling <= Decimal::ZERO {
            return Err(MoneyError::InvalidAmount(format!(
                "default manager ceiling must be positive, got {}",
                self.default_manager_ceiling
            )));
        }
        Ok(Money::new(self.default_manager_ceiling, currency))
    }
}
