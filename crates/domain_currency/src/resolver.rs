//! Currency Resolver
//!
//! Picks a user's default display currency and renders amounts as
//! `symbol + grouped number`. Symbols come from a [`CurrencyTable`] loaded
//! from the directory; until it loads (or when it never does) the raw code
//! stands in for the symbol. Amounts are never converted.

use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use core_kernel::{Currency, Money, PendingTask, Role};

use crate::directory::{CurrencyInfo, CurrencyTable};
use crate::error::DirectoryError;
use crate::ports::CurrencyDirectoryPort;

/// Most fraction digits shown by `format_amount`
const MAX_FRACTION_DIGITS: u32 = 3;

#[derive(Debug)]
pub struct CurrencyResolver {
    fallback: Currency,
    table: RwLock<Option<Arc<CurrencyTable>>>,
}

impl CurrencyResolver {
    /// `fallback` is used for non-admins with no stored nationality
    pub fn new(fallback: Currency) -> Self {
        Self {
            fallback,
            table: RwLock::new(None),
        }
    }

    /// A resolver with an already-loaded table
    pub fn with_table(fallback: Currency, table: CurrencyTable) -> Self {
        let resolver = Self::new(fallback);
        resolver.install(table);
        resolver
    }

    pub fn fallback(&self) -> Currency {
        self.fallback
    }

    /// Admins always default to INR; everyone else to their nationality
    /// currency, then the fallback
    pub fn default_currency(&self, role: Role, nationality: Option<Currency>) -> Currency {
        if role == Role::Admin {
            return Currency::INR;
        }
        nationality.unwrap_or(self.fallback)
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Replaces the current table
    pub fn install(&self, table: CurrencyTable) {
        let mut slot = self.table.write().unwrap_or_else(|p| p.into_inner());
        *slot = Some(Arc::new(table));
    }

    /// Fetches the directory and installs the derived table
    ///
    /// On failure the resolver keeps its previous state and the error is
    /// only logged.
    #[instrument(skip(self, port))]
    pub async fn load(&self, port: &dyn CurrencyDirectoryPort) -> Result<usize, DirectoryError> {
        let countries = match port.fetch_countries().await {
            Ok(countries) => countries,
            Err(e) => {
                let error = DirectoryError::from(e);
                warn!(error = %error, "Falling back to raw currency codes");
                return Err(error);
            }
        };

        let table = CurrencyTable::from_countries(&countries);
        if table.is_empty() {
            warn!(countries = countries.len(), "Directory listed no currencies");
            return Err(DirectoryError::Empty);
        }

        let loaded = table.len();
        self.install(table);
        info!(currencies = loaded, "Currency table loaded");
        Ok(loaded)
    }

    /// Runs [`load`](Self::load) in the background
    pub fn spawn_load(self: &Arc<Self>, port: Arc<dyn CurrencyDirectoryPort>) -> PendingTask<usize> {
        let resolver = Arc::clone(self);
        PendingTask::spawn("currency-directory", async move { resolver.load(port.as_ref()).await })
    }

    /// Display symbol for `code`, or the code itself if none is known
    pub fn symbol(&self, code: &str) -> String {
        self.snapshot()
            .and_then(|table| {
                table
                    .get(code)
                    .map(|c| c.symbol.clone())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| code.to_string())
    }

    /// Formats `amount` as symbol followed by a comma-grouped number
    pub fn format_amount(&self, amount: Decimal, code: &str) -> String {
        format!("{}{}", self.symbol(code), group_digits(amount))
    }

    pub fn format_money(&self, money: &Money) -> String {
        self.format_amount(money.amount(), money.currency().code())
    }

    /// Currencies known to the loaded table, ordered by code
    pub fn currencies(&self) -> Vec<CurrencyInfo> {
        self.snapshot()
            .map(|table| table.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn snapshot(&self) -> Option<Arc<CurrencyTable>> {
        self.table.read().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

/// Renders `2500.50` as `2,500.5`
fn group_digits(amount: Decimal) -> String {
    let rounded = amount.round_dp(MAX_FRACTION_DIGITS).normalize();
    let text = rounded.abs().to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(dec!(0)), "0");
        assert_eq!(group_digits(dec!(999)), "999");
        assert_eq!(group_digits(dec!(1000)), "1,000");
        assert_eq!(group_digits(dec!(2500.00)), "2,500");
        assert_eq!(group_digits(dec!(1234567.5)), "1,234,567.5");
        assert_eq!(group_digits(dec!(12.34567)), "12.346");
        assert_eq!(group_digits(dec!(-15000)), "-15,000");
    }

    #[test]
    fn test_default_currency_order() {
        let resolver = CurrencyResolver::new(Currency::USD);
        assert_eq!(resolver.default_currency(Role::Admin, Some(Currency::EUR)), Currency::INR);
        assert_eq!(resolver.default_currency(Role::Employee, Some(Currency::EUR)), Currency::EUR);
        assert_eq!(resolver.default_currency(Role::Manager, None), Currency::USD);
    }

    #[test]
    fn test_unloaded_resolver_echoes_code() {
        let resolver = CurrencyResolver::new(Currency::USD);
        assert!(!resolver.is_loaded());
        assert_eq!(resolver.format_amount(dec!(2500), "USD"), "USD2,500");
        assert!(resolver.currencies().is_empty());
    }
}
