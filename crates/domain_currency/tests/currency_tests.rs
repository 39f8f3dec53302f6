//! Integration tests for domain_currency

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money, TaskState};
use domain_currency::{
    CountryRecord, CurrencyDirectoryPort, CurrencyResolver, CurrencyTable, DirectoryError, StaticDirectory,
};

fn usd_table() -> CurrencyTable {
    CurrencyTable::from_countries(&[CountryRecord::new("United States", [("USD", "United States dollar", "$")])])
}

mod formatting_tests {
    use super::*;

    #[test]
    fn test_format_with_loaded_table() {
        let resolver = CurrencyResolver::with_table(Currency::USD, usd_table());
        assert_eq!(resolver.format_amount(dec!(2500), "USD"), "$2,500");
    }

    #[test]
    fn test_unknown_code_echoes_code() {
        let resolver = CurrencyResolver::with_table(Currency::USD, usd_table());
        assert_eq!(resolver.symbol("XYZ"), "XYZ");
        assert_eq!(resolver.format_amount(dec!(12000), "INR"), "INR12,000");
    }

    #[test]
    fn test_empty_symbol_echoes_code() {
        let table = CurrencyTable::from_countries(&[CountryRecord::new("Nowhere", [("NWH", "Nowhere mark", "")])]);
        let resolver = CurrencyResolver::with_table(Currency::USD, table);
        assert_eq!(resolver.symbol("NWH"), "NWH");
    }

    #[test]
    fn test_format_money_keeps_original_units() {
        let resolver = CurrencyResolver::with_table(Currency::USD, usd_table());
        let amount = Money::new(dec!(1234.5), Currency::USD);
        assert_eq!(resolver.format_money(&amount), "$1,234.5");
        assert_eq!(amount.amount(), dec!(1234.5));
    }
}

mod loading_tests {
    use super::*;

    #[tokio::test]
    async fn test_load_installs_sorted_table() {
        let resolver = CurrencyResolver::new(Currency::USD);
        let loaded = resolver.load(&StaticDirectory::common()).await.unwrap();

        assert_eq!(loaded, 6);
        assert!(resolver.is_loaded());
        assert_eq!(resolver.symbol("INR"), "₹");

        let codes: Vec<String> = resolver.currencies().into_iter().map(|c| c.code).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }

    #[tokio::test]
    async fn test_failed_load_degrades_to_raw_codes() {
        let resolver = CurrencyResolver::new(Currency::USD);
        let err = resolver.load(&StaticDirectory::unavailable()).await.unwrap_err();

        assert!(matches!(err, DirectoryError::DirectoryUnavailable(_)));
        assert!(!resolver.is_loaded());
        assert_eq!(resolver.format_amount(dec!(2500), "USD"), "USD2,500");
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_table() {
        let resolver = CurrencyResolver::with_table(Currency::USD, usd_table());
        assert!(resolver.load(&StaticDirectory::unavailable()).await.is_err());
        assert_eq!(resolver.symbol("USD"), "$");
    }

    #[tokio::test]
    async fn test_empty_directory_is_reported() {
        let resolver = CurrencyResolver::new(Currency::USD);
        let err = resolver.load(&StaticDirectory::new(Vec::new())).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Empty));
    }

    #[tokio::test]
    async fn test_background_load_resolves() {
        let resolver = Arc::new(CurrencyResolver::new(Currency::USD));
        let port: Arc<dyn CurrencyDirectoryPort> = Arc::new(StaticDirectory::common());

        let task = resolver.spawn_load(port);
        assert_eq!(task.wait().await, TaskState::Resolved(6));
        assert_eq!(resolver.format_amount(dec!(2500), "USD"), "$2,500");
    }

    #[tokio::test]
    async fn test_background_load_failure_is_rejected_state() {
        let resolver = Arc::new(CurrencyResolver::new(Currency::USD));
        let port: Arc<dyn CurrencyDirectoryPort> = Arc::new(StaticDirectory::unavailable());

        let task = resolver.spawn_load(port);
        assert!(matches!(task.wait().await, TaskState::Rejected(_)));
        assert!(!resolver.is_loaded());
    }
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn formatting_is_deterministic_and_grouped(units in 0i64..10_000_000_000i64) {
            let resolver = CurrencyResolver::with_table(Currency::USD, usd_table());
            let amount = Decimal::from(units);

            let first = resolver.format_amount(amount, "USD");
            prop_assert_eq!(&first, &resolver.format_amount(amount, "USD"));
            prop_assert!(first.starts_with('$'));

            let digits: String = first[1..].chars().filter(|c| *c != ',').collect();
            prop_assert_eq!(digits, units.to_string());
            for group in first[1..].split(',').skip(1) {
                prop_assert_eq!(group.len(), 3);
            }
        }
    }
}
