//! Unit tests for the Money module
//!
//! Tests cover money creation, currency code handling, comparison
//! against ceilings, arithmetic and serialization.

use core_kernel::{Money, Currency, MoneyError};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(2500), Currency::USD);
        assert_eq!(m.amount(), dec!(2500));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_minor_converts_cents_correctly() {
        let m = Money::from_minor(10050, Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_from_minor_handles_jpy_no_decimals() {
        let m = Money::from_minor(10000, Currency::JPY);
        assert_eq!(m.amount(), dec!(10000));
    }

    #[test]
    fn test_zero_is_neither_positive_nor_negative() {
        let m = Money::zero(Currency::INR);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert!(!m.is_negative());
    }
}

mod currency {
    use super::*;

    #[test]
    fn test_arbitrary_directory_codes_are_accepted() {
        let kes = Currency::new("KES").unwrap();
        assert_eq!(kes.code(), "KES");
        assert_eq!(kes.to_string(), "KES");
    }

    #[test]
    fn test_invalid_code_reports_input() {
        let err = Currency::new("₹").unwrap_err();
        assert_eq!(err, MoneyError::InvalidCurrency("₹".to_string()));
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(Currency::USD.decimal_places(), 2);
        assert_eq!(Currency::JPY.decimal_places(), 0);
        assert_eq!(Currency::new("KWD").unwrap().decimal_places(), 3);
    }

    #[test]
    fn test_currencies_order_by_code() {
        let mut codes = vec![Currency::USD, Currency::AUD, Currency::INR];
        codes.sort();
        assert_eq!(codes, vec![Currency::AUD, Currency::INR, Currency::USD]);
    }
}

mod comparison {
    use super::*;

    #[test]
    fn test_amount_equal_to_ceiling_does_not_exceed() {
        let ceiling = Money::new(dec!(10000), Currency::INR);
        let claim = Money::new(dec!(10000), Currency::INR);
        assert_eq!(claim.exceeds(&ceiling), Ok(false));
    }

    #[test]
    fn test_amount_above_ceiling_exceeds() {
        let ceiling = Money::new(dec!(10000), Currency::INR);
        let claim = Money::new(dec!(15000), Currency::INR);
        assert_eq!(claim.exceeds(&ceiling), Ok(true));
    }

    #[test]
    fn test_cross_currency_comparison_is_an_error() {
        let ceiling = Money::new(dec!(10000), Currency::INR);
        let claim = Money::new(dec!(1), Currency::USD);
        assert!(matches!(
            claim.exceeds(&ceiling),
            Err(MoneyError::CurrencyMismatch(_, _))
        ));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_same_currency() {
        let a = Money::new(dec!(1200), Currency::USD);
        let b = Money::new(dec!(800), Currency::USD);
        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(2000));
    }

    #[test]
    fn test_checked_sub_can_go_negative() {
        let a = Money::new(dec!(50), Currency::USD);
        let b = Money::new(dec!(100), Currency::USD);
        assert!(a.checked_sub(&b).unwrap().is_negative());
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let huge = Money::new(rust_decimal::Decimal::MAX, Currency::USD);
        assert_eq!(huge.checked_add(&huge), Err(MoneyError::Overflow));
        let negative = Money::new(rust_decimal::Decimal::MIN, Currency::USD);
        assert_eq!(negative.checked_sub(&huge), Err(MoneyError::Overflow));
    }

    #[test]
    #[should_panic(expected = "Currency mismatch")]
    fn test_add_operator_panics_on_mismatch() {
        let _ = Money::new(dec!(1), Currency::USD) + Money::new(dec!(1), Currency::EUR);
    }

    #[test]
    fn test_round_to_currency_jpy() {
        let m = Money::new(dec!(1234.56), Currency::JPY).round_to_currency();
        assert_eq!(m.amount(), dec!(1235));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_money_display_uses_code_not_symbol() {
        let m = Money::new(dec!(2500), Currency::USD);
        assert_eq!(m.to_string(), "USD 2500.00");
    }

    #[test]
    fn test_money_display_jpy() {
        let m = Money::new(dec!(10000), Currency::JPY);
        assert_eq!(m.to_string(), "JPY 10000");
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_money_json_roundtrip() {
        let m = Money::new(dec!(1200.50), Currency::EUR);
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"EUR\""));
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
