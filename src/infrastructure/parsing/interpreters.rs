//! Field interpreters for captured listing text
//!
//! Every interpreter is a pure function of its input. Apart from the price,
//! a value that is not understood yields a [`FieldDiagnostic`] and the caller
//! falls back to a documented default.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::FieldDiagnostic;
use crate::domain::product::Measure;

static PRICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]*)\.([0-9]+)$").expect("valid price pattern"));

static QUANTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ca\. )?([0-9]+)(?:\.([0-9]+))? ?([A-Za-z]+)\.?$").expect("valid quantity pattern")
});

static COMBINATION_DISCOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+) voor ([0-9]+),([0-9]+)$").expect("valid combination discount pattern")
});

static VALIDITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Geldig van ([0-9]{1,2})-([0-9]{1,2}) t/m ([0-9]{1,2})-([0-9]{1,2})$")
        .expect("valid validity pattern")
});

/// Pack size tokens and their canonical measure and multiplier
pub const UNIT_TOKENS: &[(&str, Measure, u64)] = &[
    ("g", Measure::Milligrams, 1_000),
    ("gr", Measure::Milligrams, 1_000),
    ("gram", Measure::Milligrams, 1_000),
    ("kg", Measure::Milligrams, 1_000_000),
    ("kilo", Measure::Milligrams, 1_000_000),
    ("ml", Measure::Milliliters, 1),
    ("cl", Measure::Milliliters, 100),
    ("lt", Measure::Milliliters, 1_000),
    ("liter", Measure::Milliliters, 1_000),
];

/// A validity window is assumed to start at most this long after retrieval;
/// a later start date belongs to the previous year.
const MAX_DAYS_AHEAD: i64 = 183;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity {
    pub amount: u64,
    pub measure: Measure,
}

impl Quantity {
    /// Fallback when no pack size is known: one unit
    pub const SINGLE_UNIT: Self = Self {
        amount: 1,
        measure: Measure::Units,
    };
}

/// "N for P" combination discount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinationDiscount {
    /// Number of units sold together
    pub amount: u64,
    /// Price of the whole bundle in cents
    pub price: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl ValidityWindow {
    /// Start of the window, midnight UTC
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.from.and_time(NaiveTime::MIN).and_utc()
    }
}

/// Cents from a whole part and a fractional part of one or two digits.
///
/// A single fractional digit means tenths: `("1", "5")` is 150.
fn to_cents(whole: &str, fraction: &str) -> Option<u64> {
    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction: u64 = match fraction.len() {
        1 => fraction.parse::<u64>().ok()? * 10,
        2 => fraction.parse().ok()?,
        _ => return None,
    };
    whole.checked_mul(100)?.checked_add(fraction)
}

/// Interpret a `whole.fraction` price as cents
pub fn parse_price(text: &str) -> Option<u64> {
    let caps = PRICE_PATTERN.captures(text)?;
    to_cents(&caps[1], &caps[2])
}

/// Interpret a pack size such as `"ca. 500 gram"` or `"1.5 kg"`
pub fn interpret_unit(text: &str) -> Result<Quantity, FieldDiagnostic> {
    let caps = QUANTITY_PATTERN
        .captures(text)
        .ok_or_else(|| FieldDiagnostic::new("unit", text))?;

    let token = &caps[3];
    let (measure, multiplier) = UNIT_TOKENS
        .iter()
        .find(|(name, _, _)| *name == token)
        .map(|(_, measure, multiplier)| (*measure, *multiplier))
        .ok_or_else(|| FieldDiagnostic::new("measure_type", token))?;

    let fraction = caps.get(2).map_or("", |m| m.as_str());
    let digits = format!("{}{}", &caps[1], fraction);
    let amount = digits
        .parse::<u128>()
        .ok()
        .and_then(|n| n.checked_mul(u128::from(multiplier)))
        .and_then(|n| {
            let scale = 10u128.checked_pow(u32::try_from(fraction.len()).ok()?)?;
            u64::try_from(n / scale).ok()
        })
        .filter(|amount| *amount > 0)
        .ok_or_else(|| FieldDiagnostic::new("unit", text))?;

    Ok(Quantity { amount, measure })
}

/// Interpret a promotion badge such as `"2 voor 3,50"`
pub fn interpret_badge(text: &str) -> Result<CombinationDiscount, FieldDiagnostic> {
    COMBINATION_DISCOUNT_PATTERN
        .captures(text)
        .and_then(|caps| {
            let amount: u64 = caps[1].parse().ok().filter(|n| *n > 0)?;
            let price = to_cents(&caps[2], &caps[3])?;
            Some(CombinationDiscount { amount, price })
        })
        .ok_or_else(|| FieldDiagnostic::new("badge", text))
}

/// Interpret `"Geldig van d-m t/m d-m"` relative to the retrieval time
pub fn interpret_validity(
    text: &str,
    retrieved_on: DateTime<Utc>,
) -> Result<ValidityWindow, FieldDiagnostic> {
    let unclear = || FieldDiagnostic::new("valid_from_to", text);
    let caps = VALIDITY_PATTERN.captures(text).ok_or_else(unclear)?;

    let number = |i: usize| caps[i].parse::<u32>().ok();
    let (from_day, from_month) = (number(1).ok_or_else(unclear)?, number(2).ok_or_else(unclear)?);
    let (until_day, until_month) = (number(3).ok_or_else(unclear)?, number(4).ok_or_else(unclear)?);

    let today = retrieved_on.date_naive();
    let latest_start = today + Duration::days(MAX_DAYS_AHEAD);
    // 29-2 may only exist in the previous year
    let from = NaiveDate::from_ymd_opt(today.year(), from_month, from_day)
        .filter(|from| *from <= latest_start)
        .or_else(|| NaiveDate::from_ymd_opt(today.year() - 1, from_month, from_day))
        .ok_or_else(unclear)?;

    let mut until = NaiveDate::from_ymd_opt(from.year(), until_month, until_day).ok_or_else(unclear)?;
    if until < from {
        until = NaiveDate::from_ymd_opt(from.year() + 1, until_month, until_day).ok_or_else(unclear)?;
    }

    Ok(ValidityWindow { from, until })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rstest::rstest;

    fn retrieved(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 14, 30, 0).unwrap()
    }

    #[rstest]
    #[case("12.34", Some(1234))]
    #[case("0.05", Some(5))]
    #[case("1.5", Some(150))]
    #[case(".99", Some(99))]
    #[case("1.999", None)]
    #[case("12", None)]
    #[case("abc", None)]
    #[case("", None)]
    #[case("99999999999999999999.00", None)]
    fn test_parse_price(#[case] text: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_price(text), expected);
    }

    #[rstest]
    #[case("500 gram", 500_000, Measure::Milligrams)]
    #[case("500 g", 500_000, Measure::Milligrams)]
    #[case("ca. 250 gr", 250_000, Measure::Milligrams)]
    #[case("1.5 kg", 1_500_000, Measure::Milligrams)]
    #[case("2 kilo", 2_000_000, Measure::Milligrams)]
    #[case("750 ml", 750, Measure::Milliliters)]
    #[case("33 cl", 3_300, Measure::Milliliters)]
    #[case("1.5 lt", 1_500, Measure::Milliliters)]
    #[case("1 liter.", 1_000, Measure::Milliliters)]
    #[case("400g", 400_000, Measure::Milligrams)]
    fn test_interpret_unit(#[case] text: &str, #[case] amount: u64, #[case] measure: Measure) {
        assert_eq!(interpret_unit(text), Ok(Quantity { amount, measure }));
    }

    #[test]
    fn test_unrecognized_unit() {
        let diag = interpret_unit("xyz").unwrap_err();
        assert_eq!(diag.to_string(), "Unclear 'unit' with value 'xyz'");

        let diag = interpret_unit("6 stuks").unwrap_err();
        assert_eq!(diag.to_string(), "Unclear 'measure_type' with value 'stuks'");
    }

    #[rstest]
    #[case("0 g")]
    #[case("0.0001 g")]
    #[case("ca. 0.5 ml")]
    fn test_zero_amount_is_unclear(#[case] text: &str) {
        assert_eq!(interpret_unit(text), Err(FieldDiagnostic::new("unit", text)));
    }

    #[test]
    fn test_interpret_badge() {
        assert_eq!(
            interpret_badge("2 voor 3,50"),
            Ok(CombinationDiscount { amount: 2, price: 350 })
        );
        assert_eq!(
            interpret_badge("3 voor 5,5"),
            Ok(CombinationDiscount { amount: 3, price: 550 })
        );
        assert_eq!(
            interpret_badge("free gift").unwrap_err().to_string(),
            "Unclear 'badge' with value 'free gift'"
        );
        assert!(interpret_badge("0 voor 1,00").is_err());
    }

    #[test]
    fn test_interpret_validity() {
        let window = interpret_validity("Geldig van 3-6 t/m 9-6", retrieved(2024, 6, 4)).unwrap();
        assert_eq!(window.from, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(window.until, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        assert_eq!(window.starts_at(), Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_validity_across_new_year() {
        let window = interpret_validity("Geldig van 29-12 t/m 4-1", retrieved(2025, 1, 2)).unwrap();
        assert_eq!(window.from, NaiveDate::from_ymd_opt(2024, 12, 29).unwrap());
        assert_eq!(window.until, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
    }

    #[test]
    fn test_leap_day_from_previous_year() {
        let window = interpret_validity("Geldig van 29-2 t/m 6-3", retrieved(2025, 1, 10)).unwrap();
        assert_eq!(window.from, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(window.until, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());

        let window = interpret_validity("Geldig van 29-2 t/m 6-3", retrieved(2024, 2, 27)).unwrap();
        assert_eq!(window.from, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_unrecognized_validity() {
        let now = retrieved(2024, 6, 4);
        assert!(interpret_validity("Alleen vandaag", now).is_err());
        assert_eq!(
            interpret_validity("Geldig van 31-2 t/m 3-3", now)
                .unwrap_err()
                .to_string(),
            "Unclear 'valid_from_to' with value 'Geldig van 31-2 t/m 3-3'"
        );
    }

    proptest! {
        #[test]
        fn interpreters_are_pure(text in "\\PC{0,24}") {
            let now = retrieved(2024, 6, 4);
            prop_assert_eq!(parse_price(&text), parse_price(&text));
            prop_assert_eq!(interpret_unit(&text), interpret_unit(&text));
            prop_assert_eq!(interpret_badge(&text), interpret_badge(&text));
            prop_assert_eq!(interpret_validity(&text, now), interpret_validity(&text, now));
        }

        #[test]
        fn well_formed_prices_round_trip(whole in 0u64..100_000, cents in 0u64..100) {
            let text = format!("{whole}.{cents:02}");
            prop_assert_eq!(parse_price(&text), Some(whole * 100 + cents));
        }
    }
}
