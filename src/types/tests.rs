use super::{AmountInputError, format_currency, format_ledger_date, parse_ledger_date, parse_minor_units, round_for_display};
use anyhow::{Result, anyhow};
use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_currency_formats_with_argentine_separators() -> Result<()> {
    let test_cases = vec![
        ("0", "$ 0,00"),
        ("1", "$ 1,00"),
        ("1234.5", "$ 1.234,50"),
        ("1234567.891", "$ 1.234.567,89"),
        ("999", "$ 999,00"),
        ("-50", "-$ 50,00"),
        ("-1000000", "-$ 1.000.000,00"),
        ("0.005", "$ 0,01"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(format_currency(Decimal::from_str(input)?), expected, "input {input}");
    }

    Ok(())
}

#[test]
fn test_currency_never_renders_negative_zero() -> Result<()> {
    assert_eq!(format_currency(Decimal::from_str("-0.001")?), "$ 0,00");

    Ok(())
}

#[test]
fn test_display_rounding_collapses_values_below_threshold() -> Result<()> {
    assert_eq!(round_for_display(Decimal::from_str("0.98")?), Decimal::ZERO);
    assert_eq!(round_for_display(Decimal::from_str("-0.5")?), Decimal::ZERO);
    assert_eq!(round_for_display(Decimal::from_str("0.0000001")?), Decimal::ZERO);
    assert_eq!(round_for_display(Decimal::from_str("0.99")?), Decimal::from_str("0.99")?);
    assert_eq!(round_for_display(Decimal::from_str("-1.5")?), Decimal::from_str("-1.5")?);

    Ok(())
}

#[test]
fn test_minor_units_are_divided_by_one_hundred() -> Result<()> {
    assert_eq!(parse_minor_units("150075", false)?, Decimal::from_str("1500.75")?);
    assert_eq!(parse_minor_units("1.500,75", false)?, Decimal::from_str("1500.75")?);
    assert_eq!(parse_minor_units("$ 500", false)?, Decimal::from_str("5.00")?);
    assert_eq!(parse_minor_units("  7  ", false)?, Decimal::from_str("0.07")?);

    Ok(())
}

#[test]
fn test_minor_units_take_sign_from_flag_only() -> Result<()> {
    assert_eq!(parse_minor_units("10000", true)?, Decimal::from_str("-100")?);
    assert!(matches!(parse_minor_units("-10000", false), Err(AmountInputError::InvalidCharacter('-'))));

    Ok(())
}

#[test]
fn test_minor_units_reject_malformed_input() {
    assert!(matches!(parse_minor_units("", false), Err(AmountInputError::Empty)));
    assert!(matches!(parse_minor_units(" ., ", false), Err(AmountInputError::Empty)));
    assert!(matches!(parse_minor_units("12a3", false), Err(AmountInputError::InvalidCharacter('a'))));
    assert!(matches!(parse_minor_units("99999999999999999999999", false), Err(AmountInputError::ParseInt(_))));
}

#[test]
fn test_ledger_date_is_anchored_at_noon_utc_minus_three() -> Result<()> {
    let date = parse_ledger_date("2024-01-10T23:59:59.000Z").ok_or_else(|| anyhow!("date did not parse"))?;

    assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 10));
    assert_eq!(date.hour(), 12);
    assert_eq!(date.offset().utc_minus_local(), 3 * 3600);

    Ok(())
}

#[test]
fn test_ledger_date_formats_as_day_month_year() {
    assert_eq!(format_ledger_date("2024-01-10T00:00:00"), "10/01/2024");
    assert_eq!(format_ledger_date("2023-12-31"), "31/12/2023");
    assert_eq!(format_ledger_date("2024-03-05 08:15:00"), "05/03/2024");
}

#[test]
fn test_unparseable_ledger_dates_are_returned_unchanged() {
    assert_eq!(format_ledger_date(""), "");
    assert_eq!(format_ledger_date("not a date"), "not a date");
    assert_eq!(format_ledger_date("2024-13-40"), "2024-13-40");
    assert!(parse_ledger_date("31/12/2023").is_none());
}
