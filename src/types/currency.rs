use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::errors::AmountInputError;

const DECIMAL_PLACES: u32 = 2;
const CURRENCY_SYMBOL: &str = "$";

/// Magnitudes below this render as zero.
fn display_threshold() -> Decimal {
    Decimal::new(99, 2)
}

/// Collapses floating residue left by the ledger (e.g. `0.0000001`) to an exact zero.
pub fn round_for_display(value: Decimal) -> Decimal {
    if value.abs() < display_threshold() {
        Decimal::ZERO
    } else {
        value
    }
}

/// Renders a value as an Argentine peso string: `$ 1.234,56`, `-$ 50,00`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };

    let mut magnitude = rounded.abs();
    magnitude.rescale(DECIMAL_PLACES);

    let text = magnitude.to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}{CURRENCY_SYMBOL} {},{fraction}", group_thousands(integer))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    grouped
}

/// Parses an operator-typed amount expressed in cents without separators.
///
/// Typing `150075` means `1500.75`. Any `.` or `,` the operator left in is
/// dropped instead of being read as a decimal separator, so `1.500,75` is
/// the same entry. The sign never comes from the text: `negative` carries it.
pub fn parse_minor_units(input: &str, negative: bool) -> Result<Decimal, AmountInputError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix(CURRENCY_SYMBOL).unwrap_or(trimmed);

    let mut digits = String::with_capacity(trimmed.len());

    for character in trimmed.chars() {
        match character {
            '0'..='9' => digits.push(character),
            '.' | ',' | ' ' => {}
            other => return Err(AmountInputError::InvalidCharacter(other)),
        }
    }

    if digits.is_empty() {
        return Err(AmountInputError::Empty);
    }

    let cents: i64 = digits.parse()?;
    let amount = Decimal::new(cents, DECIMAL_PLACES);

    Ok(if negative { -amount } else { amount })
}
