//! Display formatting shared by the report and PDF consumers.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Money, Percent};

pub const CURRENCY_CODE: &str = "AED";

/// Whole dirhams with thousands separators; negatives in accounting
/// parentheses. `1234567` → `AED 1,234,567`, `-1234567` → `(AED 1,234,567)`.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let grouped = group_thousands(&rounded.abs().trunc().to_string());
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("({CURRENCY_CODE} {grouped})")
    } else {
        format!("{CURRENCY_CODE} {grouped}")
    }
}

/// Two decimal places with a percent sign. `6.5` → `6.50%`.
pub fn format_percent(value: Percent) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}%")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Convenience for callers holding a plain multiple (e.g. DSCR `1.18x`).
pub fn format_multiple(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}x")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_positive() {
        assert_eq!(format_currency(dec!(1234567)), "AED 1,234,567");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1234567)), "(AED 1,234,567)");
    }

    #[test]
    fn test_format_currency_small_and_zero() {
        assert_eq!(format_currency(dec!(0)), "AED 0");
        assert_eq!(format_currency(dec!(999)), "AED 999");
        assert_eq!(format_currency(dec!(1000)), "AED 1,000");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(2.5)), "AED 3");
        assert_eq!(format_currency(dec!(-0.4)), "AED 0");
        assert_eq!(format_currency(dec!(-1500.5)), "(AED 1,501)");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(6.5)), "6.50%");
        assert_eq!(format_percent(dec!(5.525)), "5.53%");
        assert_eq!(format_percent(dec!(-2)), "-2.00%");
    }

    #[test]
    fn test_format_multiple() {
        assert_eq!(format_multiple(dec!(1.182)), "1.18x");
    }
}
