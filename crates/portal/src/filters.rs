//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a decimal amount as Brazilian currency.
///
/// Usage in templates: `{{ quote.total|brl }}` renders `R$ 1.234,56`.
/// Values that do not parse as decimals pass through unchanged.
#[askama::filter_fn]
pub fn brl(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    let Ok(amount) = Decimal::from_str(&raw) else {
        return Ok(raw);
    };
    Ok(format_brl(amount))
}

/// Render a decimal as `R$ d.ddd,dd`.
fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let as_text = format!("{rounded:.2}");
    let (int_part, frac_part) = as_text.split_once('.').unwrap_or((as_text.as_str(), "00"));

    let (sign, digits) = int_part
        .strip_prefix('-')
        .map_or(("", int_part), |rest| ("-", rest));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("R$ {sign}{grouped},{frac_part}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn test_format_brl_groups_thousands() {
        assert_eq!(format_brl(dec!(1234.56)), "R$ 1.234,56");
        assert_eq!(format_brl(dec!(1234567.8)), "R$ 1.234.567,80");
    }

    #[test]
    fn test_format_brl_small_amounts() {
        assert_eq!(format_brl(dec!(0.5)), "R$ 0,50");
        assert_eq!(format_brl(dec!(700)), "R$ 700,00");
    }

    #[test]
    fn test_format_brl_negative() {
        assert_eq!(format_brl(dec!(-42.10)), "R$ -42,10");
    }
}
