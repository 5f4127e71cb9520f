//! Price labels and the numeric amounts derived from them.
//!
//! The artist types prices free-form (`"$85"`, `"From $40"`, `"120 USD"`).
//! Labels are stored and displayed verbatim; cart totals are computed from
//! the leading numeric value found after discarding every character that is
//! neither a digit nor a dot.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A free-form price label attached to a portfolio item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayPrice(String);

impl DisplayPrice {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Numeric value of the label, or zero when none can be extracted.
    ///
    /// ```
    /// use rosa_studio_core::DisplayPrice;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(DisplayPrice::new("$85").amount(), Decimal::from(85));
    /// assert_eq!(DisplayPrice::new("Free").amount(), Decimal::ZERO);
    /// ```
    #[must_use]
    pub fn amount(&self) -> Decimal {
        parse_leading_numeric(&self.0)
    }
}

impl fmt::Display for DisplayPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DisplayPrice {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for DisplayPrice {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Strip everything but digits and dots, then read the longest leading
/// decimal number. Returns zero when no digit precedes the second dot, and
/// [`Decimal::MAX`] when the number is too large to represent.
#[must_use]
pub fn parse_leading_numeric(input: &str) -> Decimal {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut number = String::with_capacity(cleaned.len() + 1);
    let mut seen_dot = false;
    let mut seen_digit = false;
    for c in cleaned.chars() {
        if c == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
            if number.is_empty() {
                number.push('0');
            }
        } else {
            seen_digit = true;
        }
        number.push(c);
    }

    if !seen_digit {
        return Decimal::ZERO;
    }

    let number = number.trim_end_matches('.');
    Decimal::from_str(number).unwrap_or_else(|e| {
        tracing::warn!(label = input, error = %e, "Price exceeds the largest amount; capping");
        Decimal::MAX
    })
}

/// Sum amounts, capping at [`Decimal::MAX`] instead of overflowing.
#[must_use]
pub fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, |total, amount| {
        total.checked_add(amount).unwrap_or(Decimal::MAX)
    })
}

/// Render an amount the way the storefront shows totals (`$120.00`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap_or_default()
    }

    #[test]
    fn test_currency_prefixes_and_suffixes() {
        assert_eq!(parse_leading_numeric("$85"), dec("85"));
        assert_eq!(parse_leading_numeric("120 USD"), dec("120"));
        assert_eq!(parse_leading_numeric("From $40.50"), dec("40.50"));
    }

    #[test]
    fn test_separators_are_discarded_before_reading() {
        assert_eq!(parse_leading_numeric("$1,200"), dec("1200"));
    }

    #[test]
    fn test_second_dot_ends_the_number() {
        assert_eq!(parse_leading_numeric("1.2.3"), dec("1.2"));
        assert_eq!(parse_leading_numeric("$12."), dec("12"));
        assert_eq!(parse_leading_numeric(".5"), dec("0.5"));
    }

    #[test]
    fn test_non_numeric_is_zero() {
        assert_eq!(parse_leading_numeric(""), Decimal::ZERO);
        assert_eq!(parse_leading_numeric("Price on request"), Decimal::ZERO);
        assert_eq!(parse_leading_numeric("..5"), Decimal::ZERO);
    }

    #[test]
    fn test_oversized_number_is_capped_not_free() {
        assert_eq!(
            parse_leading_numeric("$100000000000000000000000000000"),
            Decimal::MAX
        );
    }

    #[test]
    fn test_saturating_sum() {
        assert_eq!(saturating_sum([dec("85"), dec("35")]), dec("120"));
        assert_eq!(saturating_sum(Vec::new()), Decimal::ZERO);
        assert_eq!(saturating_sum([Decimal::MAX, Decimal::MAX]), Decimal::MAX);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("120")), "$120.00");
        assert_eq!(format_amount(dec("35.5")), "$35.50");
    }
}
