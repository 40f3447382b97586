//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Free-text input is turned into amounts with [`parse_amount`] and
//! [`parse_percent`], which never fail: anything unparsable is zero.
//! Arithmetic saturates at the bounds of `i64` cents instead of wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use budget_planner::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    ///
    /// # Examples
    /// ```
    /// use budget_planner::models::Money;
    /// assert_eq!(Money::from_units(1000).cents(), 100_000);
    /// ```
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(100))
    }

    /// Create a Money amount from a fractional number of units, rounded to the cent
    pub fn from_units_f64(units: f64) -> Self {
        if units.is_finite() {
            Self((units * 100.0).round() as i64)
        } else {
            Self::zero()
        }
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Take `percent` percent of this amount, rounded to the cent
    ///
    /// # Examples
    /// ```
    /// use budget_planner::models::Money;
    /// let parent = Money::from_units(10_000_000);
    /// assert_eq!(parent.percent(20.0), Money::from_units(2_000_000));
    /// ```
    pub fn percent(&self, percent: f64) -> Self {
        if !percent.is_finite() {
            return Self::zero();
        }
        Self(((self.0 as f64) * percent / 100.0).round() as i64)
    }

    /// Ratio of this amount to another, or `None` when the divisor is zero
    pub fn ratio_of(&self, total: Money) -> Option<f64> {
        if total.is_zero() {
            None
        } else {
            Some(self.0 as f64 / total.0 as f64)
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s.strip_prefix('$').unwrap_or(s);
        if s.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let cents = if s.contains('.') {
            let parts: Vec<&str> = s.split('.').collect();
            if parts.len() != 2 {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }

            let units: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
            };

            // Pad or truncate cents to 2 digits
            let cents_str = parts[1];
            let cents: i64 = match cents_str.len() {
                0 => 0,
                1 => {
                    cents_str
                        .parse::<i64>()
                        .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                        * 10
                }
                _ => cents_str[..2]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?,
            };

            units
                .checked_mul(100)
                .and_then(|c| c.checked_add(cents))
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
        } else {
            s.parse::<i64>()
                .ok()
                .and_then(|units| units.checked_mul(100))
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
        };

        Ok(Self(if negative { cents.saturating_neg() } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_thousands(self.units().abs()),
            self.cents_part()
        )
    }

    /// Format whole units with thousands separators and an explicit sign
    ///
    /// Zero has no sign; positive amounts get `+`, negative amounts `-`.
    pub fn format_with_sign(&self) -> String {
        let formatted = group_thousands(self.units().abs());
        if self.is_positive() {
            format!("+{}", formatted)
        } else if self.is_negative() {
            format!("-{}", formatted)
        } else {
            formatted
        }
    }
}

/// Insert `,` between groups of three digits
fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Keep only the characters that can take part in a number.
///
/// A `-` survives only as the first non-whitespace character.
fn strip_non_numeric(text: &str) -> String {
    let trimmed = text.trim_start();
    let negative = trimmed.starts_with('-');
    let digits: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if negative {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Coerce free-text user input into an amount.
///
/// Lossy on invalid input: characters other than digits and `.` are stripped
/// (so "1,250.75 USD" is 1250.75), and anything that still fails to parse,
/// including the empty string, becomes zero.
pub fn parse_amount(text: &str) -> Money {
    Money::parse(&strip_non_numeric(text)).unwrap_or_default()
}

/// Coerce free-text percentage input into a number in `0..=100`; zero when unparsable.
pub fn parse_percent(text: &str) -> f64 {
    strip_non_numeric(text)
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .map(clamp_percent)
        .unwrap_or(0.0)
}

/// Limit a percentage to `0..=100`
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
