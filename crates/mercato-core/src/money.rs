//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In the browser-based till this replaces:                           │
//! │    0.1 + 0.2 = 0.30000000000000004                                  │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    Every amount is an i64 count of the smallest currency unit.      │
//! │    The clients, calculations, and receipts all use cents; only      │
//! │    display formatting converts to major units.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! User-entered amounts arrive as free-form strings (numeric keypad, discount
//! field). [`Money::parse_lenient`] is the single coercion point: anything
//! unparsable becomes zero, matching how the till treats bad input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values are meaningful (refunds, shortages,
///   overpaid remainders)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the larger of two values.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// Returns the smaller of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// Parses a user-entered decimal amount, coercing anything unparsable
    /// to zero.
    ///
    /// ## Accepted Forms
    /// - `"12"`, `"12.5"`, `"12.50"`, `".75"`, `"12."`
    /// - Leading `+`/`-` and surrounding whitespace
    /// - More than two fraction digits round half-up to cents
    ///
    /// ## Rejected Forms (yield zero)
    /// - Empty input, words, group separators, anything else
    ///
    /// This permissive coercion is deliberate: the till historically treated
    /// non-numeric payment and discount entries as zero rather than
    /// rejecting them, and callers rely on that.
    ///
    /// ## Example
    /// ```rust
    /// use mercato_core::money::Money;
    ///
    /// assert_eq!(Money::parse_lenient("12.5").cents(), 1250);
    /// assert_eq!(Money::parse_lenient("garbage").cents(), 0);
    /// ```
    pub fn parse_lenient(input: &str) -> Money {
        let s = input.trim();
        if s.is_empty() {
            return Money::zero();
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let mut parts = digits.splitn(2, '.');
        let whole = parts.next().unwrap_or("");
        let frac = parts.next();

        // "." alone carries no digits at all
        if whole.is_empty() && frac.map_or(true, str::is_empty) {
            return Money::zero();
        }

        if !whole.chars().all(|c| c.is_ascii_digit()) {
            return Money::zero();
        }

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            match whole.parse() {
                Ok(v) => v,
                Err(_) => return Money::zero(),
            }
        };

        let frac_cents: i64 = match frac {
            None => 0,
            Some(f) => {
                if !f.chars().all(|c| c.is_ascii_digit()) {
                    return Money::zero();
                }
                let digit = |i: usize| f.as_bytes().get(i).map_or(0, |b| (b - b'0') as i64);
                let mut cents = digit(0) * 10 + digit(1);
                if digit(2) >= 5 {
                    cents += 1;
                }
                cents
            }
        };

        let total = match whole_units.checked_mul(100).and_then(|w| w.checked_add(frac_cents)) {
            Some(v) => v,
            None => return Money::zero(),
        };

        Money(if negative { -total } else { total })
    }

    /// Computes a percentage of this amount, expressed in basis points.
    ///
    /// 1 basis point = 0.01%, so 1000 bps = 10%. Uses i128 intermediate math
    /// with half-up rounding to avoid overflow and drift.
    ///
    /// ## Example
    /// ```rust
    /// use mercato_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(2500);
    /// assert_eq!(subtotal.percent_of(1000).cents(), 250); // 10%
    /// ```
    pub fn percent_of(&self, bps: u32) -> Money {
        let cents = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Formats the amount with a currency symbol and decimal count.
    ///
    /// Display configuration (symbol, decimals) comes from localization
    /// settings; this helper only does the arithmetic. Storage is always
    /// two implied decimals, so the value is rescaled to the display
    /// count, rounding half-up when fewer digits are shown.
    pub fn format_with(&self, symbol: &str, decimals: u8) -> String {
        // no real currency shows more than a handful of fraction digits
        let decimals = decimals.min(8);
        let cents = (self.0 as i128).abs();
        let scaled = if decimals >= 2 {
            cents * 10_i128.pow(decimals as u32 - 2)
        } else {
            let down = 10_i128.pow(2 - decimals as u32);
            (cents + down / 2) / down
        };

        let divisor = 10_i128.pow(decimals as u32);
        let whole = scaled / divisor;
        let frac = scaled % divisor;

        let body = if decimals > 0 {
            format!("{}.{:0width$}", whole, frac, width = decimals as usize)
        } else {
            whole.to_string()
        };

        format!("{}{}{}", if self.0 < 0 { "-" } else { "" }, symbol, body)
    }
}

/// Debug-friendly display; UI-facing formatting goes through
/// [`Money::format_with`] with the configured currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity (line totals).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_parse_lenient_valid() {
        assert_eq!(Money::parse_lenient("12").cents(), 1200);
        assert_eq!(Money::parse_lenient("12.5").cents(), 1250);
        assert_eq!(Money::parse_lenient("12.50").cents(), 1250);
        assert_eq!(Money::parse_lenient("12.").cents(), 1200);
        assert_eq!(Money::parse_lenient(".75").cents(), 75);
        assert_eq!(Money::parse_lenient(" 10 ").cents(), 1000);
        assert_eq!(Money::parse_lenient("-3.25").cents(), -325);
        assert_eq!(Money::parse_lenient("+7").cents(), 700);
        assert_eq!(Money::parse_lenient("0").cents(), 0);
    }

    #[test]
    fn test_parse_lenient_rounds_extra_digits() {
        assert_eq!(Money::parse_lenient("1.005").cents(), 101);
        assert_eq!(Money::parse_lenient("1.004").cents(), 100);
        // carry out of the fraction
        assert_eq!(Money::parse_lenient("1.999").cents(), 200);
    }

    #[test]
    fn test_parse_lenient_coerces_junk_to_zero() {
        assert_eq!(Money::parse_lenient("").cents(), 0);
        assert_eq!(Money::parse_lenient("   ").cents(), 0);
        assert_eq!(Money::parse_lenient("abc").cents(), 0);
        assert_eq!(Money::parse_lenient("12abc").cents(), 0);
        assert_eq!(Money::parse_lenient("1,5").cents(), 0);
        assert_eq!(Money::parse_lenient(".").cents(), 0);
        assert_eq!(Money::parse_lenient("1.2.3").cents(), 0);
    }

    #[test]
    fn test_percent_of() {
        let subtotal = Money::from_cents(2500);
        assert_eq!(subtotal.percent_of(0).cents(), 0);
        assert_eq!(subtotal.percent_of(1000).cents(), 250);
        assert_eq!(subtotal.percent_of(10000).cents(), 2500);

        // half-up rounding: 10.01 at 5% = 0.5005 -> 0.50
        assert_eq!(Money::from_cents(1001).percent_of(500).cents(), 50);
        // 10.10 at 2.5% = 0.2525 -> 0.25; 10.30 at 2.5% = 0.2575 -> 0.26
        assert_eq!(Money::from_cents(1010).percent_of(250).cents(), 25);
        assert_eq!(Money::from_cents(1030).percent_of(250).cents(), 26);
    }

    #[test]
    fn test_format_with() {
        assert_eq!(Money::from_cents(1234).format_with("$", 2), "$12.34");
        assert_eq!(Money::from_cents(-1234).format_with("$", 2), "-$12.34");
        assert_eq!(Money::from_cents(1234).format_with("¥", 0), "¥12");
    }

    #[test]
    fn test_format_with_rescales_from_cents() {
        // fewer display digits than storage rounds half-up
        assert_eq!(Money::from_cents(1250).format_with("¥", 0), "¥13");
        assert_eq!(Money::from_cents(1249).format_with("¥", 0), "¥12");
        assert_eq!(Money::from_cents(1235).format_with("$", 1), "$12.4");
        assert_eq!(Money::from_cents(-1250).format_with("¥", 0), "-¥13");
        // more display digits pads with zeros
        assert_eq!(Money::from_cents(1234).format_with("د.ب", 3), "د.ب12.340");
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
        assert_eq!(Money::from_cents(-550).abs().cents(), 550);
        assert_eq!(Money::from_cents(-5).max(Money::zero()).cents(), 0);
    }
}
