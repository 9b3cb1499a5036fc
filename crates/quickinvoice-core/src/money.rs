//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! Binary floating point cannot represent most decimal amounts (0.1 + 0.2
//! famously lands on 0.30000000000000004), and an invoice total that
//! drifts by a cent is a dispute with a customer. So amounts live as i64
//! minor units end to end: 10.99 is the integer 1099, sums are exact, and
//! the single place rounding happens at all is the tax step, under one
//! documented rule.
//!
//! ## Usage
//! ```rust
//! use quickinvoice_core::money::Money;
//!
//! // From minor units (how the system talks to itself)
//! let price = Money::from_cents(1099);
//!
//! // From user input (how the editor talks to the system)
//! let typed = Money::from_decimal_str("10.99").unwrap();
//! assert_eq!(price, typed);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents, paise, pence;
/// every supported currency has two minor digits).
///
/// A one-field tuple struct over i64: copyable, ordered, serializes as a
/// bare integer. Signed so that intermediate arithmetic (credits,
/// corrections) stays representable; the validator keeps negatives out of
/// persisted invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Wraps an amount already expressed in minor units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Builds an amount from major and minor units: `(10, 99)` → 10.99.
    ///
    /// For negative amounts the sign rides on the major unit:
    /// `(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal string ("10", "10.5", "10.99") into Money.
    ///
    /// This is the price-field entry point, so the grammar is exactly
    /// what that field may contain: ASCII digits with at most one `.`
    /// and at most two decimal places. No sign (user amounts are
    /// non-negative), no grouping separators. A bare trailing `.`
    /// ("10.") reads as "10.00", and "10.5" means 50 minor units.
    ///
    /// ## Example
    /// ```rust
    /// use quickinvoice_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal_str("10.99").unwrap().cents(), 1099);
    /// assert_eq!(Money::from_decimal_str("10.5").unwrap().cents(), 1050);
    /// assert_eq!(Money::from_decimal_str("10").unwrap().cents(), 1000);
    /// assert!(Money::from_decimal_str("10.999").is_err());
    /// assert!(Money::from_decimal_str("-1").is_err());
    /// ```
    pub fn from_decimal_str(input: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty amount"));
        }

        let (major_part, minor_part) = match trimmed.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (trimmed, ""),
        };

        if minor_part.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }
        if major_part.is_empty() && minor_part.is_empty() {
            return Err(invalid("no digits"));
        }
        if !major_part.chars().all(|c| c.is_ascii_digit())
            || !minor_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("digits and a single decimal point only"));
        }

        let major: i64 = if major_part.is_empty() {
            0
        } else {
            major_part.parse().map_err(|_| invalid("amount too large"))?
        };
        // "10.5" means 50 minor units, not 5
        let minor: i64 = match minor_part.len() {
            0 => 0,
            1 => minor_part.parse::<i64>().unwrap_or(0) * 10,
            _ => minor_part.parse::<i64>().unwrap_or(0),
        };

        major
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(minor))
            .map(Money)
            .ok_or_else(|| invalid("amount too large"))
    }

    /// The amount in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The major-unit portion (10.99 → 10).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// The minor-unit portion, always 0-99 (10.99 → 99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// The zero amount.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount using **round-half-up**.
    ///
    /// ## Rounding Rule
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP, AT MINOR-UNIT PRECISION                             │
    /// │                                                                     │
    /// │  tax = (amount × bps + 5000) / 10000     (integer division)        │
    /// │                                                                     │
    /// │  250.00 × 18.00%  →  45.00   (exact)                               │
    /// │   10.00 ×  8.25%  →   0.83   (0.825 rounds up)                     │
    /// │                                                                     │
    /// │  This is the single rounding rule for the whole system; totals,   │
    /// │  documents and stored records all agree to the cent.               │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use quickinvoice_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(25_000); // 250.00
    /// let tax = subtotal.tax_at(1800);          // 18%
    /// assert_eq!(tax.cents(), 4_500);           // 45.00
    /// ```
    pub fn tax_at(&self, rate_bps: u32) -> Money {
        // i128 intermediate prevents overflow on large amounts
        let tax_cents = (self.0 as i128 * rate_bps as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Scales by a line-item quantity: 100.00 × 2 = 200.00.
    #[inline]
    pub const fn times(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays the bare decimal amount ("10.99").
///
/// Currency symbols belong to [`crate::types::Currency::format`]; Money
/// itself does not know which currency it denominates.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
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

/// Multiplication by integer, the operator spelling of [`Money::times`].
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_from_decimal_str() {
        assert_eq!(Money::from_decimal_str("10.99").unwrap().cents(), 1099);
        assert_eq!(Money::from_decimal_str("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::from_decimal_str("10.").unwrap().cents(), 1000);
        assert_eq!(Money::from_decimal_str("10").unwrap().cents(), 1000);
        assert_eq!(Money::from_decimal_str(".5").unwrap().cents(), 50);
        assert_eq!(Money::from_decimal_str("0").unwrap().cents(), 0);

        assert!(Money::from_decimal_str("").is_err());
        assert!(Money::from_decimal_str(".").is_err());
        assert!(Money::from_decimal_str("10.999").is_err());
        assert!(Money::from_decimal_str("-1").is_err());
        assert!(Money::from_decimal_str("1,000").is_err());
        assert!(Money::from_decimal_str("abc").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
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
        assert_eq!(a.times(3).cents(), 3000);
    }

    #[test]
    fn test_tax_exact() {
        // 250.00 at 18% = 45.00, no rounding involved
        let subtotal = Money::from_cents(25_000);
        assert_eq!(subtotal.tax_at(1800).cents(), 4_500);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 10.00 at 8.25% = 0.825 → 0.83
        let amount = Money::from_cents(1000);
        assert_eq!(amount.tax_at(825).cents(), 83);

        // 10.00 at 0.05% = 0.005 → 0.01 (exact half rounds up)
        assert_eq!(amount.tax_at(5).cents(), 1);
    }

    #[test]
    fn test_tax_zero_rate() {
        let amount = Money::from_cents(123_456);
        assert_eq!(amount.tax_at(0).cents(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }
}
