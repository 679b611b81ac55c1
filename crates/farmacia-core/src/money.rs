//! # Money Module
//!
//! Provides the `Money` type for ticket amounts.
//!
//! ## Two Number Worlds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Unit price resolution         │  Ticket / cash register               │
//! │  ─────────────────────         │  ──────────────────────               │
//! │  f64, exact formula            │  i64 cents, rounded once              │
//! │  100 × (1 − 10/100) × 0.95     │  Money::from_decimal(85.5) = 8550     │
//! │                                │                                        │
//! │  pricing.rs                    │  quote.rs                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Promotions stack multiplicatively, so intermediate values are kept in
//! floating point and converted to cents exactly once, here.
//!
//! ## Usage
//! ```rust
//! use farmacia_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let line = price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(line.cents(), 3297);
//!
//! assert_eq!(Money::from_decimal(85.5).cents(), 8550);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (MXN).
///
/// - **i64 (signed)**: discounts are carried as positive amounts, but
///   subtraction may legitimately go negative.
/// - **Single field tuple struct**: zero-cost wrapper over i64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Largest amount `from_decimal` produces: $1,000,000,000,000.00.
    ///
    /// Anything above is saturated here, far below where line math on
    /// `MAX_ITEM_QUANTITY` units could overflow `i64`.
    pub const MAX_DECIMAL: Money = Money(100_000_000_000_000);

    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a resolved decimal amount (pesos) to cents.
    ///
    /// Rounds half away from zero. Non-finite input becomes zero and
    /// magnitudes beyond [`Money::MAX_DECIMAL`] saturate to it.
    ///
    /// ```rust
    /// use farmacia_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(10.995).cents(), 1100);
    /// assert_eq!(Money::from_decimal(f64::NAN).cents(), 0);
    /// assert_eq!(Money::from_decimal(1e300), Money::MAX_DECIMAL);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        // Nudge by a tiny epsilon so 10.995 (stored as 10.99499..) rounds up
        let scaled = amount * 100.0;
        let nudged = scaled + scaled.signum() * 1e-7;
        let max = Self::MAX_DECIMAL.0 as f64;
        Money(nudged.round().clamp(-max, max) as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (pesos) portion.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies a unit amount by a line quantity. `None` on overflow.
    ///
    /// ```rust
    /// use farmacia_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(8550);
    /// assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_cents(25650)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Subtraction that reports overflow instead of panicking.
    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$12.34`. Front ends do their own localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.pesos().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_ITEM_QUANTITY;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.pesos(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_decimal_rounding() {
        assert_eq!(Money::from_decimal(85.5).cents(), 8550);
        assert_eq!(Money::from_decimal(1.0).cents(), 100);
        // 0.1 + 0.2 must not turn into 30.000000000000004 cents
        assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_decimal(10.995).cents(), 1100);
        assert_eq!(Money::from_decimal(-2.345).cents(), -235);
    }

    #[test]
    fn test_from_decimal_non_finite() {
        assert!(Money::from_decimal(f64::NAN).is_zero());
        assert!(Money::from_decimal(f64::INFINITY).is_zero());
    }

    #[test]
    fn test_from_decimal_saturates() {
        assert_eq!(Money::from_decimal(1e300), Money::MAX_DECIMAL);
        assert_eq!(Money::from_decimal(-1e300).cents(), -Money::MAX_DECIMAL.cents());
        // A saturated unit still fits a full line
        assert!(Money::MAX_DECIMAL.checked_multiply_quantity(MAX_ITEM_QUANTITY).is_some());
    }

    #[test]
    fn test_checked_arithmetic() {
        let unit = Money::from_cents(1000);
        assert_eq!(unit.checked_multiply_quantity(3), Some(Money::from_cents(3000)));
        assert_eq!(Money::from_cents(i64::MAX / 2 + 1).checked_multiply_quantity(2), None);
        assert_eq!(unit.checked_sub(Money::from_cents(250)), Some(Money::from_cents(750)));
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(unit), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }
}
