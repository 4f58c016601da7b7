//! # Money Module
//!
//! The `Money` type for prices, line totals and report revenue.
//!
//! ## Minor Units Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every amount is an integer count of the smallest unit (kobo).          │
//! │                                                                         │
//! │    ₦150.00  ──►  15000                                                  │
//! │    ₦1.50    ──►    150                                                  │
//! │                                                                         │
//! │  Sums of line totals are exact, so a sale total always equals the      │
//! │  sum of its items, and revenue reports never drift.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use buttery_core::money::Money;
//!
//! let price = Money::from_cents(15000); // ₦150.00
//! let line = price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(line.cents(), 45000);
//! assert_eq!(line.to_string(), "₦450.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// A monetary value in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## User Workflow
    /// ```text
    /// Line: Water × 10 @ ₦100
    ///      │
    ///      ▼
    /// checked_multiply_quantity(10) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// total_price: ₦1,000
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

/// Formats as naira with thousands separators, e.g. `₦1,250.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let digits = (abs / 100).to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{}₦{}.{:02}", sign, grouped, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(0).to_string(), "₦0.00");
        assert_eq!(Money::from_cents(15000).to_string(), "₦150.00");
        assert_eq!(Money::from_cents(125_000).to_string(), "₦1,250.00");
        assert_eq!(Money::from_cents(123_456_789).to_string(), "₦1,234,567.89");
        assert_eq!(Money::from_cents(-550).to_string(), "-₦5.50");
        assert_eq!(Money::from_cents(i64::MIN).to_string(), "-₦92,233,720,368,547,758.08");
    }

    #[test]
    fn test_checked_operations_detect_overflow() {
        assert_eq!(
            Money::from_cents(100).checked_multiply_quantity(10),
            Some(Money::from_cents(1000))
        );
        assert_eq!(
            Money::from_cents(1000).checked_add(Money::from_cents(500)),
            Some(Money::from_cents(1500))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::zero().cents(), 0);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&Money::from_cents(4200)).unwrap(), "4200");
    }
}
