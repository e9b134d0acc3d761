//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:                                                           │
//! │    119.99 + 0.01 might not compare equal to 120.00                      │
//! │    → a £120 basket could be charged UK shipping by accident             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Pence                                            │
//! │    11999 + 1 == 12000, always                                           │
//! │    Shipping thresholds are exact integer comparisons                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fulfil_core::money::Money;
//!
//! let price = Money::from_pence(1099); // £10.99
//!
//! let doubled = price * 2;                       // £21.98
//! let total = price + Money::from_pence(500);    // £15.99
//! assert_eq!(total.to_string(), "£15.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in pence.
///
/// ## Design Decisions
/// - **i64 (signed)**: differences between amounts may go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Ord**: shipping tiers compare subtotals against thresholds
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► Item.line_total ──► Order.subtotal ──┬──► Order.total
///                                                        │
///                       estimate(region, subtotal) ──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from pence.
    ///
    /// ## Example
    /// ```rust
    /// use fulfil_core::money::Money;
    ///
    /// let price = Money::from_pence(1099); // £10.99
    /// assert_eq!(price.pence(), 1099);
    /// ```
    #[inline]
    pub const fn from_pence(pence: i64) -> Self {
        Money(pence)
    }

    /// Creates a Money value from pounds and pence.
    ///
    /// ## Example
    /// ```rust
    /// use fulfil_core::money::Money;
    ///
    /// assert_eq!(Money::from_pounds_pence(4, 99).pence(), 499);
    /// assert_eq!(Money::from_pounds_pence(-5, 50).pence(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts only `pounds` carries the sign:
    /// `from_pounds_pence(-5, 50)` is -£5.50, not -£4.50.
    #[inline]
    pub const fn from_pounds_pence(pounds: i64, pence: i64) -> Self {
        if pounds < 0 {
            Money(pounds.saturating_mul(100).saturating_sub(pence))
        } else {
            Money(pounds.saturating_mul(100).saturating_add(pence))
        }
    }

    /// Whole pounds. Shorthand for the shipping thresholds.
    #[inline]
    pub const fn from_pounds(pounds: i64) -> Self {
        Money(pounds.saturating_mul(100))
    }

    /// Returns the value in pence.
    #[inline]
    pub const fn pence(&self) -> i64 {
        self.0
    }

    /// Returns the whole-pounds portion (truncated toward zero).
    #[inline]
    pub const fn pounds(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the pence portion (always 0-99).
    #[inline]
    pub const fn pence_part(&self) -> i64 {
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

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use fulfil_core::money::Money;
    ///
    /// let unit_price = Money::from_pence(299);
    /// assert_eq!(unit_price.multiply_quantity(3).pence(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Like [`Money::multiply_quantity`], but `None` when the result does
    /// not fit in an `i64`.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(pence) => Some(Money(pence)),
            None => None,
        }
    }

    /// `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(pence) => Some(Money(pence)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
// Operators saturate at the i64 bounds instead of panicking or wrapping.

/// Renders as `£10.99` / `-£5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}£{}.{:02}", sign, self.pounds().abs(), self.pence_part())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a line quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
