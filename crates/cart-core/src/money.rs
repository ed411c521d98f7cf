//! # Money Module
//!
//! Provides the `Money` type for every amount in the cart pipeline: unit
//! prices, line totals, taxes, cart totals and rule thresholds.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  A rule "cart total >= 100.00" evaluated on a float total of           │
//! │  99.99999999 silently refuses free shipping.                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    10000 cents >= 10000 cents  ✅ exact comparison                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cart_core::money::Money;
//!
//! let unit_price = Money::from_cents(1099);
//! let line_total = unit_price * 3;
//! assert_eq!(line_total.cents(), 3297);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::tax::TaxRate;

/// Basis points in 100%.
const FULL_BPS: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that intermediate results (e.g. net = gross - tax) never need
/// a separate type; the price calculator rejects negative unit prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use cart_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ```rust
    /// use cart_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(100, 0).cents(), 10000);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    ///
    /// For negative amounts only the major unit carries the sign.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

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
    pub const fn minor(&self) -> i64 {
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

    /// Calculates the tax owed on a net amount.
    ///
    /// ## Implementation
    /// Integer math with half-up rounding: `(amount * bps + 5000) / 10000`.
    /// Returns `None` if the result does not fit into `i64`.
    ///
    /// ```rust
    /// use cart_core::money::Money;
    /// use cart_core::tax::TaxRate;
    ///
    /// // 10.00 at 19% = 1.90
    /// let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(1900));
    /// assert_eq!(tax, Some(Money::from_cents(190)));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<Money> {
        let tax_cents = (i128::from(self.0) * i128::from(rate.bps()) + FULL_BPS / 2) / FULL_BPS;
        Money::from_wide(tax_cents)
    }

    /// Extracts the tax contained in a gross amount.
    ///
    /// ## Formula
    /// ```text
    /// tax = gross × rate / (100% + rate)
    ///
    /// 11.90 gross at 19%:  1190 × 1900 / 11900 = 190
    /// ```
    ///
    /// ```rust
    /// use cart_core::money::Money;
    /// use cart_core::tax::TaxRate;
    ///
    /// let tax = Money::from_cents(1190).extract_tax(TaxRate::from_bps(1900));
    /// assert_eq!(tax, Some(Money::from_cents(190)));
    /// ```
    pub fn extract_tax(&self, rate: TaxRate) -> Option<Money> {
        let divisor = FULL_BPS + i128::from(rate.bps());
        let tax_cents = (i128::from(self.0) * i128::from(rate.bps()) + divisor / 2) / divisor;
        Money::from_wide(tax_cents)
    }

    /// Returns the given share (in basis points) of this amount.
    ///
    /// Used to split a price between several tax rules, e.g. a bundle that
    /// is 70% taxed at 19% and 30% taxed at 7%.
    pub fn share(&self, share_bps: u32) -> Option<Money> {
        let cents = (i128::from(self.0) * i128::from(share_bps) + FULL_BPS / 2) / FULL_BPS;
        Money::from_wide(cents)
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ```rust
    /// use cart_core::money::Money;
    ///
    /// let line_total = Money::from_cents(299).checked_mul(3);
    /// assert_eq!(line_total, Some(Money::from_cents(897)));
    ///
    /// assert_eq!(Money::from_cents(i64::MAX / 2).checked_mul(3), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    fn from_wide(cents: i128) -> Option<Money> {
        i64::try_from(cents).ok().map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly formatting. Currency symbols are a presentation concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// The operators saturate at the i64 bounds. Amounts coming from outside
// go through the checked methods in `PriceCalculator` first.

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
        *self = *self + other;
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
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Money::from_cents(100), Money::from_cents(250)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 350);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // 10.00 at 8.25% = 0.825 → 0.83
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax, Some(Money::from_cents(83)));
    }

    #[test]
    fn test_extract_tax_inverts_calculate_tax() {
        let net = Money::from_cents(2500);
        let rate = TaxRate::from_bps(700);
        let gross = net + net.calculate_tax(rate).unwrap();

        assert_eq!(gross.extract_tax(rate), net.calculate_tax(rate));
    }

    #[test]
    fn test_share() {
        let amount = Money::from_cents(1000);
        assert_eq!(amount.share(10_000), Some(Money::from_cents(1000)));
        assert_eq!(amount.share(7_000), Some(Money::from_cents(700)));
        assert_eq!(amount.share(0), Some(Money::zero()));
    }

    #[test]
    fn test_checked_arithmetic() {
        let large = Money::from_cents(i64::MAX / 2);

        assert_eq!(large.checked_mul(2), Some(Money::from_cents(i64::MAX - 1)));
        assert_eq!(large.checked_mul(3), None);
        assert_eq!(large.checked_add(large), Some(Money::from_cents(i64::MAX - 1)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_wide_results_out_of_range() {
        let max = Money::from_cents(i64::MAX);

        assert_eq!(max.calculate_tax(TaxRate::from_bps(20_000)), None);
        assert_eq!(max.share(20_000), None);
        assert!(max.extract_tax(TaxRate::from_bps(1900)).is_some());
    }

    #[test]
    fn test_operators_saturate() {
        let max = Money::from_cents(i64::MAX);

        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(max * 3, max);
        assert_eq!(Money::from_cents(i64::MIN) - Money::from_cents(1), Money::from_cents(i64::MIN));
    }
}
