//! # Tax Types
//!
//! Tax rates, tax rules attached to a price definition, and the taxes the
//! price calculator produces from them.
//!
//! ```text
//! ┌─────────────────┐      ┌──────────────────┐      ┌─────────────────┐
//! │    TaxRate      │      │     TaxRule      │      │  CalculatedTax  │
//! │  ─────────────  │ ───► │  ──────────────  │ ───► │  ─────────────  │
//! │  bps (u32)      │      │  rate            │      │  tax            │
//! │  1900 = 19%     │      │  share (bps)     │      │  rate           │
//! └─────────────────┘      └──────────────────┘      │  price          │
//!                                                    └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::collection::{Keyed, KeyedCollection};
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 1900 bps = 19% and 825 bps = 8.25%
/// without any floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Tax Mode
// =============================================================================

/// How prices are presented to the customer group of the current context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Net prices, tax shown separately (B2B, USA model).
    Exclusive,
    /// Gross prices, tax included (B2C in the EU/UK).
    #[default]
    Inclusive,
}

// =============================================================================
// Tax Rule
// =============================================================================

/// Full share of a price, in basis points.
pub const FULL_SHARE_BPS: u32 = 10_000;

/// Applies `rate` to `share_bps` of a price.
///
/// Most products carry exactly one rule with the full share. Mixed goods
/// (e.g. a gift basket) carry several rules whose shares add up to 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRule {
    pub rate: TaxRate,
    pub share_bps: u32,
}

impl TaxRule {
    /// A rule that applies `rate` to the full price.
    pub const fn new(rate: TaxRate) -> Self {
        TaxRule {
            rate,
            share_bps: FULL_SHARE_BPS,
        }
    }

    /// A rule that applies `rate` to `share_bps` of the price.
    pub const fn with_share(rate: TaxRate, share_bps: u32) -> Self {
        TaxRule { rate, share_bps }
    }
}

impl Keyed for TaxRule {
    type Key = TaxRate;

    fn key(&self) -> TaxRate {
        self.rate
    }
}

/// Tax rules keyed by rate.
pub type TaxRuleCollection = KeyedCollection<TaxRate, TaxRule>;

impl TaxRuleCollection {
    /// Merges rules from `other`; rules with an already known rate are kept.
    pub fn merge(&mut self, other: &TaxRuleCollection) {
        for rule in other.values() {
            if !self.contains_key(&rule.rate) {
                self.add(*rule);
            }
        }
    }
}

// =============================================================================
// Calculated Tax
// =============================================================================

/// Tax amount produced by applying one rule to a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedTax {
    /// The tax amount.
    pub tax: Money,
    /// The rate that produced it.
    pub rate: TaxRate,
    /// The (share of the) price the tax was computed on.
    pub price: Money,
}

impl Keyed for CalculatedTax {
    type Key = TaxRate;

    fn key(&self) -> TaxRate {
        self.rate
    }
}

/// Calculated taxes keyed by rate.
pub type CalculatedTaxCollection = KeyedCollection<TaxRate, CalculatedTax>;

impl CalculatedTaxCollection {
    /// Sum of all tax amounts.
    pub fn amount(&self) -> Money {
        self.values().map(|tax| tax.tax).sum()
    }

    /// Adds `tax` to the entry with the same rate, or inserts it.
    pub fn merge_tax(&mut self, tax: CalculatedTax) {
        let merged = match self.get(&tax.rate) {
            Some(existing) => CalculatedTax {
                tax: existing.tax + tax.tax,
                rate: tax.rate,
                price: existing.price + tax.price,
            },
            None => tax,
        };
        self.add(merged);
    }

    /// Merges every tax of `other` into this collection, summing per rate.
    pub fn merge(&mut self, other: &CalculatedTaxCollection) {
        for tax in other.values() {
            self.merge_tax(*tax);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
