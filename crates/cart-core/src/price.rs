//! # Price Module
//!
//! Price definitions (what the price gateway delivers), calculated prices
//! (what a calculated line item carries) and the calculator in between.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PriceGateway ──► PriceDefinition { net 10.00, [19%], qty 3 }           │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                   PriceCalculator.calculate(definition, context)        │
//! │                          │                                              │
//! │            ┌─────────────┴──────────────┐                               │
//! │            ▼                            ▼                               │
//! │   TaxMode::Inclusive            TaxMode::Exclusive                      │
//! │   unit   = 10.00 + 1.90         unit   = 10.00                          │
//! │   total  = 11.90 × 3 = 35.70    total  = 10.00 × 3 = 30.00              │
//! │   taxes  = extract(35.70)       taxes  = calculate(30.00)               │
//! │          = 5.70                        = 5.70                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::collection::KeyedCollection;
use crate::context::ShopContext;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::tax::{CalculatedTax, CalculatedTaxCollection, TaxMode, TaxRuleCollection};
use crate::validation::{validate_quantity, validate_tax_rate_bps, validate_tax_share_bps};
use crate::MAX_LINE_TOTAL_CENTS;

// =============================================================================
// Price Definition
// =============================================================================

/// Raw price data for one product as delivered by a price gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDefinition {
    /// Net unit price.
    pub price: Money,
    pub tax_rules: TaxRuleCollection,
    pub quantity: i64,
}

impl PriceDefinition {
    /// Creates a definition for a single unit.
    pub fn new(price: Money, tax_rules: TaxRuleCollection) -> Self {
        PriceDefinition {
            price,
            tax_rules,
            quantity: 1,
        }
    }

    /// Returns a copy of this definition for `quantity` units.
    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Price definitions keyed by line item identifier.
pub type PriceDefinitionCollection = KeyedCollection<String, PriceDefinition>;

// =============================================================================
// Price
// =============================================================================

/// A calculated price.
///
/// ## Invariants
/// - `total_price == unit_price × quantity`
/// - `total_price` is never negative
/// - `unit_price` is gross or net depending on the context's [`TaxMode`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub unit_price: Money,
    pub total_price: Money,
    pub calculated_taxes: CalculatedTaxCollection,
    pub tax_rules: TaxRuleCollection,
    pub quantity: i64,
    /// Optional comparison price (e.g. price per litre), shown next to the
    /// unit price.
    pub reference_price: Option<Money>,
}

impl Price {
    pub fn new(
        unit_price: Money,
        total_price: Money,
        calculated_taxes: CalculatedTaxCollection,
        tax_rules: TaxRuleCollection,
        quantity: i64,
    ) -> Self {
        Price {
            unit_price,
            total_price,
            calculated_taxes,
            tax_rules,
            quantity,
            reference_price: None,
        }
    }

    pub fn with_reference_price(mut self, reference_price: Money) -> Self {
        self.reference_price = Some(reference_price);
        self
    }

    /// Sum of all calculated taxes.
    pub fn tax_amount(&self) -> Money {
        self.calculated_taxes.amount()
    }
}

// =============================================================================
// Price Calculator
// =============================================================================

/// Turns a [`PriceDefinition`] into a [`Price`] for the current context.
///
/// Stateless; one instance can serve any number of calculations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceCalculator;

impl PriceCalculator {
    pub fn new() -> Self {
        PriceCalculator
    }

    /// Calculates unit price, total price and taxes.
    ///
    /// ## Errors
    /// - [`CoreError::NegativePrice`] if the definition's unit price is negative
    /// - [`CoreError::Validation`] if the quantity is out of range, a tax rule
    ///   has a rate above 100%, or the tax rule shares add up to more than 100%
    /// - [`CoreError::AmountOutOfRange`] if the line total exceeds
    ///   [`MAX_LINE_TOTAL_CENTS`]
    pub fn calculate(&self, definition: &PriceDefinition, context: &ShopContext) -> CoreResult<Price> {
        if definition.price.is_negative() {
            return Err(CoreError::NegativePrice {
                cents: definition.price.cents(),
            });
        }

        validate_quantity(definition.quantity)?;

        let mut share_total: u64 = 0;
        for rule in definition.tax_rules.values() {
            validate_tax_rate_bps(rule.rate.bps())?;
            share_total += u64::from(rule.share_bps);
        }
        validate_tax_share_bps(share_total)?;

        match context.tax_mode() {
            TaxMode::Exclusive => self.calculate_net(definition),
            TaxMode::Inclusive => self.calculate_gross(definition),
        }
    }

    /// Net prices: taxes are added on top of the total.
    fn calculate_net(&self, definition: &PriceDefinition) -> CoreResult<Price> {
        let unit_price = definition.price;
        let total_price = line_total(unit_price, definition.quantity)?;

        let mut taxes = CalculatedTaxCollection::new();
        for rule in definition.tax_rules.values() {
            let taxable = total_price.share(rule.share_bps).ok_or_else(out_of_range)?;
            taxes.merge_tax(CalculatedTax {
                tax: taxable.calculate_tax(rule.rate).ok_or_else(out_of_range)?,
                rate: rule.rate,
                price: taxable,
            });
        }

        Ok(Price::new(
            unit_price,
            total_price,
            taxes,
            definition.tax_rules.clone(),
            definition.quantity,
        ))
    }

    /// Gross prices: the unit price is rounded gross first, taxes are
    /// extracted from the gross total.
    fn calculate_gross(&self, definition: &PriceDefinition) -> CoreResult<Price> {
        let mut unit_tax = Money::zero();
        for rule in definition.tax_rules.values() {
            let tax = definition
                .price
                .share(rule.share_bps)
                .and_then(|share| share.calculate_tax(rule.rate))
                .and_then(|tax| unit_tax.checked_add(tax))
                .ok_or_else(out_of_range)?;
            unit_tax = tax;
        }

        let unit_price = definition.price.checked_add(unit_tax).ok_or_else(out_of_range)?;
        let total_price = line_total(unit_price, definition.quantity)?;

        let mut taxes = CalculatedTaxCollection::new();
        for rule in definition.tax_rules.values() {
            let gross_share = total_price.share(rule.share_bps).ok_or_else(out_of_range)?;
            taxes.merge_tax(CalculatedTax {
                tax: gross_share.extract_tax(rule.rate).ok_or_else(out_of_range)?,
                rate: rule.rate,
                price: gross_share,
            });
        }

        Ok(Price::new(
            unit_price,
            total_price,
            taxes,
            definition.tax_rules.clone(),
            definition.quantity,
        ))
    }
}

/// `unit_price × quantity`, bounded by [`MAX_LINE_TOTAL_CENTS`].
fn line_total(unit_price: Money, quantity: i64) -> CoreResult<Money> {
    unit_price
        .checked_mul(quantity)
        .filter(|total| total.cents() <= MAX_LINE_TOTAL_CENTS)
        .ok_or_else(out_of_range)
}

fn out_of_range() -> CoreError {
    CoreError::AmountOutOfRange {
        max: MAX_LINE_TOTAL_CENTS,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CustomerGroup;
    use crate::tax::{TaxRate, TaxRule};

    fn rules(bps: &[u32]) -> TaxRuleCollection {
        TaxRuleCollection::from_values(bps.iter().map(|b| TaxRule::new(TaxRate::from_bps(*b))))
    }

    fn net_context() -> ShopContext {
        ShopContext::default().with_customer_group(CustomerGroup::new("H", TaxMode::Exclusive))
    }

    #[test]
    fn test_gross_price() {
        let definition =
            PriceDefinition::new(Money::from_cents(1000), rules(&[1900])).with_quantity(3);
        let price = PriceCalculator::new()
            .calculate(&definition, &ShopContext::default())
            .unwrap();

        assert_eq!(price.unit_price.cents(), 1190);
        assert_eq!(price.total_price.cents(), 3570);
        assert_eq!(price.tax_amount().cents(), 570);
        assert_eq!(price.quantity, 3);
    }

    #[test]
    fn test_net_price() {
        let definition =
            PriceDefinition::new(Money::from_cents(1000), rules(&[1900])).with_quantity(3);
        let price = PriceCalculator::new()
            .calculate(&definition, &net_context())
            .unwrap();

        assert_eq!(price.unit_price.cents(), 1000);
        assert_eq!(price.total_price.cents(), 3000);
        assert_eq!(price.tax_amount().cents(), 570);
    }

    #[test]
    fn test_total_is_unit_times_quantity() {
        let definition =
            PriceDefinition::new(Money::from_cents(333), rules(&[700])).with_quantity(7);

        for context in [ShopContext::default(), net_context()] {
            let price = PriceCalculator::new().calculate(&definition, &context).unwrap();
            assert_eq!(price.total_price, price.unit_price * 7);
        }
    }

    #[test]
    fn test_split_tax_rules() {
        let tax_rules = TaxRuleCollection::from(vec![
            TaxRule::with_share(TaxRate::from_bps(1900), 5_000),
            TaxRule::with_share(TaxRate::from_bps(700), 5_000),
        ]);
        let definition = PriceDefinition::new(Money::from_cents(2000), tax_rules);
        let price = PriceCalculator::new()
            .calculate(&definition, &net_context())
            .unwrap();

        // 10.00 at 19% + 10.00 at 7%
        assert_eq!(price.calculated_taxes.len(), 2);
        assert_eq!(price.tax_amount().cents(), 190 + 70);
    }

    #[test]
    fn test_without_tax_rules() {
        let definition = PriceDefinition::new(Money::zero(), TaxRuleCollection::new());
        let price = PriceCalculator::new()
            .calculate(&definition, &ShopContext::default())
            .unwrap();

        assert_eq!(
            price,
            Price::new(
                Money::zero(),
                Money::zero(),
                CalculatedTaxCollection::new(),
                TaxRuleCollection::new(),
                1
            )
        );
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let definition = PriceDefinition::new(Money::from_cents(-1), TaxRuleCollection::new());
        let result = PriceCalculator::new().calculate(&definition, &ShopContext::default());

        assert!(matches!(result, Err(CoreError::NegativePrice { cents: -1 })));
    }

    #[test]
    fn test_invalid_tax_rate_is_rejected() {
        let definition = PriceDefinition::new(Money::from_cents(100), rules(&[10_001]));
        let result = PriceCalculator::new().calculate(&definition, &ShopContext::default());

        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_tax_share_above_full_price_is_rejected() {
        let single = TaxRuleCollection::from(vec![TaxRule::with_share(TaxRate::from_bps(1900), 20_000)]);
        let split = TaxRuleCollection::from(vec![
            TaxRule::with_share(TaxRate::from_bps(1900), 7_000),
            TaxRule::with_share(TaxRate::from_bps(700), 7_000),
        ]);

        for tax_rules in [single, split] {
            let definition = PriceDefinition::new(Money::from_cents(1000), tax_rules);
            for context in [ShopContext::default(), net_context()] {
                let result = PriceCalculator::new().calculate(&definition, &context);
                assert!(matches!(result, Err(CoreError::Validation(_))));
            }
        }
    }

    #[test]
    fn test_invalid_quantity_is_rejected() {
        for quantity in [0, -3] {
            let definition =
                PriceDefinition::new(Money::from_cents(1000), rules(&[1900])).with_quantity(quantity);
            let result = PriceCalculator::new().calculate(&definition, &ShopContext::default());

            assert!(matches!(result, Err(CoreError::Validation(_))));
        }
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let definition =
            PriceDefinition::new(Money::from_cents(i64::MAX / 2), rules(&[1900])).with_quantity(3);

        for context in [ShopContext::default(), net_context()] {
            let result = PriceCalculator::new().calculate(&definition, &context);
            assert!(matches!(
                result,
                Err(CoreError::AmountOutOfRange { max: MAX_LINE_TOTAL_CENTS })
            ));
        }
    }

    #[test]
    fn test_line_total_limit() {
        let at_limit = PriceDefinition::new(Money::from_cents(MAX_LINE_TOTAL_CENTS), TaxRuleCollection::new());
        assert!(PriceCalculator::new().calculate(&at_limit, &net_context()).is_ok());

        let above = at_limit.with_quantity(2);
        let result = PriceCalculator::new().calculate(&above, &net_context());
        assert!(matches!(result, Err(CoreError::AmountOutOfRange { .. })));
    }
}
