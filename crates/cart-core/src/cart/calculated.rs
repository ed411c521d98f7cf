//! # Calculated Cart
//!
//! The read-only result of a cart calculation and the amount calculator
//! that sums its line item prices.
//!
//! ## Cart Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Line totals: SW1 11.90 (19%) · SW2 21.40 (7%) · SW3 23.80 (19%)        │
//! │                                                                         │
//! │  TaxMode::Inclusive (gross)         TaxMode::Exclusive (net)            │
//! │  total = Σ line totals              net   = Σ line totals               │
//! │  net   = total - Σ taxes            total = net + Σ taxes               │
//! │                                                                         │
//! │  Taxes merged by rate: 19% → 1.90 + 3.80 · 7% → 1.40                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::container::CartContainer;
use crate::cart::error::ErrorCollection;
use crate::cart::processor_cart::ProcessorCart;
use crate::context::ShopContext;
use crate::delivery::DeliveryCollection;
use crate::line_item::CalculatedLineItemCollection;
use crate::money::Money;
use crate::price::Price;
use crate::tax::{CalculatedTaxCollection, TaxMode, TaxRuleCollection};

// =============================================================================
// Cart Price
// =============================================================================

/// Aggregated price of a whole cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartPrice {
    pub net_price: Money,
    pub total_price: Money,
    pub calculated_taxes: CalculatedTaxCollection,
    pub tax_rules: TaxRuleCollection,
}

impl CartPrice {
    /// Sum of all calculated taxes.
    pub fn tax_amount(&self) -> Money {
        self.calculated_taxes.amount()
    }
}

// =============================================================================
// Amount Calculator
// =============================================================================

/// Sums line item prices into a [`CartPrice`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountCalculator;

impl AmountCalculator {
    pub fn new() -> Self {
        AmountCalculator
    }

    pub fn calculate<'a>(
        &self,
        prices: impl IntoIterator<Item = &'a Price>,
        context: &ShopContext,
    ) -> CartPrice {
        let mut line_total = Money::zero();
        let mut calculated_taxes = CalculatedTaxCollection::new();
        let mut tax_rules = TaxRuleCollection::new();

        for price in prices {
            line_total += price.total_price;
            calculated_taxes.merge(&price.calculated_taxes);
            tax_rules.merge(&price.tax_rules);
        }

        let tax_amount = calculated_taxes.amount();
        let (net_price, total_price) = match context.tax_mode() {
            TaxMode::Inclusive => (line_total - tax_amount, line_total),
            TaxMode::Exclusive => (line_total, line_total + tax_amount),
        };

        CartPrice {
            net_price,
            total_price,
            calculated_taxes,
            tax_rules,
        }
    }
}

// =============================================================================
// Calculated Cart
// =============================================================================

/// A fully calculated cart.
///
/// Built once per calculation from the container and the processor cart;
/// nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedCart {
    container: CartContainer,
    calculated_line_items: CalculatedLineItemCollection,
    deliveries: DeliveryCollection,
    errors: ErrorCollection,
    price: CartPrice,
}

impl CalculatedCart {
    /// Consumes `processor_cart` and prices it.
    pub fn new(container: CartContainer, processor_cart: ProcessorCart, context: &ShopContext) -> Self {
        let (calculated_line_items, deliveries, errors) = processor_cart.into_parts();
        let price = AmountCalculator::new().calculate(calculated_line_items.prices(), context);

        debug!(
            token = %container.token(),
            items = calculated_line_items.len(),
            errors = errors.len(),
            total = %price.total_price,
            "Cart calculated"
        );

        CalculatedCart {
            container,
            calculated_line_items,
            deliveries,
            errors,
            price,
        }
    }

    pub fn container(&self) -> &CartContainer {
        &self.container
    }

    pub fn calculated_line_items(&self) -> &CalculatedLineItemCollection {
        &self.calculated_line_items
    }

    pub fn deliveries(&self) -> &DeliveryCollection {
        &self.deliveries
    }

    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn price(&self) -> &CartPrice {
        &self.price
    }

    pub fn name(&self) -> &str {
        self.container.name()
    }

    pub fn token(&self) -> &str {
        self.container.token()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CustomerGroup;
    use crate::price::{PriceCalculator, PriceDefinition};
    use crate::tax::{TaxRate, TaxRule};

    fn price(net_cents: i64, rate_bps: u32, quantity: i64, context: &ShopContext) -> Price {
        let rules = TaxRuleCollection::from_values([TaxRule::new(TaxRate::from_bps(rate_bps))]);
        let definition =
            PriceDefinition::new(Money::from_cents(net_cents), rules).with_quantity(quantity);
        PriceCalculator::new().calculate(&definition, context).unwrap()
    }

    fn net_context() -> ShopContext {
        ShopContext::default().with_customer_group(CustomerGroup::new("H", TaxMode::Exclusive))
    }

    #[test]
    fn test_empty_cart_is_zero() {
        let cart_price = AmountCalculator::new().calculate(Vec::new(), &ShopContext::default());

        assert!(cart_price.total_price.is_zero());
        assert!(cart_price.net_price.is_zero());
        assert!(cart_price.calculated_taxes.is_empty());
    }

    #[test]
    fn test_gross_mode_totals() {
        let context = ShopContext::default();
        let prices = vec![
            price(1000, 1900, 1, &context),
            price(1000, 700, 2, &context),
            price(1000, 1900, 2, &context),
        ];

        let cart_price = AmountCalculator::new().calculate(&prices, &context);

        // 11.90 + 21.40 + 23.80
        assert_eq!(cart_price.total_price, Money::from_cents(5710));
        assert_eq!(cart_price.calculated_taxes.len(), 2);
        assert_eq!(
            cart_price.calculated_taxes.get(&TaxRate::from_bps(1900)).map(|t| t.tax),
            Some(Money::from_cents(570))
        );
        assert_eq!(cart_price.net_price, Money::from_cents(5710 - 710));
    }

    #[test]
    fn test_net_mode_totals() {
        let context = net_context();
        let prices = vec![price(1000, 1900, 1, &context), price(1000, 700, 2, &context)];

        let cart_price = AmountCalculator::new().calculate(&prices, &context);

        assert_eq!(cart_price.net_price, Money::from_cents(3000));
        assert_eq!(cart_price.tax_amount(), Money::from_cents(190 + 140));
        assert_eq!(cart_price.total_price, Money::from_cents(3330));
    }

    #[test]
    fn test_calculated_cart_from_empty_processor_cart() {
        let container = CartContainer::create_new("sw-cart");
        let cart = CalculatedCart::new(container.clone(), ProcessorCart::new(), &ShopContext::default());

        assert_eq!(cart.token(), container.token());
        assert!(cart.calculated_line_items().is_empty());
        assert!(cart.deliveries().is_empty());
        assert!(cart.errors().is_empty());
        assert!(cart.price().total_price.is_zero());
    }
}
