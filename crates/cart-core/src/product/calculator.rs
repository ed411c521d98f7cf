//! # Product Calculator
//!
//! Resolves product line items against the price and delivery gateways.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line items [SW1, SW2, SW3]                                             │
//! │       │                                                                 │
//! │  1.   ▼  PriceGateway.get([SW1, SW2, SW3])        one batched call      │
//! │  2.   missing price      → ProductPriceNotFound(SW2), (SW3)             │
//! │  3.   PriceCalculator    → Price for SW1 (quantity + tax mode applied)  │
//! │       invalid price      → ProductPriceInvalid                          │
//! │  4.   DeliveryGateway.get([SW1])                  one batched call      │
//! │       missing delivery   → ProductDeliveryInformationNotFound           │
//! │  5.   CalculatedProduct for SW1, in input order                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cart::{CartError, ErrorCollection};
use crate::context::ShopContext;
use crate::error::CoreResult;
use crate::line_item::{CalculatedLineItemCollection, LineItem, LineItemCollection};
use crate::price::{Price, PriceCalculator};
use crate::product::calculated::CalculatedProduct;
use crate::product::gateway::{DeliveryGateway, PriceGateway};

/// Calculated products plus the errors for the products that could not be
/// calculated.
pub type ProductCalculation = (CalculatedLineItemCollection, ErrorCollection);

/// Turns product line items into calculated products.
#[derive(Clone)]
pub struct ProductCalculator {
    price_gateway: Arc<dyn PriceGateway>,
    delivery_gateway: Arc<dyn DeliveryGateway>,
    price_calculator: PriceCalculator,
}

impl ProductCalculator {
    pub fn new(
        price_gateway: Arc<dyn PriceGateway>,
        delivery_gateway: Arc<dyn DeliveryGateway>,
    ) -> Self {
        ProductCalculator {
            price_gateway,
            delivery_gateway,
            price_calculator: PriceCalculator::new(),
        }
    }

    /// Calculates every line item in `line_items`.
    ///
    /// Items without a usable price or without delivery information are
    /// left out and reported in the returned [`ErrorCollection`].
    ///
    /// ## Errors
    /// Only gateway failures abort the batch.
    pub fn calculate(
        &self,
        line_items: &LineItemCollection,
        context: &ShopContext,
    ) -> CoreResult<ProductCalculation> {
        let mut errors = ErrorCollection::new();

        if line_items.is_empty() {
            return Ok((CalculatedLineItemCollection::new(), errors));
        }

        let identifiers = line_items.identifiers();
        let definitions = self.price_gateway.get(&identifiers, context)?;

        let mut priced: Vec<(&LineItem, Price)> = Vec::with_capacity(line_items.len());
        for item in line_items.values() {
            let Some(definition) = definitions.get(&item.identifier().to_string()) else {
                debug!(identifier = %item.identifier(), "No price definition");
                errors.add(CartError::product_price_not_found(item.identifier()));
                continue;
            };

            let definition = definition.clone().with_quantity(item.quantity());
            match self.price_calculator.calculate(&definition, context) {
                Ok(price) => priced.push((item, price)),
                Err(e) => {
                    warn!(identifier = %item.identifier(), error = %e, "Invalid price definition");
                    errors.add(CartError::product_price_invalid(item.identifier(), e.to_string()));
                }
            }
        }

        let mut calculated = CalculatedLineItemCollection::new();
        if priced.is_empty() {
            warn!(count = line_items.len(), "No product in batch has a price");
            return Ok((calculated, errors));
        }

        let priced_identifiers: Vec<String> = priced
            .iter()
            .map(|(item, _)| item.identifier().to_string())
            .collect();
        let mut information = self.delivery_gateway.get(&priced_identifiers, context)?;

        for (item, price) in priced {
            let Some(delivery_information) = information.remove(&item.identifier().to_string())
            else {
                debug!(identifier = %item.identifier(), "No delivery information");
                errors.add(CartError::product_delivery_information_not_found(
                    item.identifier(),
                ));
                continue;
            };

            calculated.add(CalculatedProduct::new(item.clone(), price, delivery_information).into());
        }

        debug!(
            requested = line_items.len(),
            calculated = calculated.len(),
            errors = errors.len(),
            "Products calculated"
        );

        Ok((calculated, errors))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
