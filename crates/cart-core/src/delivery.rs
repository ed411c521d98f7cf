//! # Delivery Module
//!
//! Delivery metadata for products and the grouping of calculated products
//! into deliveries.
//!
//! ## Delivery Separation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Calculated products                                                    │
//! │                                                                         │
//! │  SW1  qty 2  stock 10  ──► in stock      ──┐                            │
//! │  SW2  qty 5  stock  1  ──► out of stock  ──┼──┐                         │
//! │  SW3  qty 1  stock  4  ──► in stock      ──┘  │                         │
//! │                                               │                         │
//! │  Deliveries                                   │                         │
//! │  ┌──────────────────────────────┐             │                         │
//! │  │ Mon 10 - Wed 12: SW1, SW3    │ ◄───────────┘ (same delivery date)    │
//! │  └──────────────────────────────┘                                       │
//! │  ┌──────────────────────────────┐                                       │
//! │  │ Mon 24 - Fri 28: SW2         │                                       │
//! │  └──────────────────────────────┘                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::{CartPostProcessor, ProcessorCart};
use crate::collection::KeyedCollection;
use crate::context::ShopContext;
use crate::error::CoreResult;
use crate::price::Price;

// =============================================================================
// Delivery Date
// =============================================================================

/// A delivery window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryDate {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

impl DeliveryDate {
    /// Creates a window; the bounds are swapped if given in reverse order.
    pub fn new(earliest: DateTime<Utc>, latest: DateTime<Utc>) -> Self {
        if earliest <= latest {
            DeliveryDate { earliest, latest }
        } else {
            DeliveryDate {
                earliest: latest,
                latest: earliest,
            }
        }
    }
}

// =============================================================================
// Delivery Information
// =============================================================================

/// Physical and logistic data of a product, as delivered by a delivery gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryInformation {
    pub stock: i64,
    pub height: f64,
    pub width: f64,
    pub length: f64,
    pub weight: f64,
    /// Window used when the stock covers the ordered quantity.
    pub in_stock_delivery_date: DeliveryDate,
    /// Window used otherwise.
    pub out_of_stock_delivery_date: DeliveryDate,
}

impl DeliveryInformation {
    pub fn new(
        stock: i64,
        height: f64,
        width: f64,
        length: f64,
        weight: f64,
        in_stock_delivery_date: DeliveryDate,
        out_of_stock_delivery_date: DeliveryDate,
    ) -> Self {
        DeliveryInformation {
            stock,
            height,
            width,
            length,
            weight,
            in_stock_delivery_date,
            out_of_stock_delivery_date,
        }
    }

    /// The delivery window for ordering `quantity` units.
    pub fn delivery_date_for(&self, quantity: i64) -> DeliveryDate {
        if self.stock >= quantity {
            self.in_stock_delivery_date
        } else {
            self.out_of_stock_delivery_date
        }
    }
}

/// Delivery information keyed by line item identifier.
pub type DeliveryInformationCollection = KeyedCollection<String, DeliveryInformation>;

// =============================================================================
// Delivery
// =============================================================================

/// One calculated line item inside a delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPosition {
    pub identifier: String,
    pub quantity: i64,
    pub price: Price,
}

/// Line items that ship together with the same delivery window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub delivery_date: DeliveryDate,
    pub positions: KeyedCollection<String, DeliveryPosition>,
}

impl Delivery {
    pub fn new(delivery_date: DeliveryDate) -> Self {
        Delivery {
            delivery_date,
            positions: KeyedCollection::new(),
        }
    }
}

/// Deliveries of one cart, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryCollection {
    deliveries: Vec<Delivery>,
}

impl DeliveryCollection {
    pub fn new() -> Self {
        DeliveryCollection::default()
    }

    pub fn add(&mut self, delivery: Delivery) {
        self.deliveries.push(delivery);
    }

    /// The delivery with exactly this window, if any.
    pub fn get_mut(&mut self, delivery_date: &DeliveryDate) -> Option<&mut Delivery> {
        self.deliveries
            .iter_mut()
            .find(|delivery| &delivery.delivery_date == delivery_date)
    }

    /// Whether any delivery already contains `identifier`.
    pub fn contains(&self, identifier: &str) -> bool {
        self.deliveries
            .iter()
            .any(|delivery| delivery.positions.contains_key(&identifier.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Delivery> {
        self.deliveries.iter()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }
}

// =============================================================================
// Delivery Separator
// =============================================================================

/// Post-processor that groups deliverable calculated line items by their
/// delivery window.
///
/// Items that already sit in a delivery are left alone, so running the
/// separator twice is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliverySeparator;

impl DeliverySeparator {
    pub fn new() -> Self {
        DeliverySeparator
    }
}

impl CartPostProcessor for DeliverySeparator {
    fn process(&self, cart: &mut ProcessorCart, _context: &ShopContext) -> CoreResult<()> {
        let pending: Vec<(DeliveryDate, DeliveryPosition)> = cart
            .calculated_line_items()
            .values()
            .filter(|item| !cart.deliveries().contains(item.identifier()))
            .filter_map(|item| {
                let information = item.delivery_information()?;
                Some((
                    information.delivery_date_for(item.quantity()),
                    DeliveryPosition {
                        identifier: item.identifier().to_string(),
                        quantity: item.quantity(),
                        price: item.price().clone(),
                    },
                ))
            })
            .collect();

        for (delivery_date, position) in pending {
            debug!(
                identifier = %position.identifier,
                earliest = %delivery_date.earliest,
                "Assigning line item to delivery"
            );

            let deliveries = cart.deliveries_mut();
            match deliveries.get_mut(&delivery_date) {
                Some(delivery) => {
                    delivery.positions.insert(position.identifier.clone(), position);
                }
                None => {
                    let mut delivery = Delivery::new(delivery_date);
                    delivery.positions.insert(position.identifier.clone(), position);
                    deliveries.add(delivery);
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::{CalculatedLineItem, LineItem};
    use crate::money::Money;
    use crate::product::CalculatedProduct;
    use crate::tax::{CalculatedTaxCollection, TaxRuleCollection};
    use chrono::{Duration, TimeZone};

    fn window(start_day: u32, days: i64) -> DeliveryDate {
        let earliest = Utc.with_ymd_and_hms(2026, 3, start_day, 0, 0, 0).unwrap();
        DeliveryDate::new(earliest, earliest + Duration::days(days))
    }

    fn information(stock: i64) -> DeliveryInformation {
        DeliveryInformation::new(stock, 0.0, 0.0, 0.0, 1.5, window(2, 2), window(16, 4))
    }

    fn product(identifier: &str, quantity: i64, stock: i64) -> CalculatedLineItem {
        let price = Price::new(
            Money::from_cents(100),
            Money::from_cents(100 * quantity),
            CalculatedTaxCollection::new(),
            TaxRuleCollection::new(),
            quantity,
        );
        CalculatedProduct::new(
            LineItem::new(identifier, "product", quantity).unwrap(),
            price,
            information(stock),
        )
        .into()
    }

    #[test]
    fn test_delivery_date_swaps_reversed_bounds() {
        let a = Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let date = DeliveryDate::new(a, b);
        assert_eq!(date.earliest, b);
        assert_eq!(date.latest, a);
    }

    #[test]
    fn test_delivery_date_for_quantity() {
        let info = information(3);
        assert_eq!(info.delivery_date_for(3), window(2, 2));
        assert_eq!(info.delivery_date_for(4), window(16, 4));
    }

    #[test]
    fn test_separator_groups_by_delivery_date() {
        let mut cart = ProcessorCart::new();
        cart.add_calculated_line_item(product("SW1", 2, 10));
        cart.add_calculated_line_item(product("SW2", 5, 1));
        cart.add_calculated_line_item(product("SW3", 1, 4));

        DeliverySeparator::new()
            .process(&mut cart, &ShopContext::default())
            .unwrap();

        let deliveries: Vec<_> = cart.deliveries().iter().collect();
        assert_eq!(deliveries.len(), 2);

        let in_stock: Vec<_> = deliveries[0].positions.keys().cloned().collect();
        assert_eq!(in_stock, vec!["SW1", "SW3"]);
        assert_eq!(deliveries[0].delivery_date, window(2, 2));

        let out_of_stock: Vec<_> = deliveries[1].positions.keys().cloned().collect();
        assert_eq!(out_of_stock, vec!["SW2"]);
    }

    #[test]
    fn test_separator_is_idempotent() {
        let mut cart = ProcessorCart::new();
        cart.add_calculated_line_item(product("SW1", 1, 10));

        let separator = DeliverySeparator::new();
        separator.process(&mut cart, &ShopContext::default()).unwrap();
        separator.process(&mut cart, &ShopContext::default()).unwrap();

        assert_eq!(cart.deliveries().len(), 1);
        assert_eq!(cart.deliveries().iter().next().map(|d| d.positions.len()), Some(1));
    }
}
