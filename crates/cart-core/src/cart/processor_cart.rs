//! # Processor Cart
//!
//! The mutable accumulator of one cart calculation.
//!
//! ## Ownership
//! ```text
//! CartCalculator::calculate()
//!      │
//!      ├── ProcessorCart::new()                 ← created empty
//!      │
//!      ├── CartProcessor::process(&mut cart)    ← line item processors
//!      │        └── post-processors (&mut cart)    merge into it
//!      │
//!      └── CalculatedCart::new(container, cart) ← consumed, then gone
//! ```
//!
//! It is never shared between requests and never stored.

use crate::cart::error::{CartError, ErrorCollection};
use crate::delivery::DeliveryCollection;
use crate::line_item::{CalculatedLineItem, CalculatedLineItemCollection};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessorCart {
    calculated_line_items: CalculatedLineItemCollection,
    deliveries: DeliveryCollection,
    errors: ErrorCollection,
}

impl ProcessorCart {
    pub fn new() -> Self {
        ProcessorCart::default()
    }

    pub fn calculated_line_items(&self) -> &CalculatedLineItemCollection {
        &self.calculated_line_items
    }

    pub fn deliveries(&self) -> &DeliveryCollection {
        &self.deliveries
    }

    pub fn deliveries_mut(&mut self) -> &mut DeliveryCollection {
        &mut self.deliveries
    }

    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn add_calculated_line_item(&mut self, item: CalculatedLineItem) {
        self.calculated_line_items.add(item);
    }

    /// Merges a processor's calculated line items, keeping their order.
    pub fn add_calculated_line_items(&mut self, items: CalculatedLineItemCollection) {
        self.calculated_line_items.extend_from(items);
    }

    pub fn add_error(&mut self, error: CartError) {
        self.errors.add(error);
    }

    pub fn add_errors(&mut self, errors: ErrorCollection) {
        self.errors.extend_from(errors);
    }

    /// Splits the accumulator into its parts.
    pub fn into_parts(self) -> (CalculatedLineItemCollection, DeliveryCollection, ErrorCollection) {
        (self.calculated_line_items, self.deliveries, self.errors)
    }
}
