//! # Product Module
//!
//! Everything needed to turn `"product"` line items into calculated
//! products: the gateway traits, the calculator and the line item processor.
//!
//! ```text
//! ProductProcessor ──► ProductCalculator ──┬──► PriceGateway
//!                                          ├──► PriceCalculator
//!                                          └──► DeliveryGateway
//! ```

mod calculated;
mod calculator;
mod gateway;
mod processor;

pub use calculated::CalculatedProduct;
pub use calculator::{ProductCalculation, ProductCalculator};
pub use gateway::{DeliveryGateway, PriceGateway, StaticDeliveryGateway, StaticPriceGateway};
pub use processor::ProductProcessor;

/// Type tag of product line items.
pub const TYPE_PRODUCT: &str = "product";
