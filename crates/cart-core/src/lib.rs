//! # cart-core: Pure Cart Calculation Pipeline
//!
//! This crate turns the raw line items of a shopping cart into calculated
//! line items (priced, taxed, grouped into deliveries), collects per item
//! errors without aborting the cart, and evaluates business rules against
//! the result.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Engine Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ cart-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   CartContainer ──► CartCalculator ──► CalculatedCart ──► Rules │   │
//! │  │                          │                                      │   │
//! │  │            ┌─────────────┼──────────────┐                       │   │
//! │  │            ▼             ▼              ▼                       │   │
//! │  │     CartProcessor  ProductCalculator  AmountCalculator          │   │
//! │  │                          │                                      │   │
//! │  │                          ▼                                      │   │
//! │  │            PriceGateway / DeliveryGateway (traits)              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cart-db (Database Layer)                     │   │
//! │  │        SQLite attribute loader/persister, migrations            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Container, processor cart, processor registry, calculated cart
//! - [`product`] - Product gateways, calculator and line item processor
//! - [`rule`] - Rule engine
//! - [`line_item`] - Raw and calculated line items
//! - [`price`] - Price definitions, prices and the price calculator
//! - [`delivery`] - Delivery information and delivery separation
//! - [`money`] / [`tax`] - Integer money and basis point tax rates
//! - [`collection`] - Insertion-ordered keyed collections
//! - [`context`] - Request-scoped shop context
//! - [`error`] / [`validation`] - Hard failures and input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use cart_core::cart::{CartCalculator, CartContainer, CartError, DEFAULT_CART_NAME};
//! use cart_core::context::ShopContext;
//! use cart_core::line_item::LineItem;
//! use cart_core::money::Money;
//! use cart_core::price::PriceDefinition;
//! use cart_core::product::{StaticDeliveryGateway, StaticPriceGateway};
//! use cart_core::tax::{TaxRate, TaxRule, TaxRuleCollection};
//!
//! let rules = TaxRuleCollection::from_values([TaxRule::new(TaxRate::from_bps(1900))]);
//! let calculator = CartCalculator::with_gateways(
//!     Arc::new(StaticPriceGateway::new()
//!         .with_price("SW1", PriceDefinition::new(Money::from_cents(1000), rules))),
//!     Arc::new(StaticDeliveryGateway::new()),
//! );
//!
//! let mut container = CartContainer::create_new(DEFAULT_CART_NAME);
//! container.add_line_item(LineItem::new("SW1", "product", 1).unwrap()).unwrap();
//!
//! let cart = calculator.calculate(&container, &ShopContext::default()).unwrap();
//!
//! // Priced, but the delivery gateway doesn't know SW1.
//! assert!(cart.calculated_line_items().is_empty());
//! assert_eq!(
//!     cart.errors().iter().next(),
//!     Some(&CartError::product_delivery_information_not_found("SW1"))
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod collection;
pub mod context;
pub mod delivery;
pub mod error;
pub mod line_item;
pub mod money;
pub mod price;
pub mod product;
pub mod rule;
pub mod tax;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CalculatedCart, CartCalculator, CartContainer, CartError};
pub use context::ShopContext;
pub use error::{CoreError, CoreResult, GatewayError, ValidationError};
pub use line_item::LineItem;
pub use money::Money;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single cart.
///
/// Keeps gateway batches bounded.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest line total (in cents) the price calculator accepts.
///
/// Together with [`MAX_CART_ITEMS`] this keeps every cart total, and the
/// taxes on it, far inside the `i64` range.
pub const MAX_LINE_TOTAL_CENTS: i64 = 1_000_000_000_000_000;

/// Currency used when a [`ShopContext`] is created without one.
pub const DEFAULT_CURRENCY: &str = "EUR";
