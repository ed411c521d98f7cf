//! # Cart Module
//!
//! The cart side of the pipeline: the raw container, the processor cart
//! that collects results, the processor registry and the calculated cart.
//!
//! ## Module Structure
//! ```text
//! cart/
//! ├── container.rs       - CartContainer (name, token, raw line items)
//! ├── error.rs           - CartError, ErrorCollection
//! ├── processor_cart.rs  - ProcessorCart accumulator
//! ├── processor.rs       - LineItemProcessor / CartPostProcessor, registry
//! ├── calculated.rs      - CalculatedCart, CartPrice, AmountCalculator
//! └── calculator.rs      - CartCalculator (entry point)
//! ```

mod calculated;
mod calculator;
mod container;
mod error;
mod processor;
mod processor_cart;

pub use calculated::{AmountCalculator, CalculatedCart, CartPrice};
pub use calculator::CartCalculator;
pub use container::{CartContainer, DEFAULT_CART_NAME};
pub use error::{CartError, ErrorCollection};
pub use processor::{CartPostProcessor, CartProcessor, LineItemProcessor};
pub use processor_cart::ProcessorCart;
