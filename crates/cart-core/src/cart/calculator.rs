//! # Cart Calculator
//!
//! Entry point of the pipeline: container in, calculated cart out.
//!
//! ```text
//! CartContainer ──► ProcessorCart::new()
//!                        │
//!                        ▼
//!                   CartProcessor.process()   (line item processors,
//!                        │                      delivery separation)
//!                        ▼
//!                   CalculatedCart::new()     (amount calculation)
//! ```

use std::sync::Arc;

use tracing::info;

use crate::cart::calculated::CalculatedCart;
use crate::cart::container::CartContainer;
use crate::cart::processor::CartProcessor;
use crate::cart::processor_cart::ProcessorCart;
use crate::context::ShopContext;
use crate::delivery::DeliverySeparator;
use crate::error::CoreResult;
use crate::product::{DeliveryGateway, PriceGateway, ProductCalculator, ProductProcessor};

/// Calculates carts with a configured [`CartProcessor`].
#[derive(Debug, Clone)]
pub struct CartCalculator {
    processor: CartProcessor,
}

impl CartCalculator {
    pub fn new(processor: CartProcessor) -> Self {
        CartCalculator { processor }
    }

    /// The default pipeline: a product processor over the given gateways,
    /// followed by delivery separation.
    pub fn with_gateways(
        price_gateway: Arc<dyn PriceGateway>,
        delivery_gateway: Arc<dyn DeliveryGateway>,
    ) -> Self {
        let products = ProductProcessor::new(ProductCalculator::new(price_gateway, delivery_gateway));

        CartCalculator::new(
            CartProcessor::new()
                .with_processor(Arc::new(products))
                .with_post_processor(Arc::new(DeliverySeparator::new())),
        )
    }

    pub fn processor(&self) -> &CartProcessor {
        &self.processor
    }

    /// Recalculates `container` from scratch.
    ///
    /// ## Errors
    /// Only hard failures (gateway down, invalid price data). Missing data
    /// for single line items ends up in [`CalculatedCart::errors`].
    pub fn calculate(&self, container: &CartContainer, context: &ShopContext) -> CoreResult<CalculatedCart> {
        let mut processor_cart = ProcessorCart::new();
        self.processor.process(container, &mut processor_cart, context)?;

        let cart = CalculatedCart::new(container.clone(), processor_cart, context);

        info!(
            token = %cart.token(),
            line_items = container.line_items().len(),
            calculated = cart.calculated_line_items().len(),
            errors = cart.errors().len(),
            "Cart calculation finished"
        );

        Ok(cart)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
