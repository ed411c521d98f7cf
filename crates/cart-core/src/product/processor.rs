//! Line item processor for the `"product"` type tag.

use crate::cart::{LineItemProcessor, ProcessorCart};
use crate::context::ShopContext;
use crate::error::CoreResult;
use crate::line_item::LineItemCollection;
use crate::product::calculator::ProductCalculator;
use crate::product::TYPE_PRODUCT;

/// Feeds product line items through the [`ProductCalculator`] and merges
/// the result into the processor cart.
#[derive(Clone)]
pub struct ProductProcessor {
    calculator: ProductCalculator,
}

impl ProductProcessor {
    pub fn new(calculator: ProductCalculator) -> Self {
        ProductProcessor { calculator }
    }
}

impl LineItemProcessor for ProductProcessor {
    fn type_tag(&self) -> &str {
        TYPE_PRODUCT
    }

    fn process(
        &self,
        line_items: &LineItemCollection,
        cart: &mut ProcessorCart,
        context: &ShopContext,
    ) -> CoreResult<()> {
        let products = line_items.filter_type(TYPE_PRODUCT);
        let (calculated, errors) = self.calculator.calculate(&products, context)?;

        cart.add_calculated_line_items(calculated);
        cart.add_errors(errors);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartError;
    use crate::line_item::LineItem;
    use crate::product::{StaticDeliveryGateway, StaticPriceGateway};
    use std::sync::Arc;

    #[test]
    fn test_ignores_foreign_type_tags() {
        let processor = ProductProcessor::new(ProductCalculator::new(
            Arc::new(StaticPriceGateway::new()),
            Arc::new(StaticDeliveryGateway::new()),
        ));

        let items = LineItemCollection::from(vec![
            LineItem::new("SW1", "product", 1).unwrap(),
            LineItem::new("VOUCHER", "discount", 1).unwrap(),
        ]);

        let mut cart = ProcessorCart::new();
        processor.process(&items, &mut cart, &ShopContext::default()).unwrap();

        let errors: Vec<_> = cart.errors().iter().cloned().collect();
        assert_eq!(errors, vec![CartError::product_price_not_found("SW1")]);
    }
}
