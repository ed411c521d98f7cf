//! # Cart Processor
//!
//! Dispatches line items to the processor registered for their type tag.
//!
//! ## Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartContainer line items                                               │
//! │  SW1 (product) · DISCOUNT-5 (discount) · SW2 (product)                  │
//! │       │                                                                 │
//! │       ▼  group_by_type()                                                │
//! │  "product"  → [SW1, SW2] ──► registry["product"]  → ProductProcessor    │
//! │  "discount" → [DISCOUNT-5] ► registry["discount"] → (not registered:    │
//! │                                                     skipped, warned)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  post-processors, in registration order                                 │
//! │  └── DeliverySeparator                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProcessorCart { calculated items, deliveries, errors }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! New line item types plug in by registering a [`LineItemProcessor`];
//! the dispatcher itself never changes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cart::container::CartContainer;
use crate::cart::processor_cart::ProcessorCart;
use crate::context::ShopContext;
use crate::error::CoreResult;
use crate::line_item::LineItemCollection;

// =============================================================================
// Processor Traits
// =============================================================================

/// Calculates all line items of one type tag.
///
/// Implementations receive the whole batch at once so that they can fetch
/// upstream data with a single gateway call. Per-item data gaps go into
/// `cart` as [`CartError`](crate::cart::CartError)s; an `Err` aborts the
/// whole calculation.
pub trait LineItemProcessor: Send + Sync {
    /// The type tag this processor handles.
    fn type_tag(&self) -> &str;

    fn process(
        &self,
        line_items: &LineItemCollection,
        cart: &mut ProcessorCart,
        context: &ShopContext,
    ) -> CoreResult<()>;
}

/// Runs after all line item processors, on the merged processor cart.
pub trait CartPostProcessor: Send + Sync {
    fn process(&self, cart: &mut ProcessorCart, context: &ShopContext) -> CoreResult<()>;
}

// =============================================================================
// Cart Processor
// =============================================================================

/// Registry of line item processors keyed by type tag, plus post-processors.
#[derive(Clone, Default)]
pub struct CartProcessor {
    processors: HashMap<String, Arc<dyn LineItemProcessor>>,
    post_processors: Vec<Arc<dyn CartPostProcessor>>,
}

impl CartProcessor {
    pub fn new() -> Self {
        CartProcessor::default()
    }

    /// Registers `processor` for its type tag, replacing a previous one.
    pub fn with_processor(mut self, processor: Arc<dyn LineItemProcessor>) -> Self {
        self.register(processor);
        self
    }

    pub fn with_post_processor(mut self, post_processor: Arc<dyn CartPostProcessor>) -> Self {
        self.post_processors.push(post_processor);
        self
    }

    /// Registers `processor` and returns the one it replaced, if any.
    pub fn register(
        &mut self,
        processor: Arc<dyn LineItemProcessor>,
    ) -> Option<Arc<dyn LineItemProcessor>> {
        let type_tag = processor.type_tag().to_string();
        self.processors.insert(type_tag, processor)
    }

    pub fn supports(&self, type_tag: &str) -> bool {
        self.processors.contains_key(type_tag)
    }

    /// Processes every line item of `container` into `cart`.
    ///
    /// ## Guarantees
    /// - Each type group is dispatched exactly once, in order of first
    ///   appearance in the cart
    /// - Errors from all groups accumulate in `cart`
    /// - An empty container dispatches nothing
    pub fn process(
        &self,
        container: &CartContainer,
        cart: &mut ProcessorCart,
        context: &ShopContext,
    ) -> CoreResult<()> {
        for (type_tag, line_items) in container.line_items().group_by_type() {
            let Some(processor) = self.processors.get(&type_tag) else {
                warn!(
                    type_tag = %type_tag,
                    count = line_items.len(),
                    "No processor registered for line item type, skipping"
                );
                continue;
            };

            debug!(type_tag = %type_tag, count = line_items.len(), "Processing line items");
            processor.process(&line_items, cart, context)?;
        }

        for post_processor in &self.post_processors {
            post_processor.process(cart, context)?;
        }

        Ok(())
    }
}

impl fmt::Debug for CartProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut type_tags: Vec<_> = self.processors.keys().collect();
        type_tags.sort();

        f.debug_struct("CartProcessor")
            .field("processors", &type_tags)
            .field("post_processors", &self.post_processors.len())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::error::CartError;
    use crate::line_item::LineItem;
    use std::sync::Mutex;

    /// Records every batch it receives and reports each item as unpriced.
    struct RecordingProcessor {
        type_tag: String,
        batches: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingProcessor {
        fn new(type_tag: &str) -> Arc<Self> {
            Arc::new(RecordingProcessor {
                type_tag: type_tag.to_string(),
                batches: Mutex::new(Vec::new()),
            })
        }

        fn batches(&self) -> Vec<Vec<String>> {
            self.batches.lock().unwrap().clone()
        }
    }

    impl LineItemProcessor for RecordingProcessor {
        fn type_tag(&self) -> &str {
            &self.type_tag
        }

        fn process(
            &self,
            line_items: &LineItemCollection,
            cart: &mut ProcessorCart,
            _context: &ShopContext,
        ) -> CoreResult<()> {
            self.batches.lock().unwrap().push(line_items.identifiers());
            for identifier in line_items.keys() {
                cart.add_error(CartError::product_price_not_found(identifier.clone()));
            }
            Ok(())
        }
    }

    fn container(items: &[(&str, &str)]) -> CartContainer {
        let items = items
            .iter()
            .map(|(id, tag)| LineItem::new(*id, *tag, 1).unwrap())
            .collect();
        CartContainer::create_existing("test", "test", items).unwrap()
    }

    #[test]
    fn test_empty_cart_dispatches_nothing() {
        let products = RecordingProcessor::new("product");
        let processor = CartProcessor::new().with_processor(products.clone());

        let mut cart = ProcessorCart::new();
        processor
            .process(&container(&[]), &mut cart, &ShopContext::default())
            .unwrap();

        assert!(products.batches().is_empty());
        assert!(cart.calculated_line_items().is_empty());
        assert!(cart.errors().is_empty());
    }

    #[test]
    fn test_dispatches_one_batch_per_type() {
        let products = RecordingProcessor::new("product");
        let discounts = RecordingProcessor::new("discount");
        let processor = CartProcessor::new()
            .with_processor(products.clone())
            .with_processor(discounts.clone());

        let mut cart = ProcessorCart::new();
        processor
            .process(
                &container(&[("SW1", "product"), ("D1", "discount"), ("SW2", "product")]),
                &mut cart,
                &ShopContext::default(),
            )
            .unwrap();

        assert_eq!(products.batches(), vec![vec!["SW1", "SW2"]]);
        assert_eq!(discounts.batches(), vec![vec!["D1"]]);

        // Errors accumulate across all batches, product group first.
        let errored: Vec<_> = cart.errors().iter().map(|e| e.identifier().to_string()).collect();
        assert_eq!(errored, vec!["SW1", "SW2", "D1"]);
    }

    #[test]
    fn test_unregistered_type_is_skipped() {
        let products = RecordingProcessor::new("product");
        let processor = CartProcessor::new().with_processor(products.clone());

        let mut cart = ProcessorCart::new();
        processor
            .process(
                &container(&[("SW1", "product"), ("SHIP", "shipping")]),
                &mut cart,
                &ShopContext::default(),
            )
            .unwrap();

        assert_eq!(products.batches(), vec![vec!["SW1"]]);
        assert_eq!(cart.errors().len(), 1);
        assert!(!processor.supports("shipping"));
    }

    #[test]
    fn test_register_replaces_processor() {
        let mut processor = CartProcessor::new();
        assert!(processor.register(RecordingProcessor::new("product")).is_none());
        assert!(processor.register(RecordingProcessor::new("product")).is_some());
    }

    #[test]
    fn test_post_processors_run_after_dispatch() {
        struct CountingPostProcessor(Mutex<Vec<usize>>);

        impl CartPostProcessor for CountingPostProcessor {
            fn process(&self, cart: &mut ProcessorCart, _context: &ShopContext) -> CoreResult<()> {
                self.0.lock().unwrap().push(cart.errors().len());
                Ok(())
            }
        }

        let post = Arc::new(CountingPostProcessor(Mutex::new(Vec::new())));
        let processor = CartProcessor::new()
            .with_processor(RecordingProcessor::new("product"))
            .with_post_processor(post.clone());

        let mut cart = ProcessorCart::new();
        processor
            .process(&container(&[("SW1", "product")]), &mut cart, &ShopContext::default())
            .unwrap();

        assert_eq!(*post.0.lock().unwrap(), vec![1]);
    }
}
