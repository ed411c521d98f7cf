//! # Rule Engine
//!
//! Boolean predicates over a calculated cart, e.g. "cart total ≥ 100.00"
//! for a shipping-free threshold or a voucher condition.
//!
//! ## Evaluation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RuleCollection                                                         │
//! │  ├── "free-shipping"  OrderAmountRule { 100.00, ">=" }                  │
//! │  ├── "b2b-only"       CustomerGroupRule { ["H"] }                       │
//! │  └── "bundle"         ProductOfCartRule { ["SW1"] }                     │
//! │         │                                                               │
//! │         ▼  evaluate_all(calculated_cart, context, data)                 │
//! │  { "free-shipping": true, "b2b-only": false, "bundle": true }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules are pure: no I/O, no mutation, any evaluation order. A rule with
//! an operator it does not know fails the evaluation with
//! [`CoreError::UnsupportedOperator`](crate::error::CoreError::UnsupportedOperator)
//! instead of silently returning `false`.

mod amount;
mod customer;
mod goods;
mod operator;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use crate::cart::CalculatedCart;
use crate::collection::KeyedCollection;
use crate::context::ShopContext;
use crate::error::CoreResult;

pub use amount::{GoodsPriceRule, OrderAmountRule};
pub use customer::CustomerGroupRule;
pub use goods::{GoodsCountRule, ProductOfCartRule};
pub use operator::{Operator, ParseOperatorError};

// =============================================================================
// Rule Trait
// =============================================================================

/// A stateless predicate over a calculated cart.
pub trait Rule: Send + Sync {
    /// Rule name used in error messages.
    fn name(&self) -> &'static str;

    fn matches(
        &self,
        cart: &CalculatedCart,
        context: &ShopContext,
        data: &RuleDataCollection,
    ) -> CoreResult<bool>;
}

// =============================================================================
// Rule Data
// =============================================================================

/// Extra data rules may consult, keyed by name (JSON values).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleDataCollection {
    data: KeyedCollection<String, Value>,
}

impl RuleDataCollection {
    pub fn new() -> Self {
        RuleDataCollection::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(&key.to_string())
    }

    /// Deserializes the entry for `key`; `None` if missing or of another shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// =============================================================================
// Rule Collection
// =============================================================================

/// Independent rules keyed by rule id.
#[derive(Default)]
pub struct RuleCollection {
    rules: KeyedCollection<String, Box<dyn Rule>>,
}

impl RuleCollection {
    pub fn new() -> Self {
        RuleCollection::default()
    }

    pub fn with_rule(mut self, id: impl Into<String>, rule: impl Rule + 'static) -> Self {
        self.add(id, rule);
        self
    }

    /// Adds a rule, replacing any rule with the same id.
    pub fn add(&mut self, id: impl Into<String>, rule: impl Rule + 'static) {
        self.rules.insert(id.into(), Box::new(rule));
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.rules.keys()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluates every rule against the same cart.
    ///
    /// ## Errors
    /// The first rule that fails aborts the evaluation.
    pub fn evaluate_all(
        &self,
        cart: &CalculatedCart,
        context: &ShopContext,
        data: &RuleDataCollection,
    ) -> CoreResult<KeyedCollection<String, bool>> {
        self.rules
            .iter()
            .map(|(id, rule)| Ok((id.clone(), rule.matches(cart, context, data)?)))
            .collect()
    }
}

impl fmt::Debug for RuleCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<_> = self.rules.iter().map(|(id, rule)| (id, rule.name())).collect();

        f.debug_struct("RuleCollection").field("rules", &rules).finish()
    }
}

// =============================================================================
// Test Support
// =============================================================================


// =============================================================================
// Unit Tests
// =============================================================================
