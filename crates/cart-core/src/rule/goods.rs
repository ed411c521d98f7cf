//! Rules over the products in the cart.

use serde::{Deserialize, Serialize};

use crate::cart::CalculatedCart;
use crate::context::ShopContext;
use crate::error::CoreResult;
use crate::rule::operator::Operator;
use crate::rule::{Rule, RuleDataCollection};

/// Compares the number of calculated products with `count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsCountRule {
    count: usize,
    operator: String,
}

impl GoodsCountRule {
    pub const NAME: &'static str = "GoodsCountRule";

    pub fn new(count: usize, operator: impl Into<String>) -> Self {
        GoodsCountRule {
            count,
            operator: operator.into(),
        }
    }
}

impl Rule for GoodsCountRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn matches(
        &self,
        cart: &CalculatedCart,
        _context: &ShopContext,
        _data: &RuleDataCollection,
    ) -> CoreResult<bool> {
        let operator = Operator::parse_for(&self.operator, Self::NAME)?;
        let count = cart.calculated_line_items().products().count();
        Ok(operator.compare(&count, &self.count))
    }
}

/// Matches when at least one of `identifiers` was calculated.
///
/// Products that failed calculation (no price, no delivery data) don't count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOfCartRule {
    identifiers: Vec<String>,
}

impl ProductOfCartRule {
    pub const NAME: &'static str = "ProductOfCartRule";

    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ProductOfCartRule {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for ProductOfCartRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn matches(
        &self,
        cart: &CalculatedCart,
        _context: &ShopContext,
        _data: &RuleDataCollection,
    ) -> CoreResult<bool> {
        let items = cart.calculated_line_items();
        Ok(self.identifiers.iter().any(|id| items.contains_key(id)))
    }
}
