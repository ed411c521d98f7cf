//! Rules comparing cart amounts against a configured threshold.

use serde::{Deserialize, Serialize};

use crate::cart::CalculatedCart;
use crate::context::ShopContext;
use crate::error::CoreResult;
use crate::money::Money;
use crate::rule::operator::Operator;
use crate::rule::{Rule, RuleDataCollection};

/// Compares the cart's total price with `amount`.
///
/// ```rust
/// use cart_core::money::Money;
/// use cart_core::rule::OrderAmountRule;
///
/// // Free shipping from 100.00 on
/// let rule = OrderAmountRule::new(Money::from_major_minor(100, 0), ">=");
/// assert_eq!(rule.operator(), ">=");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAmountRule {
    amount: Money,
    operator: String,
}

impl OrderAmountRule {
    pub const NAME: &'static str = "OrderAmountRule";

    pub fn new(amount: Money, operator: impl Into<String>) -> Self {
        OrderAmountRule {
            amount,
            operator: operator.into(),
        }
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }
}

impl Rule for OrderAmountRule {
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
        Ok(operator.compare(&cart.price().total_price, &self.amount))
    }
}

/// Compares the summed total of all products (goods value, without
/// surcharges or discounts) with `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsPriceRule {
    amount: Money,
    operator: String,
}

impl GoodsPriceRule {
    pub const NAME: &'static str = "GoodsPriceRule";

    pub fn new(amount: Money, operator: impl Into<String>) -> Self {
        GoodsPriceRule {
            amount,
            operator: operator.into(),
        }
    }
}

impl Rule for GoodsPriceRule {
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
        let goods_price: Money = cart
            .calculated_line_items()
            .products()
            .map(|product| product.price().total_price)
            .sum();

        Ok(operator.compare(&goods_price, &self.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::rule::test_support::{cart, cart_with_total, product};

    fn matches(rule: &dyn Rule, cart: &CalculatedCart) -> CoreResult<bool> {
        rule.matches(cart, &ShopContext::default(), &RuleDataCollection::new())
    }

    #[test]
    fn test_order_amount_greater_than_equal() {
        let rule = OrderAmountRule::new(Money::from_major_minor(100, 0), ">=");

        assert!(matches(&rule, &cart_with_total(15_000)).unwrap());
        assert!(matches(&rule, &cart_with_total(10_000)).unwrap());
        assert!(!matches(&rule, &cart_with_total(5_000)).unwrap());
    }

    #[test]
    fn test_order_amount_less_than_equal() {
        let rule = OrderAmountRule::new(Money::from_major_minor(100, 0), "<=");

        assert!(!matches(&rule, &cart_with_total(15_000)).unwrap());
        assert!(matches(&rule, &cart_with_total(5_000)).unwrap());
    }

    #[test]
    fn test_order_amount_unsupported_operator() {
        let rule = OrderAmountRule::new(Money::from_major_minor(100, 0), "~");

        let err = matches(&rule, &cart_with_total(15_000)).unwrap_err();
        match err {
            CoreError::UnsupportedOperator { operator, rule } => {
                assert_eq!(operator, "~");
                assert_eq!(rule, "OrderAmountRule");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_order_amount_from_json() {
        let rule: OrderAmountRule =
            serde_json::from_str(r#"{"amount": 10000, "operator": ">"}"#).unwrap();
        assert_eq!(rule, OrderAmountRule::new(Money::from_cents(10_000), ">"));
    }

    #[test]
    fn test_goods_price_sums_products() {
        let rule = GoodsPriceRule::new(Money::from_cents(3_000), "=");
        let cart = cart(vec![product("SW1", 1_000), product("SW2", 2_000)]);

        assert!(matches(&rule, &cart).unwrap());
        assert!(!matches(&GoodsPriceRule::new(Money::from_cents(3_000), "!="), &cart).unwrap());
    }
}
