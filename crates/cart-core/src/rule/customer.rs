//! Rules over the shop context.

use serde::{Deserialize, Serialize};

use crate::cart::CalculatedCart;
use crate::context::ShopContext;
use crate::error::CoreResult;
use crate::rule::{Rule, RuleDataCollection};

/// Matches when the context's customer group is one of `customer_groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerGroupRule {
    customer_groups: Vec<String>,
}

impl CustomerGroupRule {
    pub const NAME: &'static str = "CustomerGroupRule";

    pub fn new<I, S>(customer_groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CustomerGroupRule {
            customer_groups: customer_groups.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for CustomerGroupRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn matches(
        &self,
        _cart: &CalculatedCart,
        context: &ShopContext,
        _data: &RuleDataCollection,
    ) -> CoreResult<bool> {
        Ok(self
            .customer_groups
            .iter()
            .any(|key| key == &context.customer_group.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CustomerGroup;
    use crate::rule::test_support::cart_with_total;
    use crate::tax::TaxMode;

    #[test]
    fn test_customer_group() {
        let rule = CustomerGroupRule::new(["H"]);
        let cart = cart_with_total(100);
        let data = RuleDataCollection::new();

        let merchant =
            ShopContext::default().with_customer_group(CustomerGroup::new("H", TaxMode::Exclusive));

        assert!(rule.matches(&cart, &merchant, &data).unwrap());
        assert!(!rule.matches(&cart, &ShopContext::default(), &data).unwrap());
    }
}
