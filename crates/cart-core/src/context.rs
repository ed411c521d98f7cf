//! # Shop Context
//!
//! Request-scoped configuration for one cart calculation: which shop,
//! which currency, which customer group (and therefore gross or net
//! prices), which delivery country.
//!
//! ## Example
//! ```rust
//! use cart_core::context::{CustomerGroup, ShopContext};
//! use cart_core::tax::TaxMode;
//!
//! let context = ShopContext::new("main")
//!     .with_customer_group(CustomerGroup::new("H", TaxMode::Exclusive))
//!     .with_country("DE");
//!
//! assert_eq!(context.tax_mode(), TaxMode::Exclusive);
//! ```

use serde::{Deserialize, Serialize};

use crate::tax::TaxMode;
use crate::DEFAULT_CURRENCY;

/// Customer group key used when none is configured ("EK" = end customer).
pub const DEFAULT_CUSTOMER_GROUP: &str = "EK";

// =============================================================================
// Customer Group
// =============================================================================

/// A customer group and the way prices are shown to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerGroup {
    pub key: String,
    pub tax_mode: TaxMode,
}

impl CustomerGroup {
    pub fn new(key: impl Into<String>, tax_mode: TaxMode) -> Self {
        CustomerGroup {
            key: key.into(),
            tax_mode,
        }
    }
}

impl Default for CustomerGroup {
    fn default() -> Self {
        CustomerGroup::new(DEFAULT_CUSTOMER_GROUP, TaxMode::Inclusive)
    }
}

// =============================================================================
// Shop Context
// =============================================================================

/// Everything a calculation needs to know about the current request.
///
/// The context is read-only for the whole pipeline: calculators, processors
/// and rules receive it by shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopContext {
    pub shop_id: String,
    /// ISO 4217 currency code.
    pub currency: String,
    pub customer_group: CustomerGroup,
    /// ISO 3166 country code of the delivery address, if known.
    pub country: Option<String>,
}

impl ShopContext {
    /// Creates a context with the default currency and customer group.
    pub fn new(shop_id: impl Into<String>) -> Self {
        ShopContext {
            shop_id: shop_id.into(),
            currency: DEFAULT_CURRENCY.to_string(),
            customer_group: CustomerGroup::default(),
            country: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_customer_group(mut self, customer_group: CustomerGroup) -> Self {
        self.customer_group = customer_group;
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Whether prices are calculated gross or net for this request.
    #[inline]
    pub fn tax_mode(&self) -> TaxMode {
        self.customer_group.tax_mode
    }
}

impl Default for ShopContext {
    fn default() -> Self {
        ShopContext::new("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let context = ShopContext::default();
        assert_eq!(context.currency, DEFAULT_CURRENCY);
        assert_eq!(context.customer_group.key, DEFAULT_CUSTOMER_GROUP);
        assert_eq!(context.tax_mode(), TaxMode::Inclusive);
        assert!(context.country.is_none());
    }

    #[test]
    fn test_builder() {
        let context = ShopContext::new("b2b")
            .with_currency("CHF")
            .with_customer_group(CustomerGroup::new("H", TaxMode::Exclusive))
            .with_country("CH");

        assert_eq!(context.shop_id, "b2b");
        assert_eq!(context.currency, "CHF");
        assert_eq!(context.tax_mode(), TaxMode::Exclusive);
        assert_eq!(context.country.as_deref(), Some("CH"));
    }
}
