//! # Line Items
//!
//! Raw line items (what the customer put into the cart) and calculated
//! line items (what the pipeline made of them).
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LineItem { "SW1", "product", 2 }                                       │
//! │       │                                                                 │
//! │       │  CartProcessor groups by type tag                               │
//! │       ▼                                                                 │
//! │  ProductProcessor ──► ProductCalculator                                 │
//! │       │                                                                 │
//! │       ├── price + delivery found                                        │
//! │       │      └──► CalculatedLineItem::Product(CalculatedProduct)        │
//! │       │                                                                 │
//! │       └── price or delivery missing                                     │
//! │              └──► CartError (no calculated line item)                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::collection::{Keyed, KeyedCollection};
use crate::delivery::DeliveryInformation;
use crate::error::ValidationError;
use crate::price::Price;
use crate::product::CalculatedProduct;
use crate::validation::{
    validate_identifier, validate_line_item_type, validate_quantity, ValidationResult,
};

// =============================================================================
// Line Item
// =============================================================================

/// A single, not yet calculated cart entry.
///
/// Immutable once constructed; [`LineItem::new`] validates every field,
/// deserialization included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLineItem")]
pub struct LineItem {
    identifier: String,
    #[serde(rename = "type")]
    type_tag: String,
    quantity: i64,
}

impl LineItem {
    /// Creates a validated line item.
    ///
    /// ```rust
    /// use cart_core::line_item::LineItem;
    ///
    /// let item = LineItem::new("SW1", "product", 2).unwrap();
    /// assert_eq!(item.identifier(), "SW1");
    ///
    /// assert!(LineItem::new("SW1", "product", 0).is_err());
    /// ```
    pub fn new(
        identifier: impl Into<String>,
        type_tag: impl Into<String>,
        quantity: i64,
    ) -> ValidationResult<Self> {
        let identifier = identifier.into();
        let type_tag = type_tag.into();

        validate_identifier(&identifier)?;
        validate_line_item_type(&type_tag)?;
        validate_quantity(quantity)?;

        Ok(LineItem {
            identifier,
            type_tag,
            quantity,
        })
    }

    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The type tag that selects the line item processor ("product", ...).
    #[inline]
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// Unvalidated wire form of a [`LineItem`].
#[derive(Deserialize)]
struct RawLineItem {
    identifier: String,
    #[serde(rename = "type")]
    type_tag: String,
    quantity: i64,
}

impl TryFrom<RawLineItem> for LineItem {
    type Error = ValidationError;

    fn try_from(raw: RawLineItem) -> ValidationResult<Self> {
        LineItem::new(raw.identifier, raw.type_tag, raw.quantity)
    }
}

impl Keyed for LineItem {
    type Key = String;

    fn key(&self) -> String {
        self.identifier.clone()
    }
}

/// Line items keyed by identifier.
pub type LineItemCollection = KeyedCollection<String, LineItem>;

impl LineItemCollection {
    /// All identifiers, in cart order.
    pub fn identifiers(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    /// Line items with the given type tag, in cart order.
    pub fn filter_type(&self, type_tag: &str) -> LineItemCollection {
        self.filter(|item| item.type_tag() == type_tag)
    }

    /// Splits the collection by type tag.
    ///
    /// Groups are ordered by the first appearance of their type tag, items
    /// keep their cart order within each group.
    pub fn group_by_type(&self) -> Vec<(String, LineItemCollection)> {
        let mut groups: Vec<(String, LineItemCollection)> = Vec::new();

        for item in self.values() {
            match groups.iter_mut().find(|(tag, _)| tag == item.type_tag()) {
                Some((_, group)) => {
                    group.add(item.clone());
                }
                None => {
                    groups.push((
                        item.type_tag().to_string(),
                        LineItemCollection::from_values([item.clone()]),
                    ));
                }
            }
        }

        groups
    }
}

// =============================================================================
// Calculated Line Item
// =============================================================================

/// A line item after calculation.
///
/// Each variant is produced by the line item processor registered for the
/// matching type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum CalculatedLineItem {
    Product(CalculatedProduct),
}

impl CalculatedLineItem {
    pub fn identifier(&self) -> &str {
        match self {
            CalculatedLineItem::Product(product) => product.identifier(),
        }
    }

    pub fn quantity(&self) -> i64 {
        match self {
            CalculatedLineItem::Product(product) => product.quantity(),
        }
    }

    pub fn price(&self) -> &Price {
        match self {
            CalculatedLineItem::Product(product) => product.price(),
        }
    }

    /// The raw line item this calculated item was produced from.
    pub fn line_item(&self) -> &LineItem {
        match self {
            CalculatedLineItem::Product(product) => product.line_item(),
        }
    }

    /// Delivery data for physical goods; `None` for items that don't ship.
    pub fn delivery_information(&self) -> Option<&DeliveryInformation> {
        match self {
            CalculatedLineItem::Product(product) => Some(product.delivery_information()),
        }
    }

    pub fn as_product(&self) -> Option<&CalculatedProduct> {
        match self {
            CalculatedLineItem::Product(product) => Some(product),
        }
    }
}

impl From<CalculatedProduct> for CalculatedLineItem {
    fn from(product: CalculatedProduct) -> Self {
        CalculatedLineItem::Product(product)
    }
}

impl Keyed for CalculatedLineItem {
    type Key = String;

    fn key(&self) -> String {
        self.identifier().to_string()
    }
}

/// Calculated line items keyed by identifier.
pub type CalculatedLineItemCollection = KeyedCollection<String, CalculatedLineItem>;

impl CalculatedLineItemCollection {
    /// All calculated products, in cart order.
    pub fn products(&self) -> impl Iterator<Item = &CalculatedProduct> {
        self.values().filter_map(CalculatedLineItem::as_product)
    }

    /// Prices of all calculated line items, in cart order.
    pub fn prices(&self) -> impl Iterator<Item = &Price> {
        self.values().map(CalculatedLineItem::price)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(identifier: &str, type_tag: &str) -> LineItem {
        LineItem::new(identifier, type_tag, 1).unwrap()
    }

    #[test]
    fn test_new_validates() {
        assert!(LineItem::new("SW1", "product", 1).is_ok());
        assert!(LineItem::new("", "product", 1).is_err());
        assert!(LineItem::new("SW1", "", 1).is_err());
        assert!(LineItem::new("SW1", "product", -2).is_err());
    }

    #[test]
    fn test_serializes_type_tag_as_type() {
        let json = serde_json::to_value(item("SW1", "product")).unwrap();
        assert_eq!(json["type"], "product");
        assert_eq!(json["quantity"], 1);

        let restored: LineItem = serde_json::from_value(json).unwrap();
        assert_eq!(restored, item("SW1", "product"));
    }

    #[test]
    fn test_deserialize_validates() {
        for json in [
            r#"{"identifier":"SW1","type":"product","quantity":-3}"#,
            r#"{"identifier":"SW1","type":"product","quantity":0}"#,
            r#"{"identifier":"","type":"product","quantity":1}"#,
            r#"{"identifier":"SW1","type":"Product","quantity":1}"#,
        ] {
            let result: Result<LineItem, _> = serde_json::from_str(json);
            assert!(result.is_err(), "{json} should be rejected");
        }

        let err = serde_json::from_str::<LineItem>(r#"{"identifier":"SW1","type":"product","quantity":-3}"#)
            .unwrap_err();
        assert!(err.to_string().contains("quantity must be positive"));
    }

    #[test]
    fn test_group_by_type_keeps_order() {
        let items = LineItemCollection::from(vec![
            item("SW1", "product"),
            item("VOUCHER", "discount"),
            item("SW2", "product"),
        ]);

        let groups = items.group_by_type();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "product");
        assert_eq!(groups[0].1.identifiers(), vec!["SW1", "SW2"]);
        assert_eq!(groups[1].0, "discount");
        assert_eq!(groups[1].1.identifiers(), vec!["VOUCHER"]);
    }

    #[test]
    fn test_filter_type() {
        let items = LineItemCollection::from(vec![item("SW1", "product"), item("X", "discount")]);
        assert_eq!(items.filter_type("product").identifiers(), vec!["SW1"]);
        assert!(items.filter_type("shipping").is_empty());
    }
}
