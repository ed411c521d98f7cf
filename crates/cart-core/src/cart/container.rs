//! # Cart Container
//!
//! The raw, persisted side of a cart: name, token and the line items the
//! customer added. Everything else is recalculated from it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::line_item::{LineItem, LineItemCollection};
use crate::validation::{validate_cart_size, ValidationResult};

/// Name used for the storefront cart.
pub const DEFAULT_CART_NAME: &str = "sw-cart";

/// A named cart with its raw line items.
///
/// Deserializing goes through [`CartContainer::create_existing`], so a
/// stored cart is held to the same limits as one built in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCartContainer")]
pub struct CartContainer {
    name: String,
    token: String,
    line_items: LineItemCollection,
}

/// Wire form of a [`CartContainer`]. Line items keep the `[key, item]`
/// pair layout of [`LineItemCollection`]; the item's own identifier wins.
#[derive(Deserialize)]
struct RawCartContainer {
    name: String,
    token: String,
    line_items: Vec<(String, LineItem)>,
}

impl TryFrom<RawCartContainer> for CartContainer {
    type Error = ValidationError;

    fn try_from(raw: RawCartContainer) -> ValidationResult<Self> {
        let line_items = raw.line_items.into_iter().map(|(_, item)| item).collect();
        CartContainer::create_existing(raw.name, raw.token, line_items)
    }
}

impl CartContainer {
    /// Creates an empty cart with a fresh token (UUID v4).
    pub fn create_new(name: impl Into<String>) -> Self {
        CartContainer {
            name: name.into(),
            token: Uuid::new_v4().to_string(),
            line_items: LineItemCollection::new(),
        }
    }

    /// Restores a cart from storage.
    ///
    /// ## Errors
    /// - `Duplicate` if two line items share an identifier
    /// - `OutOfRange` if the cart exceeds `MAX_CART_ITEMS`
    pub fn create_existing(
        name: impl Into<String>,
        token: impl Into<String>,
        line_items: Vec<LineItem>,
    ) -> ValidationResult<Self> {
        let mut container = CartContainer {
            name: name.into(),
            token: token.into(),
            line_items: LineItemCollection::new(),
        };

        for item in line_items {
            container.add_line_item(item)?;
        }

        Ok(container)
    }

    /// Adds a line item.
    ///
    /// ## Errors
    /// Rejects identifiers already in the cart and carts above the size limit.
    pub fn add_line_item(&mut self, item: LineItem) -> ValidationResult<()> {
        if self.line_items.contains_key(&item.identifier().to_string()) {
            return Err(ValidationError::Duplicate {
                field: "identifier".to_string(),
                value: item.identifier().to_string(),
            });
        }

        validate_cart_size(self.line_items.len() + 1)?;
        self.line_items.add(item);
        Ok(())
    }

    pub fn remove_line_item(&mut self, identifier: &str) -> Option<LineItem> {
        self.line_items.remove(&identifier.to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn line_items(&self) -> &LineItemCollection {
        &self.line_items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_CART_ITEMS;

    fn item(identifier: &str) -> LineItem {
        LineItem::new(identifier, "product", 1).unwrap()
    }

    #[test]
    fn test_create_new_generates_token() {
        let a = CartContainer::create_new(DEFAULT_CART_NAME);
        let b = CartContainer::create_new(DEFAULT_CART_NAME);

        assert!(Uuid::parse_str(a.token()).is_ok());
        assert_ne!(a.token(), b.token());
        assert!(a.line_items().is_empty());
    }

    #[test]
    fn test_create_existing_keeps_order() {
        let cart =
            CartContainer::create_existing("test", "test", vec![item("SW2"), item("SW1")]).unwrap();
        assert_eq!(cart.line_items().identifiers(), vec!["SW2", "SW1"]);
    }

    #[test]
    fn test_duplicate_identifier_is_rejected() {
        let result = CartContainer::create_existing("test", "test", vec![item("SW1"), item("SW1")]);
        assert!(matches!(result, Err(ValidationError::Duplicate { .. })));
    }

    #[test]
    fn test_cart_size_limit() {
        let items = (0..=MAX_CART_ITEMS).map(|i| item(&format!("SW{i}"))).collect();
        let result = CartContainer::create_existing("test", "test", items);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_deserialize_round_trip() {
        let cart =
            CartContainer::create_existing("test", "token", vec![item("SW2"), item("SW1")]).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let restored: CartContainer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_deserialize_rejects_invalid_line_items() {
        let negative = r#"{"name":"test","token":"t","line_items":[
            ["SW1",{"identifier":"SW1","type":"product","quantity":-3}]
        ]}"#;
        assert!(serde_json::from_str::<CartContainer>(negative).is_err());

        let duplicate = r#"{"name":"test","token":"t","line_items":[
            ["SW1",{"identifier":"SW1","type":"product","quantity":1}],
            ["X",{"identifier":"SW1","type":"product","quantity":2}]
        ]}"#;
        let err = serde_json::from_str::<CartContainer>(duplicate).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_deserialize_enforces_cart_size() {
        let cart = CartContainer::create_existing(
            "test",
            "t",
            (0..MAX_CART_ITEMS).map(|i| item(&format!("SW{i}"))).collect(),
        )
        .unwrap();
        let mut json = serde_json::to_value(&cart).unwrap();
        json["line_items"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!(["EXTRA", {"identifier": "EXTRA", "type": "product", "quantity": 1}]));

        assert!(serde_json::from_value::<CartContainer>(json).is_err());
    }

    #[test]
    fn test_remove_line_item() {
        let mut cart = CartContainer::create_existing("test", "test", vec![item("SW1")]).unwrap();
        assert!(cart.remove_line_item("SW1").is_some());
        assert!(cart.remove_line_item("SW1").is_none());
    }
}
