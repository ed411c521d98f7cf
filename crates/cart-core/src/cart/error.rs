//! # Cart Errors
//!
//! Recoverable, per line item problems found while calculating a cart.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart: SW1, SW2, SW3          Price gateway knows: SW1                  │
//! │                                                                         │
//! │  Calculated line items: [SW1]                                           │
//! │  Errors:                [ProductPriceNotFound(SW2),                     │
//! │                          ProductPriceNotFound(SW3)]                     │
//! │                                                                         │
//! │  The storefront still renders SW1 and shows both errors.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A per line item data gap. Collected into an [`ErrorCollection`], never
/// returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartError {
    #[error("No price found for product {identifier}")]
    ProductPriceNotFound { identifier: String },

    #[error("No delivery information found for product {identifier}")]
    ProductDeliveryInformationNotFound { identifier: String },

    /// The price gateway delivered a price that cannot be calculated
    /// (negative, out of range, broken tax rules).
    #[error("Invalid price for product {identifier}: {reason}")]
    ProductPriceInvalid { identifier: String, reason: String },
}

impl CartError {
    pub fn product_price_not_found(identifier: impl Into<String>) -> Self {
        CartError::ProductPriceNotFound {
            identifier: identifier.into(),
        }
    }

    pub fn product_delivery_information_not_found(identifier: impl Into<String>) -> Self {
        CartError::ProductDeliveryInformationNotFound {
            identifier: identifier.into(),
        }
    }

    pub fn product_price_invalid(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        CartError::ProductPriceInvalid {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Identifier of the offending line item.
    pub fn identifier(&self) -> &str {
        match self {
            CartError::ProductPriceNotFound { identifier }
            | CartError::ProductDeliveryInformationNotFound { identifier }
            | CartError::ProductPriceInvalid { identifier, .. } => identifier,
        }
    }
}

/// Ordered list of cart errors. Unlike the keyed collections, one line item
/// may appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCollection {
    errors: Vec<CartError>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        ErrorCollection::default()
    }

    pub fn add(&mut self, error: CartError) {
        self.errors.push(error);
    }

    pub fn extend_from(&mut self, other: ErrorCollection) {
        self.errors.extend(other.errors);
    }

    /// Errors raised for `identifier`.
    pub fn for_identifier<'a>(&'a self, identifier: &'a str) -> impl Iterator<Item = &'a CartError> {
        self.errors
            .iter()
            .filter(move |error| error.identifier() == identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<Vec<CartError>> for ErrorCollection {
    fn from(errors: Vec<CartError>) -> Self {
        ErrorCollection { errors }
    }
}

impl FromIterator<CartError> for ErrorCollection {
    fn from_iter<I: IntoIterator<Item = CartError>>(iter: I) -> Self {
        ErrorCollection {
            errors: iter.into_iter().collect(),
        }
    }
}
