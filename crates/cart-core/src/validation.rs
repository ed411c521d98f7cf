//! # Validation Module
//!
//! Input validation for values entering the cart pipeline.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Value construction (THIS MODULE)                             │
//! │  ├── LineItem::new        → identifier, type, quantity                 │
//! │  └── CartContainer        → cart size                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Calculation                                                  │
//! │  ├── PriceCalculator      → negative prices (CoreError)                │
//! │  └── ProductCalculator    → missing data (CartError, collected)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cart_core::validation::{validate_identifier, validate_quantity};
//!
//! assert!(validate_identifier("SW10001").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::tax::FULL_SHARE_BPS;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted line item identifier.
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a line item identifier (product number, voucher code, ...).
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - No whitespace
pub fn validate_identifier(identifier: &str) -> ValidationResult<()> {
    if identifier.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "identifier".to_string(),
        });
    }

    if identifier.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            field: "identifier".to_string(),
            max: MAX_IDENTIFIER_LENGTH,
        });
    }

    if identifier.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "identifier".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a line item type tag.
///
/// Type tags are registry keys for line item processors, so they are
/// restricted to lowercase ASCII letters, digits and underscores.
pub fn validate_line_item_type(type_tag: &str) -> ValidationResult<()> {
    if type_tag.is_empty() {
        return Err(ValidationError::Required {
            field: "type".to_string(),
        });
    }

    if !type_tag
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "type".to_string(),
            reason: "must contain only lowercase letters, digits and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates the summed shares of a price's tax rules (at most 100%).
///
/// A single share above 100% fails as well, since it alone exceeds the sum.
pub fn validate_tax_share_bps(total_share_bps: u64) -> ValidationResult<()> {
    if total_share_bps > u64::from(FULL_SHARE_BPS) {
        return Err(ValidationError::OutOfRange {
            field: "tax_share".to_string(),
            min: 0,
            max: i64::from(FULL_SHARE_BPS),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct line items).
pub fn validate_cart_size(items: usize) -> ValidationResult<()> {
    if items > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("SW1").is_ok());
        assert!(validate_identifier("SW10001.3").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("   ").is_err());
        assert!(validate_identifier("SW 1").is_err());
        assert!(validate_identifier(&"A".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_line_item_type() {
        assert!(validate_line_item_type("product").is_ok());
        assert!(validate_line_item_type("percentage_voucher").is_ok());

        assert!(validate_line_item_type("").is_err());
        assert!(validate_line_item_type("Product").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(1900).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_tax_share_bps() {
        assert!(validate_tax_share_bps(0).is_ok());
        assert!(validate_tax_share_bps(10_000).is_ok());
        assert!(validate_tax_share_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(MAX_CART_ITEMS).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS + 1).is_err());
    }
}
