//! # Error Types
//!
//! Hard-failure error types for cart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cart-core hard failures (this file)                                   │
//! │  ├── CoreError        - Aborts the current calculation                 │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── GatewayError     - Price/delivery data source failures            │
//! │                                                                         │
//! │  cart-core recoverable errors (cart::error)                            │
//! │  └── CartError        - Per line item, collected, never raised         │
//! │                                                                         │
//! │  cart-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Error Classes
//! A missing price for one line item is a business-data gap: it is recorded
//! as a [`CartError`](crate::cart::CartError) and the remaining items are
//! still calculated. Everything in this file is a misconfiguration or an
//! infrastructure failure and stops the calculation.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors that abort the current cart calculation or rule evaluation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A rule was configured with an operator it cannot evaluate.
    ///
    /// ## When This Occurs
    /// ```text
    /// OrderAmountRule { amount: 100.00, operator: "~" }
    ///      │
    ///      ▼
    /// rule.matches(cart, context, data)
    ///      │
    ///      ▼
    /// UnsupportedOperator { operator: "~", rule: "OrderAmountRule" }
    /// ```
    #[error("Unsupported operator {operator} in {rule}")]
    UnsupportedOperator { operator: String, rule: String },

    /// A price definition carried a negative unit price.
    #[error("Price must not be negative: {cents} cents")]
    NegativePrice { cents: i64 },

    /// A price calculation left the supported amount range.
    ///
    /// ## When This Occurs
    /// A gateway delivers a unit price so large that unit price × quantity,
    /// or the gross price, exceeds `MAX_LINE_TOTAL_CENTS`.
    #[error("Amount exceeds the supported maximum of {max} cents")]
    AmountOutOfRange { max: i64 },

    /// The price or delivery gateway failed (I/O, connection, ...).
    ///
    /// Gateway failures are fatal for the request. Missing entries are not
    /// failures; gateways simply omit them.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an UnsupportedOperator error for the given rule.
    pub fn unsupported_operator(operator: impl Into<String>, rule: impl Into<String>) -> Self {
        CoreError::UnsupportedOperator {
            operator: operator.into(),
            rule: rule.into(),
        }
    }
}

// =============================================================================
// Gateway Error
// =============================================================================

/// Failure reported by a [`PriceGateway`](crate::product::PriceGateway) or
/// [`DeliveryGateway`](crate::product::DeliveryGateway).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backing data source is not reachable.
    #[error("{gateway} unavailable: {reason}")]
    Unavailable { gateway: String, reason: String },

    /// The backing data source returned data that cannot be used.
    #[error("{gateway} returned invalid data: {reason}")]
    InvalidData { gateway: String, reason: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any calculation runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., whitespace in an identifier).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same line item identifier twice).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
