//! # Error Types
//!
//! Domain-specific error types for fulfil-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fulfil-core errors (this file)                                        │
//! │  ├── CoreError        - Ledger / order rule violations                 │
//! │  ├── LookupError      - Region resolution failed                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  fulfil-shipping errors (separate crate)                               │
//! │  └── ShippingError    - Config / HTTP client setup failures            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError                                     │
//! │        LookupError     → CoreError (or returned directly by total())   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recoverable vs. Abandoned
//! `Order::add` and `Order::total` hand their failures back for the caller to
//! branch on. A failed `Order::confirm` abandons the whole attempt; the error
//! is returned only after it is certain nothing was mutated.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product has no entry in the stock ledger.
    ///
    /// ## When This Occurs
    /// - Product was never received into the ledger
    /// - Product was removed between `add` and `confirm`
    ///
    /// A product with zero stock is *present*; it never produces this error.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds what the ledger holds.
    ///
    /// ## User Workflow
    /// ```text
    /// order.add(Item { product: "a", quantity: 5 })
    ///      │
    ///      ▼
    /// ledger: available = 3
    ///      │
    ///      ▼
    /// InsufficientStock { product: "a", available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A stock movement or line quantity is out of range.
    #[error("Invalid quantity {quantity}: {reason}")]
    InvalidQuantity { quantity: i64, reason: String },

    /// The order has already been confirmed and is closed for changes.
    #[error("Order {0} is already confirmed")]
    OrderAlreadyConfirmed(String),

    /// Region resolution failed while pricing.
    #[error("Shipping lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InsufficientStock error.
    pub fn insufficient(product: impl Into<String>, available: i64, requested: i64) -> Self {
        CoreError::InsufficientStock {
            product: product.into(),
            available,
            requested,
        }
    }

    /// Creates an InvalidQuantity error.
    pub fn invalid_quantity(quantity: i64, reason: impl Into<String>) -> Self {
        CoreError::InvalidQuantity {
            quantity,
            reason: reason.into(),
        }
    }

    /// Returns true for the stock-related failures a caller can fix by
    /// changing quantities or waiting for a restock.
    pub fn is_stock_error(&self) -> bool {
        matches!(
            self,
            CoreError::ProductNotFound(_) | CoreError::InsufficientStock { .. }
        )
    }
}

// =============================================================================
// Lookup Error
// =============================================================================

/// Region resolution failures.
///
/// Produced by `RegionResolver` implementations. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The service answered with a region outside UK / EU / OTHER.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// The response body could not be parsed.
    #[error("Invalid region response: {0}")]
    MalformedResponse(String),

    /// Network failure or non-success HTTP status.
    #[error("Region lookup request failed: {0}")]
    Transport(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while constructing products, addresses and items, before any
/// ledger or order logic runs.
#[derive(Debug, Error)]
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

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
