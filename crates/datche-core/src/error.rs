//! # Error Types
//!
//! Domain-specific error types for datche-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  datche-core errors (this file)                                        │
//! │  ├── SaleRejection    - Why a prospective sale was refused             │
//! │  ├── ValidationError  - Input validation failures (stock/price edits)  │
//! │  └── CoreError        - Everything above, plus lookups                 │
//! │                                                                         │
//! │  datche-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── LedgerError      - CoreError | DbError from ledger workflows      │
//! │                                                                         │
//! │  Flow: SaleRejection → CoreError → LedgerError → presentation          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product, currency, ...)
//! 3. Rejections are returned as values, never panics
//! 4. A rejection never leaves a partial sale or stock change behind

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Product;
use crate::money::Currency;

// =============================================================================
// Sale Rejection
// =============================================================================

/// Reasons the sale factory refuses a prospective sale.
///
/// Reported synchronously to the caller; nothing has been persisted when one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaleRejection {
    /// Quantity below one.
    #[error("quantity must be at least one (got {quantity})")]
    InvalidQuantity { quantity: i64 },

    /// The product needs a price set in the parameters before it can be
    /// sold on its own.
    ///
    /// ## User Workflow
    /// ```text
    /// Sell Towel (Mobile Money)
    ///      │
    ///      ▼
    /// Towel FCFA price unset
    ///      │
    ///      ▼
    /// PriceNotConfigured { product: Towel }
    ///      │
    ///      ▼
    /// UI points the cashier to the pricing page
    /// ```
    #[error("price must be configured for {product}")]
    PriceNotConfigured { product: Product },

    /// No price exists at all for the product in that currency.
    ///
    /// Should not happen once the catalog is seeded.
    #[error("missing price for {product} in {currency}")]
    PriceMissing { product: Product, currency: Currency },

    /// Total or change does not fit in the money representation.
    #[error("amount out of range for {quantity} x {product}")]
    AmountOutOfRange { product: Product, quantity: i64 },
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sale was refused by the factory.
    #[error("Sale rejected: {0}")]
    Rejected(#[from] SaleRejection),

    /// Sale cannot be found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for manual edits (stock counts, prices, ids).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The product has no stock entry of its own.
    #[error("{product} has no stock of its own")]
    NotStocked { product: Product },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
