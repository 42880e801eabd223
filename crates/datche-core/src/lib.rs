//! # datche-core: Pure Transaction Engine for the Datché POS Ledger
//!
//! This crate holds every business rule of the stand's ledger as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Datché POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Presentation (sales / stock / pricing pages)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ SaleRequest                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ datche-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐       │   │
//! │  │   │ pricing  │  │   sale   │  │inventory │  │  stats   │       │   │
//! │  │   │ resolver │─►│ factory  │  │ adjuster │  │aggregator│       │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              datche-db (sales / prices / stock tables)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Product enumeration and bundle composition
//! - [`money`] - Integer money and the two currencies
//! - [`types`] - Payment methods and box tiers
//! - [`pricing`] - Price table and price resolver
//! - [`sale`] - Sale factory
//! - [`inventory`] - Stock adjuster
//! - [`stats`] - Daily statistics
//! - [`validation`] - Checks for manual stock/price edits
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use datche_core::pricing::default_prices;
//! use datche_core::sale::{create_sale, SaleRequest};
//! use datche_core::{Money, PaymentMethod, Product, SaleRejection};
//!
//! let prices = default_prices();
//!
//! let sale = create_sale(
//!     &SaleRequest::new(Product::Box, 1, PaymentMethod::Cash).tendered(Money::from_minor(50000)),
//!     &prices,
//! )
//! .unwrap();
//! assert_eq!(sale.change_due.minor(), 5000);
//!
//! let refused = create_sale(&SaleRequest::new(Product::Towel, 1, PaymentMethod::Cash), &prices);
//! assert!(matches!(refused, Err(SaleRejection::PriceNotConfigured { .. })));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod inventory;
pub mod money;
pub mod pricing;
pub mod sale;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Product;
pub use error::{CoreError, CoreResult, SaleRejection, ValidationError};
pub use inventory::{SaleEffect, StockEntry, StockStore, StockTable};
pub use money::{Currency, Money};
pub use pricing::{PriceEntry, PriceTable};
pub use sale::{SaleDraft, SaleQuote, SaleRecord, SaleRequest};
pub use stats::{PaymentBalance, SaleStats};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Products holding fewer units than this are flagged low on the stock page.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;
