//! # datche-db: Database Layer for the Datché POS Ledger
//!
//! This crate stores the ledger in SQLite (sqlx, async) and runs the
//! stand's workflows on top of the pure rules in `datche-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Datché POS Data Flow                             │
//! │                                                                         │
//! │  Sales page / Stock page / Parameters page                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     datche-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌───────────────┐      │   │
//! │  │   │    Ledger    │──►│ Repositories  │──►│   Database    │      │   │
//! │  │   │ (ledger.rs)  │   │ sale / price  │   │   (pool.rs)   │      │   │
//! │  │   │ transactions │   │ / stock       │   │  SqlitePool   │      │   │
//! │  │   └──────┬───────┘   └───────────────┘   └───────┬───────┘      │   │
//! │  │          │ create_sale, apply_sale_effect,       │ migrations   │   │
//! │  │          ▼ aggregate (datche-core)               ▼ (embedded)   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   SQLite: <data dir>/datche.db   (sales, prices, stock)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`ledger`] - Sale, stock and price workflows
//! - [`pool`] - Connection pool creation and configuration
//! - [`repository`] - Table access (sales, prices, stock)
//! - [`migrations`] - Embedded database migrations
//! - [`config`] - `ledger.toml` loading
//! - [`error`] - Database and ledger error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use datche_db::{Ledger, LedgerConfig};
//! use datche_core::{Money, PaymentMethod, Product, SaleRequest};
//!
//! let ledger = Ledger::open(&LedgerConfig::load_or_default(None)).await?;
//!
//! let sale = ledger
//!     .record_sale(&SaleRequest::new(Product::Box, 1, PaymentMethod::Cash)
//!         .tendered(Money::from_minor(50000)))
//!     .await?;
//!
//! let stats = ledger.daily_stats().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::LedgerConfig;
pub use error::{ConfigError, DbError, DbResult, LedgerError, LedgerResult};
pub use ledger::Ledger;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::{PriceRepository, SaleRepository, StockRepository};

// =============================================================================
// Logging
// =============================================================================

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,datche_core=debug,datche_db=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=datche_db=trace` - Show trace for this crate only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
