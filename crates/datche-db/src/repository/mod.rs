//! # Repository Module
//!
//! Database repository implementations for the Datché ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Ledger workflow                                                        │
//! │       │                                                                 │
//! │       │  db.stock().load_table()          (pool, autocommit)            │
//! │       │  StockRepository::upsert_in(&mut *tx, entry)  (transaction)     │
//! │       ▼                                                                 │
//! │  SaleRepository / PriceRepository / StockRepository                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write has an `*_in` twin taking a `&mut SqliteConnection`, so a
//! ledger workflow can stage several writes in one transaction.
//!
//! ## Available Repositories
//!
//! - [`SaleRepository`] - Recorded sales
//! - [`PriceRepository`] - Per-product price table
//! - [`StockRepository`] - Per-product stock entries

pub mod price;
pub mod sale;
pub mod stock;

pub use price::PriceRepository;
pub use sale::SaleRepository;
pub use stock::StockRepository;
