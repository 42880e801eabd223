//! # Sale Repository
//!
//! Database operations for recorded sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. RECORD                                                              │
//! │     └── insert_in() → row frozen with its unit price and currency       │
//! │         (stock adjusted in the same transaction)                        │
//! │                                                                         │
//! │  2. (OPTIONAL) DELETE                                                   │
//! │     └── delete_in() → row removed, stock restored                       │
//! │                                                                         │
//! │  3. RESET DAY                                                           │
//! │     └── clear() → every row removed, stock untouched                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are never updated in place.

use datche_core::{PaymentMethod, SaleRecord};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

const SELECT_SALE: &str = r#"
    SELECT
        id, created_at, product, quantity, payment_method, currency,
        unit_price, total, amount_tendered, change_due, box_tier
    FROM sales
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SaleRecord>> {
        Self::get_by_id_in_executor(&self.pool, id).await
    }

    /// Gets a sale by ID inside an open transaction.
    pub async fn get_by_id_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<SaleRecord>> {
        Self::get_by_id_in_executor(conn, id).await
    }

    async fn get_by_id_in_executor<'e>(
        executor: impl SqliteExecutor<'e>,
        id: &str,
    ) -> DbResult<Option<SaleRecord>> {
        let sql = format!("{SELECT_SALE} WHERE id = ?1");
        let sale = sqlx::query_as::<_, SaleRecord>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(sale)
    }

    /// Lists every sale, newest first.
    pub async fn list(&self) -> DbResult<Vec<SaleRecord>> {
        let sql = format!("{SELECT_SALE} ORDER BY created_at DESC, rowid DESC");
        let sales = sqlx::query_as::<_, SaleRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Lists the sales paid with one method, oldest first.
    ///
    /// ## Usage
    /// Feeds the per-method transaction export.
    pub async fn list_by_payment_method(&self, method: PaymentMethod) -> DbResult<Vec<SaleRecord>> {
        let sql = format!("{SELECT_SALE} WHERE payment_method = ?1 ORDER BY created_at ASC, rowid ASC");
        let sales = sqlx::query_as::<_, SaleRecord>(&sql)
            .bind(method)
            .fetch_all(&self.pool)
            .await?;

        debug!(method = %method, count = sales.len(), "Listed sales by payment method");
        Ok(sales)
    }

    /// Number of recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts a sale.
    pub async fn insert(&self, sale: &SaleRecord) -> DbResult<()> {
        Self::insert_in_executor(&self.pool, sale).await
    }

    /// Inserts a sale inside an open transaction.
    pub async fn insert_in(conn: &mut SqliteConnection, sale: &SaleRecord) -> DbResult<()> {
        Self::insert_in_executor(conn, sale).await
    }

    async fn insert_in_executor<'e>(
        executor: impl SqliteExecutor<'e>,
        sale: &SaleRecord,
    ) -> DbResult<()> {
        debug!(id = %sale.id, product = %sale.product, quantity = sale.quantity, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, created_at, product, quantity, payment_method, currency,
                unit_price, total, amount_tendered, change_due, box_tier
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11
            )
            "#,
        )
        .bind(&sale.id)
        .bind(sale.created_at)
        .bind(sale.product)
        .bind(sale.quantity)
        .bind(sale.payment_method)
        .bind(sale.currency)
        .bind(sale.unit_price)
        .bind(sale.total)
        .bind(sale.amount_tendered)
        .bind(sale.change_due)
        .bind(sale.box_tier)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Deletes a sale inside an open transaction.
    ///
    /// ## Returns
    /// `true` when a row was removed.
    pub async fn delete_in(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes every sale.
    ///
    /// ## Returns
    /// Number of rows removed.
    pub async fn clear(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sales").execute(&self.pool).await?;

        debug!(removed = result.rows_affected(), "Cleared sales");
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
