//! # Stock Repository
//!
//! Per-product stock rows. Rows are created lazily: a product without a row
//! has zero units. Box never gets a row.

use datche_core::{Product, StockEntry, StockTable};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Repository for stock operations.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Loads every row into a [`StockTable`].
    pub async fn load_table(&self) -> DbResult<StockTable> {
        Self::load_table_in_executor(&self.pool).await
    }

    /// Loads the stock table inside an open transaction.
    pub async fn load_table_in(conn: &mut SqliteConnection) -> DbResult<StockTable> {
        Self::load_table_in_executor(conn).await
    }

    async fn load_table_in_executor<'e>(executor: impl SqliteExecutor<'e>) -> DbResult<StockTable> {
        let rows = sqlx::query_as::<_, StockEntry>("SELECT product, quantity FROM stock")
            .fetch_all(executor)
            .await?;

        debug!(count = rows.len(), "Loaded stock table");
        Ok(StockTable::from_entries(rows))
    }

    /// Gets the row for one product.
    pub async fn get(&self, product: Product) -> DbResult<Option<StockEntry>> {
        let row = sqlx::query_as::<_, StockEntry>(
            "SELECT product, quantity FROM stock WHERE product = ?1",
        )
        .bind(product)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts or replaces the row for `entry.product`.
    pub async fn upsert(&self, entry: &StockEntry) -> DbResult<()> {
        Self::upsert_in_executor(&self.pool, entry).await
    }

    /// Inserts or replaces a row inside an open transaction.
    pub async fn upsert_in(conn: &mut SqliteConnection, entry: &StockEntry) -> DbResult<()> {
        Self::upsert_in_executor(conn, entry).await
    }

    async fn upsert_in_executor<'e>(
        executor: impl SqliteExecutor<'e>,
        entry: &StockEntry,
    ) -> DbResult<()> {
        debug!(product = %entry.product, quantity = entry.quantity, "Upserting stock");

        sqlx::query(
            r#"
            INSERT INTO stock (product, quantity)
            VALUES (?1, ?2)
            ON CONFLICT (product) DO UPDATE SET quantity = excluded.quantity
            "#,
        )
        .bind(entry.product)
        .bind(entry.quantity)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Deletes the row for one product.
    pub async fn delete(&self, product: Product) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM stock WHERE product = ?1")
            .bind(product)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes every row.
    pub async fn clear(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM stock").execute(&self.pool).await?;

        debug!(removed = result.rows_affected(), "Cleared stock");
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
