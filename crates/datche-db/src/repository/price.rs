//! # Price Repository
//!
//! The per-product price table behind the Parameters page.
//!
//! One row per product. A NULL column means "not configured" in that
//! currency; rows are read back through [`PriceEntry::new`] so a stored
//! zero for Towel, Sprayer or Massager still comes out unset.

use datche_core::{PriceEntry, PriceTable, Product};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Repository for price table operations.
#[derive(Debug, Clone)]
pub struct PriceRepository {
    pool: SqlitePool,
}

impl PriceRepository {
    /// Creates a new PriceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PriceRepository { pool }
    }

    /// Loads every row into a [`PriceTable`].
    pub async fn load_table(&self) -> DbResult<PriceTable> {
        Self::load_table_in_executor(&self.pool).await
    }

    /// Loads the price table inside an open transaction.
    pub async fn load_table_in(conn: &mut SqliteConnection) -> DbResult<PriceTable> {
        Self::load_table_in_executor(conn).await
    }

    async fn load_table_in_executor<'e>(executor: impl SqliteExecutor<'e>) -> DbResult<PriceTable> {
        let rows = sqlx::query_as::<_, PriceEntry>("SELECT product, eur, fcfa FROM prices")
            .fetch_all(executor)
            .await?;

        debug!(count = rows.len(), "Loaded price table");
        Ok(rows
            .into_iter()
            .map(|row| PriceEntry::new(row.product, row.eur, row.fcfa))
            .collect())
    }

    /// Gets the price row for one product.
    pub async fn get(&self, product: Product) -> DbResult<Option<PriceEntry>> {
        let row = sqlx::query_as::<_, PriceEntry>(
            "SELECT product, eur, fcfa FROM prices WHERE product = ?1",
        )
        .bind(product)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| PriceEntry::new(row.product, row.eur, row.fcfa)))
    }

    /// Inserts or replaces the row for `entry.product`.
    pub async fn upsert(&self, entry: &PriceEntry) -> DbResult<()> {
        Self::upsert_in_executor(&self.pool, entry).await
    }

    /// Inserts or replaces a row inside an open transaction.
    pub async fn upsert_in(conn: &mut SqliteConnection, entry: &PriceEntry) -> DbResult<()> {
        Self::upsert_in_executor(conn, entry).await
    }

    async fn upsert_in_executor<'e>(
        executor: impl SqliteExecutor<'e>,
        entry: &PriceEntry,
    ) -> DbResult<()> {
        debug!(product = %entry.product, eur = ?entry.eur, fcfa = ?entry.fcfa, "Upserting price");

        sqlx::query(
            r#"
            INSERT INTO prices (product, eur, fcfa)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (product) DO UPDATE SET
                eur = excluded.eur,
                fcfa = excluded.fcfa
            "#,
        )
        .bind(entry.product)
        .bind(entry.eur)
        .bind(entry.fcfa)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Replaces the whole table inside an open transaction.
    ///
    /// Products absent from `table` lose their row.
    pub async fn replace_all_in(conn: &mut SqliteConnection, table: &PriceTable) -> DbResult<()> {
        sqlx::query("DELETE FROM prices").execute(&mut *conn).await?;

        for entry in table.entries() {
            Self::upsert_in(&mut *conn, entry).await?;
        }

        debug!(count = table.len(), "Replaced price table");
        Ok(())
    }

    /// Removes every row.
    pub async fn clear(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM prices").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use datche_core::pricing::default_prices;
    use datche_core::{Currency, Money};

    #[tokio::test]
    async fn test_replace_and_load_defaults() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        PriceRepository::replace_all_in(&mut *tx, &default_prices())
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let table = db.prices().load_table().await.unwrap();
        assert_eq!(table, default_prices());
        assert_eq!(
            table.entry(Product::Shampoo).and_then(|e| e.price(Currency::Eur)),
            Some(Money::from_minor(2150))
        );
        assert_eq!(table.entry(Product::Towel), Some(&PriceEntry::unset(Product::Towel)));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_and_zero_is_normalized() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.prices();

        repo.upsert(&PriceEntry::new(Product::Oil, Some(Money::from_minor(2299)), None))
            .await
            .unwrap();
        repo.upsert(&PriceEntry::new(Product::Oil, Some(Money::from_minor(2500)), Some(Money::from_minor(16000))))
            .await
            .unwrap();

        let oil = repo.get(Product::Oil).await.unwrap().unwrap();
        assert_eq!(oil.eur, Some(Money::from_minor(2500)));
        assert_eq!(oil.fcfa, Some(Money::from_minor(16000)));

        // A raw zero written behind the entry constructor's back
        sqlx::query("INSERT INTO prices (product, eur, fcfa) VALUES ('towel', 0, 0)")
            .execute(db.pool())
            .await
            .unwrap();
        let towel = repo.get(Product::Towel).await.unwrap().unwrap();
        assert_eq!(towel, PriceEntry::unset(Product::Towel));

        assert!(repo.get(Product::Mirror).await.unwrap().is_none());
        assert_eq!(repo.clear().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_negative_price_hits_check_constraint() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .prices()
            .upsert(&PriceEntry::new(Product::Mask, Some(Money::from_minor(-1)), None))
            .await
            .unwrap_err();

        assert!(matches!(err, crate::error::DbError::ConstraintViolation(_)));
    }
}
