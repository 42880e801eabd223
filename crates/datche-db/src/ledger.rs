//! # Ledger Service
//!
//! The stand's workflows: record and delete sales, reset the day, edit
//! stock and prices. Business rules come from `datche-core`; this module
//! only loads state, calls the pure functions and persists the result.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(request)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │       ├── load price table ──► create_sale() ──► Err? ROLLBACK, return  │
//! │       │                                                                 │
//! │       ├── INSERT sale                                                   │
//! │       │                                                                 │
//! │       ├── load stock table ──► apply_sale_effect(Created)               │
//! │       │                         (Box fans out to seven constituents)    │
//! │       │                                                                 │
//! │       ├── UPSERT every touched stock entry                              │
//! │       ▼                                                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting a sale mirrors this with `SaleEffect::Deleted`. Resetting the
//! day removes every sale and leaves stock as it is.

use datche_core::inventory::{apply_sale_effect, stock_targets};
use datche_core::pricing::default_prices;
use datche_core::sale::{create_sale, quote};
use datche_core::validation::{validate_price, validate_sale_id, validate_stock_quantity};
use datche_core::{
    CoreError, Currency, PaymentMethod, PriceTable, Product, SaleDraft, SaleEffect, SaleQuote,
    SaleRecord, SaleRequest, SaleStats, StockEntry, DEFAULT_LOW_STOCK_THRESHOLD,
};
use sqlx::SqliteConnection;
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::LedgerResult;
use crate::pool::Database;
use crate::repository::{PriceRepository, SaleRepository, StockRepository};

/// Ledger workflows over one [`Database`].
#[derive(Debug, Clone)]
pub struct Ledger {
    db: Database,
    low_stock_threshold: i64,
}

impl Ledger {
    pub fn new(db: Database) -> Self {
        Ledger {
            db,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    /// Opens the configured database and applies the configured threshold.
    pub async fn open(config: &LedgerConfig) -> LedgerResult<Self> {
        let db = Database::new(config.db_config()).await?;
        Ok(Ledger::new(db).with_low_stock_threshold(config.low_stock_threshold()))
    }

    pub fn with_low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Records a sale and moves stock, atomically.
    ///
    /// A rejection is returned before anything is written.
    pub async fn record_sale(&self, request: &SaleRequest) -> LedgerResult<SaleRecord> {
        let mut tx = self.db.pool().begin().await?;

        let prices = PriceRepository::load_table_in(&mut *tx).await?;
        let sale = match create_sale(request, &prices) {
            Ok(sale) => sale,
            Err(rejection) => {
                info!(
                    product = %request.product,
                    quantity = request.quantity,
                    method = %request.payment_method,
                    reason = %rejection,
                    "Sale rejected"
                );
                return Err(rejection.into());
            }
        };

        SaleRepository::insert_in(&mut *tx, &sale).await?;
        Self::move_stock(&mut *tx, &sale, SaleEffect::Created).await?;

        tx.commit().await?;

        if sale.is_underpaid() {
            warn!(
                id = %sale.id,
                change_due = %sale.currency.format(sale.change_due),
                "Cash sale recorded with amount tendered below total"
            );
        }

        info!(
            id = %sale.id,
            product = %sale.product,
            quantity = sale.quantity,
            method = %sale.payment_method,
            total = %sale.currency.format(sale.total),
            "Sale recorded"
        );

        Ok(sale)
    }

    /// Deletes a sale and restores the stock it consumed, atomically.
    pub async fn delete_sale(&self, id: &str) -> LedgerResult<SaleRecord> {
        validate_sale_id(id)?;

        let mut tx = self.db.pool().begin().await?;

        let sale = SaleRepository::get_by_id_in(&mut *tx, id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;

        SaleRepository::delete_in(&mut *tx, id).await?;
        Self::move_stock(&mut *tx, &sale, SaleEffect::Deleted).await?;

        tx.commit().await?;

        info!(id = %sale.id, product = %sale.product, quantity = sale.quantity, "Sale deleted");
        Ok(sale)
    }

    /// Applies a sale's stock movement to the rows it touches.
    async fn move_stock(
        conn: &mut SqliteConnection,
        sale: &SaleRecord,
        effect: SaleEffect,
    ) -> LedgerResult<()> {
        let mut stock = StockRepository::load_table_in(&mut *conn).await?;

        if effect == SaleEffect::Created {
            for &product in stock_targets(&sale.product) {
                let on_hand = stock.quantity(product);
                if on_hand < sale.quantity {
                    warn!(
                        product = %product,
                        on_hand,
                        sold = sale.quantity,
                        "Insufficient stock, clamping at zero"
                    );
                }
            }
        }

        for entry in apply_sale_effect(&mut stock, sale, effect) {
            StockRepository::upsert_in(&mut *conn, &entry).await?;
        }

        Ok(())
    }

    /// Removes every sale of the day. Stock is not restored.
    ///
    /// ## Returns
    /// Number of sales removed.
    pub async fn reset_day(&self) -> LedgerResult<u64> {
        let removed = self.db.sales().clear().await?;
        info!(removed, "Day reset");
        Ok(removed)
    }

    /// Every sale, newest first.
    pub async fn list_sales(&self) -> LedgerResult<Vec<SaleRecord>> {
        Ok(self.db.sales().list().await?)
    }

    /// Sales paid with one method, oldest first, for the per-method export.
    pub async fn sales_by_payment_method(&self, method: PaymentMethod) -> LedgerResult<Vec<SaleRecord>> {
        Ok(self.db.sales().list_by_payment_method(method).await?)
    }

    /// Pre-fills a new sale form from an earlier sale.
    pub async fn duplicate_sale(&self, id: &str) -> LedgerResult<SaleDraft> {
        validate_sale_id(id)?;

        let sale = self
            .db
            .sales()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;

        Ok(SaleDraft::from_record(&sale))
    }

    /// Statistics over every recorded sale.
    pub async fn daily_stats(&self) -> LedgerResult<SaleStats> {
        let sales = self.db.sales().list().await?;
        Ok(datche_core::stats::aggregate(&sales))
    }

    /// Prices a sale form against the current table without recording it.
    pub async fn quote(&self, request: &SaleRequest) -> LedgerResult<SaleQuote> {
        let prices = self.db.prices().load_table().await?;
        Ok(quote(request, &prices)?)
    }

    // =========================================================================
    // Prices
    // =========================================================================

    pub async fn prices(&self) -> LedgerResult<PriceTable> {
        Ok(self.db.prices().load_table().await?)
    }

    /// Replaces the whole price table.
    ///
    /// Recorded sales keep the unit price they were sold at.
    pub async fn update_prices(&self, table: &PriceTable) -> LedgerResult<()> {
        for entry in table.entries() {
            for currency in Currency::ALL {
                if let Some(price) = entry.price(currency) {
                    validate_price(price)?;
                }
            }
        }

        let mut tx = self.db.pool().begin().await?;
        PriceRepository::replace_all_in(&mut *tx, table).await?;
        tx.commit().await?;

        info!(products = table.len(), "Prices updated");
        Ok(())
    }

    /// Restores the default price table.
    pub async fn reset_prices(&self) -> LedgerResult<PriceTable> {
        let defaults = default_prices();
        self.update_prices(&defaults).await?;
        info!("Prices reset to defaults");
        Ok(defaults)
    }

    // =========================================================================
    // Stock
    // =========================================================================

    /// Sets the count of one product from the stock page.
    pub async fn set_stock(&self, product: Product, quantity: i64) -> LedgerResult<StockEntry> {
        validate_stock_quantity(product, quantity)?;

        let entry = StockEntry::new(product, quantity);
        self.db.stock().upsert(&entry).await?;

        info!(product = %product, quantity, "Stock set");
        Ok(entry)
    }

    /// Deletes every stock row; every product reads as zero afterwards.
    pub async fn reset_stock(&self) -> LedgerResult<u64> {
        let removed = self.db.stock().clear().await?;
        info!(removed, "Stock reset");
        Ok(removed)
    }

    /// One entry per stocked product, in catalog order.
    pub async fn stock_levels(&self) -> LedgerResult<Vec<StockEntry>> {
        Ok(self.db.stock().load_table().await?.levels())
    }

    /// Stocked products below the configured threshold.
    pub async fn low_stock(&self) -> LedgerResult<Vec<StockEntry>> {
        let low = self
            .db
            .stock()
            .load_table()
            .await?
            .low_stock(self.low_stock_threshold);

        debug!(threshold = self.low_stock_threshold, count = low.len(), "Low stock check");
        Ok(low)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use datche_core::{BoxTier, Money, SaleRejection, ValidationError};

    async fn seeded_ledger() -> Ledger {
        let ledger = Ledger::new(Database::new(DbConfig::in_memory()).await.unwrap());
        ledger.reset_prices().await.unwrap();
        ledger
    }

    #[tokio::test]
    async fn test_record_sale_snapshot() {
        let ledger = seeded_ledger().await;

        let sale = ledger
            .record_sale(
                &SaleRequest::new(Product::Shampoo, 2, PaymentMethod::Revolut)
                    .tendered(Money::from_minor(4300)),
            )
            .await
            .unwrap();

        assert_eq!(sale.currency, Currency::Eur);
        assert_eq!(sale.unit_price, Money::from_minor(2150));
        assert_eq!(sale.total, Money::from_minor(4300));
        assert!(sale.change_due.is_zero());

        // Later price edits leave the record alone
        let mut prices = ledger.prices().await.unwrap();
        prices.set_price(Product::Shampoo, Currency::Eur, Some(Money::from_minor(2500)));
        ledger.update_prices(&prices).await.unwrap();

        let stored = ledger.list_sales().await.unwrap();
        assert_eq!(stored, vec![sale]);
    }

    #[tokio::test]
    async fn test_rejection_writes_nothing() {
        let ledger = seeded_ledger().await;
        ledger.set_stock(Product::Towel, 4).await.unwrap();

        let err = ledger
            .record_sale(&SaleRequest::new(Product::Towel, 1, PaymentMethod::MobileMoney))
            .await
            .unwrap_err();

        assert_eq!(
            err.rejection(),
            Some(&SaleRejection::PriceNotConfigured {
                product: Product::Towel
            })
        );
        assert!(ledger.list_sales().await.unwrap().is_empty());
        assert_eq!(ledger.database().stock().get(Product::Towel).await.unwrap().unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn test_invalid_quantity_rejected() {
        let ledger = seeded_ledger().await;

        let err = ledger
            .record_sale(&SaleRequest::new(Product::Oil, 0, PaymentMethod::Cash))
            .await
            .unwrap_err();

        assert_eq!(err.rejection(), Some(&SaleRejection::InvalidQuantity { quantity: 0 }));
    }

    #[tokio::test]
    async fn test_oversized_quantity_rejected_without_writes() {
        let ledger = seeded_ledger().await;
        ledger.set_stock(Product::Shampoo, 4).await.unwrap();

        let quantity = i64::MAX / 1000;
        let err = ledger
            .record_sale(&SaleRequest::new(Product::Shampoo, quantity, PaymentMethod::Revolut))
            .await
            .unwrap_err();

        assert_eq!(
            err.rejection(),
            Some(&SaleRejection::AmountOutOfRange {
                product: Product::Shampoo,
                quantity
            })
        );
        assert!(ledger.list_sales().await.unwrap().is_empty());
        assert_eq!(ledger.database().stock().get(Product::Shampoo).await.unwrap().unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn test_mirror_has_no_default_price() {
        let ledger = seeded_ledger().await;

        let err = ledger
            .record_sale(&SaleRequest::new(Product::Mirror, 1, PaymentMethod::Revolut))
            .await
            .unwrap_err();

        assert_eq!(
            err.rejection(),
            Some(&SaleRejection::PriceMissing {
                product: Product::Mirror,
                currency: Currency::Eur
            })
        );
    }

    #[tokio::test]
    async fn test_delete_restores_stock() {
        let ledger = seeded_ledger().await;
        ledger.set_stock(Product::Oil, 10).await.unwrap();

        let sale = ledger
            .record_sale(&SaleRequest::new(Product::Oil, 3, PaymentMethod::MobileMoney))
            .await
            .unwrap();
        assert_eq!(ledger.database().stock().get(Product::Oil).await.unwrap().unwrap().quantity, 7);

        let deleted = ledger.delete_sale(&sale.id).await.unwrap();
        assert_eq!(deleted, sale);
        assert_eq!(ledger.database().stock().get(Product::Oil).await.unwrap().unwrap().quantity, 10);

        let err = ledger.delete_sale(&sale.id).await.unwrap_err();
        assert!(matches!(err, crate::LedgerError::Core(CoreError::SaleNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_rejects_malformed_id() {
        let ledger = seeded_ledger().await;

        let err = ledger.delete_sale("").await.unwrap_err();
        assert!(matches!(
            err,
            crate::LedgerError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[tokio::test]
    async fn test_reset_day_keeps_stock() {
        let ledger = seeded_ledger().await;
        ledger.set_stock(Product::Cream, 5).await.unwrap();

        ledger
            .record_sale(&SaleRequest::new(Product::Cream, 2, PaymentMethod::Revolut))
            .await
            .unwrap();
        ledger
            .record_sale(
                &SaleRequest::new(Product::Cream, 1, PaymentMethod::Cash)
                    .tendered(Money::from_minor(12000)),
            )
            .await
            .unwrap();

        assert_eq!(ledger.reset_day().await.unwrap(), 2);
        assert!(ledger.list_sales().await.unwrap().is_empty());
        assert_eq!(ledger.daily_stats().await.unwrap(), SaleStats::empty());

        let cream = ledger.database().stock().get(Product::Cream).await.unwrap().unwrap();
        assert_eq!(cream.quantity, 2);
    }

    #[tokio::test]
    async fn test_duplicate_sale() {
        let ledger = seeded_ledger().await;

        let cash = ledger
            .record_sale(
                &SaleRequest::new(Product::Box, 1, PaymentMethod::Cash)
                    .tendered(Money::from_minor(50000))
                    .box_tier(BoxTier::AfterLaunch),
            )
            .await
            .unwrap();

        let draft = ledger.duplicate_sale(&cash.id).await.unwrap();
        assert_eq!(draft.product, Product::Box);
        assert_eq!(draft.amount_tendered, Money::from_minor(50000));
        assert_eq!(draft.box_tier, Some(BoxTier::AfterLaunch));

        let again = ledger.record_sale(&draft.into_request()).await.unwrap();
        assert_ne!(again.id, cash.id);
        assert_eq!(again.change_due, Money::from_minor(5000));
    }

    #[tokio::test]
    async fn test_daily_stats_and_per_method_listing() {
        let ledger = seeded_ledger().await;

        for request in [
            SaleRequest::new(Product::Shampoo, 2, PaymentMethod::Revolut),
            SaleRequest::new(Product::Box, 1, PaymentMethod::MobileMoney),
            SaleRequest::new(Product::Mask, 1, PaymentMethod::Cash).tendered(Money::from_minor(13000)),
        ] {
            ledger.record_sale(&request).await.unwrap();
        }

        let stats = ledger.daily_stats().await.unwrap();
        assert_eq!(stats.sale_count, 3);
        assert_eq!(stats.total_quantity, 4);
        assert_eq!(stats.total_eur, Money::from_minor(4300));
        assert_eq!(stats.total_fcfa, Money::from_minor(58000));

        let mobile = ledger
            .sales_by_payment_method(PaymentMethod::MobileMoney)
            .await
            .unwrap();
        assert_eq!(mobile.len(), 1);
        assert_eq!(mobile[0].product, Product::Box);
    }

    #[tokio::test]
    async fn test_quote_does_not_record() {
        let ledger = seeded_ledger().await;

        let quote = ledger
            .quote(
                &SaleRequest::new(Product::Oil, 2, PaymentMethod::Cash)
                    .tendered(Money::from_minor(20000)),
            )
            .await
            .unwrap();

        assert_eq!(quote.total, Money::from_minor(30000));
        assert_eq!(quote.change_due, Money::from_minor(-10000));
        assert!(ledger.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_configured_towel_price_is_sellable() {
        let ledger = seeded_ledger().await;

        let mut prices = ledger.prices().await.unwrap();
        prices.set_price(Product::Towel, Currency::Fcfa, Some(Money::from_minor(3000)));
        ledger.update_prices(&prices).await.unwrap();

        let sale = ledger
            .record_sale(&SaleRequest::new(Product::Towel, 2, PaymentMethod::MobileMoney))
            .await
            .unwrap();
        assert_eq!(sale.total, Money::from_minor(6000));

        // Still unset in EUR
        let err = ledger
            .record_sale(&SaleRequest::new(Product::Towel, 1, PaymentMethod::Revolut))
            .await
            .unwrap_err();
        assert!(err.rejection().is_some());
    }

    #[tokio::test]
    async fn test_update_prices_rejects_negative() {
        let ledger = seeded_ledger().await;

        let mut prices = ledger.prices().await.unwrap();
        prices.set_price(Product::Mask, Currency::Eur, Some(Money::from_minor(-100)));

        let err = ledger.update_prices(&prices).await.unwrap_err();
        assert!(matches!(
            err,
            crate::LedgerError::Core(CoreError::Validation(ValidationError::Negative { .. }))
        ));
        assert_eq!(ledger.prices().await.unwrap(), default_prices());
    }

    #[tokio::test]
    async fn test_stock_page() {
        let ledger = seeded_ledger().await.with_low_stock_threshold(3);

        ledger.set_stock(Product::Shampoo, 12).await.unwrap();
        ledger.set_stock(Product::Mirror, 2).await.unwrap();
        ledger.set_stock(Product::Mask, 3).await.unwrap();

        assert!(ledger.set_stock(Product::Oil, -1).await.is_err());
        assert!(matches!(
            ledger.set_stock(Product::Box, 1).await.unwrap_err(),
            crate::LedgerError::Core(CoreError::Validation(ValidationError::NotStocked { .. }))
        ));

        let levels = ledger.stock_levels().await.unwrap();
        assert_eq!(levels.len(), 8);
        assert_eq!(levels[0], StockEntry::new(Product::Shampoo, 12));

        let low: Vec<Product> = ledger.low_stock().await.unwrap().into_iter().map(|e| e.product).collect();
        assert!(low.contains(&Product::Mirror));
        assert!(low.contains(&Product::Oil));
        assert!(!low.contains(&Product::Shampoo));
        assert!(!low.contains(&Product::Mask));

        assert_eq!(ledger.reset_stock().await.unwrap(), 3);
        assert!(ledger.stock_levels().await.unwrap().iter().all(|e| e.quantity == 0));
    }
}
