//! # Inventory Adjuster
//!
//! Stock bookkeeping triggered by sale creation and deletion.
//!
//! ## Box Fan-Out
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale: Box × 2  (SaleEffect::Created → delta = -2)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bundle_components(Box)                                                 │
//! │       │                                                                 │
//! │       ├──► Shampoo   -2        ├──► Towel     -2                        │
//! │       ├──► Mask      -2        ├──► Sprayer   -2                        │
//! │       ├──► Cream     -2        └──► Massager  -2                        │
//! │       └──► Oil       -2                                                 │
//! │                                                                         │
//! │  Deleting the sale (SaleEffect::Deleted) applies +2 to the same seven.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock never blocks a sale. A missing entry counts as zero, and every
//! result is clamped at zero, so the ledger may under-count after an
//! oversell; it is surfaced for human review on the stock page.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::catalog::{bundle_components, Product};
use crate::sale::SaleRecord;

// =============================================================================
// Stock Entry
// =============================================================================

/// Units on hand for one product. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockEntry {
    pub product: Product,
    pub quantity: i64,
}

impl StockEntry {
    /// Creates an entry, clamping a negative quantity to zero.
    pub fn new(product: Product, quantity: i64) -> Self {
        StockEntry {
            product,
            quantity: quantity.max(0),
        }
    }

    /// Applies a signed delta and clamps at zero.
    pub fn adjusted(&self, delta: i64) -> Self {
        StockEntry::new(self.product, self.quantity.saturating_add(delta))
    }
}

// =============================================================================
// Store Seam
// =============================================================================

/// Where the adjuster reads and writes stock entries.
///
/// Implemented by [`StockTable`] in memory; the database layer loads a
/// `StockTable` inside a transaction and writes back the touched entries.
pub trait StockStore {
    /// Current entry for `product`, if one has been created.
    fn stock(&self, product: Product) -> Option<StockEntry>;

    /// Creates or replaces the entry for `entry.product`.
    fn put_stock(&mut self, entry: StockEntry);
}

/// In-memory stock ledger keyed by product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTable {
    entries: BTreeMap<Product, i64>,
}

impl StockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = StockEntry>) -> Self {
        let mut table = StockTable::new();
        for entry in entries {
            table.put_stock(entry);
        }
        table
    }

    /// Quantity on hand; zero when no entry exists.
    pub fn quantity(&self, product: Product) -> i64 {
        self.entries.get(&product).copied().unwrap_or(0)
    }

    /// One entry per stocked product (missing ones reported as zero),
    /// in catalog order.
    pub fn levels(&self) -> Vec<StockEntry> {
        Product::stocked()
            .map(|product| StockEntry::new(product, self.quantity(product)))
            .collect()
    }

    /// Stocked products strictly below `threshold`. Empty ones included.
    pub fn low_stock(&self, threshold: i64) -> Vec<StockEntry> {
        self.levels()
            .into_iter()
            .filter(|entry| entry.quantity < threshold)
            .collect()
    }
}

impl StockStore for StockTable {
    fn stock(&self, product: Product) -> Option<StockEntry> {
        self.entries
            .get(&product)
            .map(|&quantity| StockEntry { product, quantity })
    }

    fn put_stock(&mut self, entry: StockEntry) {
        self.entries.insert(entry.product, entry.quantity.max(0));
    }
}

// =============================================================================
// Adjuster
// =============================================================================

/// Which way a sale moves stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleEffect {
    /// Sale recorded: stock goes down.
    Created,
    /// Sale deleted: stock is restored.
    Deleted,
}

impl SaleEffect {
    pub const fn sign(&self) -> i64 {
        match self {
            SaleEffect::Created => -1,
            SaleEffect::Deleted => 1,
        }
    }
}

/// Products whose stock moves when `product` is sold: the constituents of a
/// composite, otherwise the product itself.
pub fn stock_targets(product: &Product) -> &[Product] {
    match bundle_components(*product) {
        Some(components) => components,
        None => std::slice::from_ref(product),
    }
}

/// Applies `delta` to the stock of `product`.
///
/// A composite product applies the same delta to each of its constituents
/// instead. Returns the entries written, in the order they were written.
pub fn apply_delta<S: StockStore + ?Sized>(
    store: &mut S,
    product: Product,
    delta: i64,
) -> Vec<StockEntry> {
    stock_targets(&product)
        .iter()
        .map(|&target| {
            let current = store
                .stock(target)
                .unwrap_or_else(|| StockEntry::new(target, 0));
            let updated = current.adjusted(delta);
            store.put_stock(updated);
            updated
        })
        .collect()
}

/// Applies the stock movement caused by recording or deleting `sale`.
///
/// ## Example
/// ```rust
/// use datche_core::inventory::{apply_sale_effect, SaleEffect, StockEntry, StockTable};
/// use datche_core::pricing::default_prices;
/// use datche_core::sale::{create_sale, SaleRequest};
/// use datche_core::{PaymentMethod, Product};
///
/// let mut stock = StockTable::from_entries([StockEntry::new(Product::Oil, 10)]);
/// let sale = create_sale(
///     &SaleRequest::new(Product::Oil, 3, PaymentMethod::Revolut),
///     &default_prices(),
/// )
/// .unwrap();
///
/// apply_sale_effect(&mut stock, &sale, SaleEffect::Created);
/// assert_eq!(stock.quantity(Product::Oil), 7);
///
/// apply_sale_effect(&mut stock, &sale, SaleEffect::Deleted);
/// assert_eq!(stock.quantity(Product::Oil), 10);
/// ```
pub fn apply_sale_effect<S: StockStore + ?Sized>(
    store: &mut S,
    sale: &SaleRecord,
    effect: SaleEffect,
) -> Vec<StockEntry> {
    apply_delta(store, sale.product, effect.sign() * sale.quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::default_prices;
    use crate::sale::{create_sale, SaleRequest};
    use crate::types::PaymentMethod;
    use proptest::prelude::*;

    fn box_sale(quantity: i64) -> SaleRecord {
        create_sale(
            &SaleRequest::new(Product::Box, quantity, PaymentMethod::MobileMoney),
            &default_prices(),
        )
        .unwrap()
    }

    #[test]
    fn test_box_sale_and_deletion_scenario() {
        let components = bundle_components(Product::Box).unwrap();
        let mut stock =
            StockTable::from_entries(components.iter().map(|&p| StockEntry::new(p, 3)));
        stock.put_stock(StockEntry::new(Product::Mirror, 3));

        let sale = box_sale(1);

        let touched = apply_sale_effect(&mut stock, &sale, SaleEffect::Created);
        assert_eq!(touched.len(), 7);
        for &product in components {
            assert_eq!(stock.quantity(product), 2, "{product}");
        }
        assert_eq!(stock.quantity(Product::Mirror), 3);
        assert!(stock.stock(Product::Box).is_none());

        apply_sale_effect(&mut stock, &sale, SaleEffect::Deleted);
        for &product in components {
            assert_eq!(stock.quantity(product), 3, "{product}");
        }
    }

    #[test]
    fn test_box_moves_each_component_by_quantity() {
        let mut stock = StockTable::from_entries(
            Product::stocked().map(|p| StockEntry::new(p, 10)),
        );

        apply_sale_effect(&mut stock, &box_sale(4), SaleEffect::Created);

        for &product in bundle_components(Product::Box).unwrap() {
            assert_eq!(stock.quantity(product), 6);
        }
    }

    #[test]
    fn test_missing_entry_is_created_clamped() {
        let mut stock = StockTable::new();

        let touched = apply_delta(&mut stock, Product::Mirror, -5);
        assert_eq!(touched, vec![StockEntry::new(Product::Mirror, 0)]);
        assert_eq!(stock.stock(Product::Mirror), Some(StockEntry::new(Product::Mirror, 0)));

        apply_delta(&mut stock, Product::Mask, 4);
        assert_eq!(stock.quantity(Product::Mask), 4);
    }

    #[test]
    fn test_oversell_clamps_instead_of_blocking() {
        let mut stock = StockTable::from_entries([StockEntry::new(Product::Shampoo, 1)]);

        apply_delta(&mut stock, Product::Shampoo, -3);
        assert_eq!(stock.quantity(Product::Shampoo), 0);

        // Restoring after a clamp does not recover the lost units.
        apply_delta(&mut stock, Product::Shampoo, 3);
        assert_eq!(stock.quantity(Product::Shampoo), 3);
    }

    #[test]
    fn test_levels_and_low_stock() {
        let stock = StockTable::from_entries([
            StockEntry::new(Product::Shampoo, 12),
            StockEntry::new(Product::Oil, 4),
        ]);

        let levels = stock.levels();
        assert_eq!(levels.len(), 8);
        assert_eq!(levels[0], StockEntry::new(Product::Shampoo, 12));

        let low: Vec<Product> = stock.low_stock(5).into_iter().map(|e| e.product).collect();
        assert!(low.contains(&Product::Oil));
        assert!(low.contains(&Product::Mirror));
        assert!(!low.contains(&Product::Shampoo));
    }

    #[test]
    fn test_low_stock_threshold_is_exclusive() {
        let stock = StockTable::from_entries([
            StockEntry::new(Product::Shampoo, 5),
            StockEntry::new(Product::Oil, 4),
            StockEntry::new(Product::Mask, 0),
        ]);

        let low: Vec<Product> = stock.low_stock(5).into_iter().map(|e| e.product).collect();
        assert!(!low.contains(&Product::Shampoo));
        assert!(low.contains(&Product::Oil));
        assert!(low.contains(&Product::Mask));

        assert!(stock.low_stock(0).is_empty());
    }

    #[test]
    fn test_stock_targets() {
        assert_eq!(stock_targets(&Product::Box).len(), 7);
        assert_eq!(stock_targets(&Product::Mirror), &[Product::Mirror]);
    }

    #[test]
    fn test_entry_constructor_clamps() {
        assert_eq!(StockEntry::new(Product::Oil, -8).quantity, 0);
        assert_eq!(StockEntry::new(Product::Oil, 2).adjusted(i64::MIN).quantity, 0);
    }

    proptest! {
        #[test]
        fn prop_stock_never_negative(
            deltas in prop::collection::vec(
                (prop::sample::select(Product::ALL.to_vec()), -1_000i64..1_000),
                0..64,
            )
        ) {
            let mut stock = StockTable::new();
            for (product, delta) in deltas {
                for entry in apply_delta(&mut stock, product, delta) {
                    prop_assert!(entry.quantity >= 0);
                }
            }
            for entry in stock.levels() {
                prop_assert!(entry.quantity >= 0);
            }
        }

        #[test]
        fn prop_box_sale_then_delete_restores_stock(
            start in 0i64..1_000,
            quantity in 1i64..100,
        ) {
            let start = start.max(quantity);
            let mut stock = StockTable::from_entries(
                Product::stocked().map(|p| StockEntry::new(p, start)),
            );
            let before = stock.clone();
            let sale = box_sale(quantity);

            apply_sale_effect(&mut stock, &sale, SaleEffect::Created);
            for &product in bundle_components(Product::Box).unwrap() {
                prop_assert_eq!(stock.quantity(product), start - quantity);
            }

            apply_sale_effect(&mut stock, &sale, SaleEffect::Deleted);
            prop_assert_eq!(stock, before);
        }
    }
}
