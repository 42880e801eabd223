//! # Pricing
//!
//! The per-product price table and the price resolver.
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve_price(product, currency, table)                                │
//! │       │                                                                 │
//! │       ├── no entry for product?          → None (data-integrity gap)    │
//! │       │                                                                 │
//! │       ├── field for currency unset?      → None                         │
//! │       │                                                                 │
//! │       ├── box component at zero?         → None (not configured)        │
//! │       │                                                                 │
//! │       └── otherwise                      → Some(price), zero included   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Towel, Sprayer and Massager ship free inside the box, so a zero price for
//! them can only mean "not set yet". [`PriceEntry`] stores that as `None`
//! rather than zero; every other product keeps an explicit zero as a real
//! price.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::catalog::Product;
use crate::error::SaleRejection;
use crate::money::{Currency, Money};

// =============================================================================
// Price Entry
// =============================================================================

/// Price of one product in both currencies. `None` means not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PriceEntry {
    pub product: Product,
    pub eur: Option<Money>,
    pub fcfa: Option<Money>,
}

impl PriceEntry {
    /// Creates an entry, normalizing a zero price to "unset" for products
    /// that require an explicit price.
    pub fn new(product: Product, eur: Option<Money>, fcfa: Option<Money>) -> Self {
        PriceEntry {
            product,
            eur: normalize(product, eur),
            fcfa: normalize(product, fcfa),
        }
    }

    /// Entry with no price in either currency.
    pub fn unset(product: Product) -> Self {
        PriceEntry {
            product,
            eur: None,
            fcfa: None,
        }
    }

    /// Returns the stored price for `currency`.
    pub fn price(&self, currency: Currency) -> Option<Money> {
        match currency {
            Currency::Eur => self.eur,
            Currency::Fcfa => self.fcfa,
        }
    }

    /// Sets (or clears) the price for one currency.
    pub fn set_price(&mut self, currency: Currency, price: Option<Money>) {
        let price = normalize(self.product, price);
        match currency {
            Currency::Eur => self.eur = price,
            Currency::Fcfa => self.fcfa = price,
        }
    }
}

fn normalize(product: Product, price: Option<Money>) -> Option<Money> {
    price.filter(|p| !(product.requires_explicit_price() && p.is_zero()))
}

// =============================================================================
// Price Table
// =============================================================================

/// One [`PriceEntry`] per product, unique by product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    entries: BTreeMap<Product, PriceEntry>,
}

impl PriceTable {
    /// An empty table (every lookup fails).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from rows; a later row for the same product wins.
    pub fn from_entries(entries: impl IntoIterator<Item = PriceEntry>) -> Self {
        let mut table = PriceTable::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Inserts or replaces the entry for `entry.product`.
    pub fn insert(&mut self, entry: PriceEntry) {
        let entry = PriceEntry::new(entry.product, entry.eur, entry.fcfa);
        self.entries.insert(entry.product, entry);
    }

    pub fn entry(&self, product: Product) -> Option<&PriceEntry> {
        self.entries.get(&product)
    }

    /// Sets one price, creating the entry if the product has none yet.
    pub fn set_price(&mut self, product: Product, currency: Currency, price: Option<Money>) {
        self.entries
            .entry(product)
            .or_insert_with(|| PriceEntry::unset(product))
            .set_price(currency, price);
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &PriceEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a price, or explains why it cannot be resolved.
    ///
    /// ## Returns
    /// * `Ok(price)` - the unit price to freeze on the sale
    /// * `Err(PriceNotConfigured)` - box component with no standalone price
    /// * `Err(PriceMissing)` - any other product without a price
    pub fn lookup(&self, product: Product, currency: Currency) -> Result<Money, SaleRejection> {
        resolve_price(product, currency, self).ok_or(if product.requires_explicit_price() {
            SaleRejection::PriceNotConfigured { product }
        } else {
            SaleRejection::PriceMissing { product, currency }
        })
    }
}

impl FromIterator<PriceEntry> for PriceTable {
    fn from_iter<I: IntoIterator<Item = PriceEntry>>(iter: I) -> Self {
        PriceTable::from_entries(iter)
    }
}

// =============================================================================
// Price Resolver
// =============================================================================

/// Returns the applicable unit price, or `None` when it is undefined.
///
/// ## Example
/// ```rust
/// use datche_core::money::{Currency, Money};
/// use datche_core::pricing::{default_prices, resolve_price};
/// use datche_core::Product;
///
/// let table = default_prices();
/// assert_eq!(
///     resolve_price(Product::Shampoo, Currency::Eur, &table),
///     Some(Money::from_minor(2150))
/// );
/// assert_eq!(resolve_price(Product::Towel, Currency::Fcfa, &table), None);
/// ```
pub fn resolve_price(product: Product, currency: Currency, table: &PriceTable) -> Option<Money> {
    let price = table.entry(product)?.price(currency)?;

    if product.requires_explicit_price() && price.is_zero() {
        return None;
    }

    Some(price)
}

// =============================================================================
// Default Prices
// =============================================================================

/// The price table a fresh installation starts with.
///
/// | Product | EUR | FCFA |
/// |---|---|---|
/// | Shampoo | 21.50 | 14000 |
/// | Mask | 20.00 | 13000 |
/// | Cream | 18.50 | 12000 |
/// | Oil | 22.99 | 15000 |
/// | Box | 70.00 | 45000 |
///
/// Towel, Sprayer, Massager and Mirror start unset.
pub fn default_prices() -> PriceTable {
    let priced = |product, eur, fcfa| {
        PriceEntry::new(
            product,
            Some(Money::from_minor(eur)),
            Some(Money::from_minor(fcfa)),
        )
    };

    PriceTable::from_entries([
        priced(Product::Shampoo, 2150, 14000),
        priced(Product::Mask, 2000, 13000),
        priced(Product::Cream, 1850, 12000),
        priced(Product::Oil, 2299, 15000),
        priced(Product::Box, 7000, 45000),
        PriceEntry::unset(Product::Towel),
        PriceEntry::unset(Product::Sprayer),
        PriceEntry::unset(Product::Massager),
        PriceEntry::unset(Product::Mirror),
    ])
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_catalog() {
        let table = default_prices();
        assert_eq!(table.len(), Product::ALL.len());
        for product in Product::ALL {
            assert!(table.entry(product).is_some(), "{product} not seeded");
        }
    }

    #[test]
    fn test_components_unresolvable_until_priced() {
        let mut table = default_prices();

        for product in [Product::Towel, Product::Sprayer, Product::Massager] {
            for currency in Currency::ALL {
                assert_eq!(resolve_price(product, currency, &table), None);
            }

            table.set_price(product, Currency::Fcfa, Some(Money::from_minor(2500)));
            assert_eq!(
                resolve_price(product, Currency::Fcfa, &table),
                Some(Money::from_minor(2500))
            );
            assert_eq!(resolve_price(product, Currency::Eur, &table), None);
        }
    }

    #[test]
    fn test_zero_for_component_means_unset() {
        let mut table = default_prices();
        table.set_price(Product::Towel, Currency::Eur, Some(Money::zero()));

        assert_eq!(table.entry(Product::Towel).unwrap().eur, None);
        assert_eq!(
            table.lookup(Product::Towel, Currency::Eur),
            Err(SaleRejection::PriceNotConfigured {
                product: Product::Towel
            })
        );
    }

    #[test]
    fn test_resolver_guards_raw_zero_for_component() {
        // Rows built without going through `new` (e.g. straight from storage).
        let mut table = PriceTable::new();
        table.entries.insert(
            Product::Massager,
            PriceEntry {
                product: Product::Massager,
                eur: Some(Money::zero()),
                fcfa: Some(Money::zero()),
            },
        );

        assert_eq!(resolve_price(Product::Massager, Currency::Eur, &table), None);
    }

    #[test]
    fn test_explicit_zero_is_a_price_for_other_products() {
        let mut table = default_prices();
        table.set_price(Product::Box, Currency::Fcfa, Some(Money::zero()));
        table.set_price(Product::Mirror, Currency::Eur, Some(Money::zero()));

        assert_eq!(
            resolve_price(Product::Box, Currency::Fcfa, &table),
            Some(Money::zero())
        );
        assert_eq!(
            resolve_price(Product::Mirror, Currency::Eur, &table),
            Some(Money::zero())
        );
    }

    #[test]
    fn test_lookup_reasons() {
        let table = default_prices();

        assert_eq!(
            table.lookup(Product::Mirror, Currency::Fcfa),
            Err(SaleRejection::PriceMissing {
                product: Product::Mirror,
                currency: Currency::Fcfa
            })
        );
        assert_eq!(
            PriceTable::new().lookup(Product::Shampoo, Currency::Eur),
            Err(SaleRejection::PriceMissing {
                product: Product::Shampoo,
                currency: Currency::Eur
            })
        );
        assert_eq!(
            table.lookup(Product::Oil, Currency::Eur),
            Ok(Money::from_minor(2299))
        );
    }

    #[test]
    fn test_later_entry_wins() {
        let table = PriceTable::from_entries([
            PriceEntry::new(Product::Mask, Some(Money::from_minor(100)), None),
            PriceEntry::new(Product::Mask, Some(Money::from_minor(200)), None),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(
            resolve_price(Product::Mask, Currency::Eur, &table),
            Some(Money::from_minor(200))
        );
    }
}
