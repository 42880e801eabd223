//! # Statistics Aggregator
//!
//! Folds a day's sales into the summary shown under the sales table and
//! handed to the report exporters.
//!
//! The fold is commutative: the order of the input never changes the
//! result. Currency totals follow each record's own `currency` field, so
//! sales recorded under an older price table still count where they were
//! paid.

use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::catalog::Product;
use crate::money::{Currency, Money};
use crate::sale::SaleRecord;
use crate::types::PaymentMethod;

/// Aggregate statistics over a collection of sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SaleStats {
    pub sale_count: usize,
    pub total_quantity: i64,
    /// Every catalog product, zero when unsold.
    pub quantity_by_product: BTreeMap<Product, i64>,
    /// Every payment method, zero when unused. Each total is in the
    /// method's own currency.
    pub total_by_payment_method: BTreeMap<PaymentMethod, Money>,
    pub total_eur: Money,
    pub total_fcfa: Money,
}

/// Running total of one payment method, with the currency it is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PaymentBalance {
    pub payment_method: PaymentMethod,
    pub currency: Currency,
    pub total: Money,
}

impl SaleStats {
    /// Statistics of an empty day.
    pub fn empty() -> Self {
        SaleStats {
            sale_count: 0,
            total_quantity: 0,
            quantity_by_product: Product::ALL.into_iter().map(|p| (p, 0)).collect(),
            total_by_payment_method: PaymentMethod::ALL
                .into_iter()
                .map(|m| (m, Money::zero()))
                .collect(),
            total_eur: Money::zero(),
            total_fcfa: Money::zero(),
        }
    }

    /// Folds one sale in. Sums clamp at the `i64` bounds.
    pub fn record(&mut self, sale: &SaleRecord) {
        self.sale_count += 1;
        self.total_quantity = self.total_quantity.saturating_add(sale.quantity);

        let units = self.quantity_by_product.entry(sale.product).or_insert(0);
        *units = units.saturating_add(sale.quantity);

        let balance = self
            .total_by_payment_method
            .entry(sale.payment_method)
            .or_insert_with(Money::zero);
        *balance = balance.saturating_add(sale.total);

        match sale.currency {
            Currency::Eur => self.total_eur = self.total_eur.saturating_add(sale.total),
            Currency::Fcfa => self.total_fcfa = self.total_fcfa.saturating_add(sale.total),
        }
    }

    /// Grand total for one currency.
    pub fn total_in(&self, currency: Currency) -> Money {
        match currency {
            Currency::Eur => self.total_eur,
            Currency::Fcfa => self.total_fcfa,
        }
    }

    /// Per-method balances with their display currency.
    pub fn balances(&self) -> Vec<PaymentBalance> {
        PaymentMethod::ALL
            .into_iter()
            .map(|method| PaymentBalance {
                payment_method: method,
                currency: method.currency(),
                total: self
                    .total_by_payment_method
                    .get(&method)
                    .copied()
                    .unwrap_or_default(),
            })
            .collect()
    }
}

impl Default for SaleStats {
    fn default() -> Self {
        SaleStats::empty()
    }
}

/// Computes statistics over `sales`. Pure; no ordering requirement.
///
/// ## Example
/// ```rust
/// use datche_core::stats::aggregate;
///
/// let stats = aggregate(&[]);
/// assert_eq!(stats.sale_count, 0);
/// assert!(stats.total_eur.is_zero() && stats.total_fcfa.is_zero());
/// ```
pub fn aggregate<'a>(sales: impl IntoIterator<Item = &'a SaleRecord>) -> SaleStats {
    sales.into_iter().fold(SaleStats::empty(), |mut stats, sale| {
        stats.record(sale);
        stats
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::default_prices;
    use crate::sale::{create_sale, SaleRequest};
    use proptest::prelude::*;

    fn sale(product: Product, quantity: i64, method: PaymentMethod) -> SaleRecord {
        let request = SaleRequest::new(product, quantity, method).tendered(Money::from_minor(1));
        create_sale(&request, &default_prices()).unwrap()
    }

    #[test]
    fn test_empty_collection() {
        let stats = aggregate(Vec::<SaleRecord>::new().iter());

        assert_eq!(stats.sale_count, 0);
        assert_eq!(stats.total_quantity, 0);
        assert_eq!(stats.total_eur, Money::zero());
        assert_eq!(stats.total_fcfa, Money::zero());
        assert_eq!(stats.quantity_by_product.len(), Product::ALL.len());
        assert!(stats.quantity_by_product.values().all(|&q| q == 0));
        assert_eq!(stats.total_by_payment_method.len(), 3);
    }

    #[test]
    fn test_day_summary() {
        let sales = vec![
            sale(Product::Shampoo, 2, PaymentMethod::Revolut),
            sale(Product::Box, 1, PaymentMethod::MobileMoney),
            sale(Product::Oil, 1, PaymentMethod::Cash),
            sale(Product::Shampoo, 1, PaymentMethod::Cash),
        ];

        let stats = aggregate(&sales);

        assert_eq!(stats.sale_count, 4);
        assert_eq!(stats.total_quantity, 5);
        assert_eq!(stats.quantity_by_product[&Product::Shampoo], 3);
        assert_eq!(stats.quantity_by_product[&Product::Box], 1);
        assert_eq!(stats.quantity_by_product[&Product::Mirror], 0);

        assert_eq!(stats.total_eur, Money::from_minor(4300));
        assert_eq!(stats.total_fcfa, Money::from_minor(45000 + 15000 + 14000));
        assert_eq!(
            stats.total_by_payment_method[&PaymentMethod::Cash],
            Money::from_minor(29000)
        );
        assert_eq!(stats.total_in(Currency::Eur), stats.total_eur);
    }

    #[test]
    fn test_currency_total_uses_record_currency() {
        let mut odd = sale(Product::Mask, 1, PaymentMethod::Revolut);
        odd.currency = Currency::Fcfa;

        let stats = aggregate([&odd]);
        assert_eq!(stats.total_eur, Money::zero());
        assert_eq!(stats.total_fcfa, odd.total);
    }

    #[test]
    fn test_huge_totals_clamp_instead_of_wrapping() {
        let mut big = sale(Product::Shampoo, 1, PaymentMethod::Revolut);
        big.total = Money::from_minor(i64::MAX - 10);
        let small = sale(Product::Shampoo, 1, PaymentMethod::Revolut);

        let stats = aggregate([&big, &small]);
        assert_eq!(stats.total_eur, Money::from_minor(i64::MAX));
        assert_eq!(
            stats.total_by_payment_method[&PaymentMethod::Revolut],
            Money::from_minor(i64::MAX)
        );
        assert_eq!(stats.total_quantity, 2);
    }

    #[test]
    fn test_balances() {
        let sales = vec![
            sale(Product::Cream, 1, PaymentMethod::Revolut),
            sale(Product::Cream, 2, PaymentMethod::MobileMoney),
        ];
        let balances = aggregate(&sales).balances();

        assert_eq!(balances.len(), 3);
        assert_eq!(balances[0].payment_method, PaymentMethod::Revolut);
        assert_eq!(balances[0].currency, Currency::Eur);
        assert_eq!(balances[0].total, Money::from_minor(1850));
        assert_eq!(balances[1].total, Money::from_minor(24000));
        assert_eq!(balances[2].currency, Currency::Fcfa);
        assert!(balances[2].total.is_zero());
    }

    proptest! {
        #[test]
        fn prop_aggregate_ignores_order(
            (sales, shuffled) in prop::collection::vec(
                (
                    prop::sample::select(vec![
                        Product::Shampoo, Product::Mask, Product::Cream,
                        Product::Oil, Product::Box,
                    ]),
                    1i64..20,
                    prop::sample::select(PaymentMethod::ALL.to_vec()),
                ),
                0..24,
            )
            .prop_map(|specs| {
                specs
                    .into_iter()
                    .map(|(product, quantity, method)| sale(product, quantity, method))
                    .collect::<Vec<SaleRecord>>()
            })
            .prop_flat_map(|sales| (Just(sales.clone()), Just(sales).prop_shuffle())),
        ) {
            prop_assert_eq!(aggregate(&sales), aggregate(&shuffled));
        }
    }
}
