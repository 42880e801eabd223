//! # Sale Factory
//!
//! Validates a prospective sale and builds the immutable [`SaleRecord`].
//!
//! ## Validation Order (first failure wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleRequest { product, quantity, payment_method, amount_tendered }     │
//! │       │                                                                 │
//! │       ├── 1. quantity < 1?            → InvalidQuantity                 │
//! │       │                                                                 │
//! │       ├── 2. currency = payment_method.currency()                       │
//! │       │                                                                 │
//! │       ├── 3. unit price unresolved?   → PriceNotConfigured              │
//! │       │                                  | PriceMissing                 │
//! │       │                                                                 │
//! │       ├── 4. total = unit_price × quantity                              │
//! │       │                                                                 │
//! │       ├── 5. tendered = cash ? amount entered : total                   │
//! │       │      change   = tendered − total                                │
//! │       │                                                                 │
//! │       └── 6. fresh id + timestamp → SaleRecord                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The factory performs no I/O. Persisting the record and adjusting stock are
//! the caller's job, and only after `Ok`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::Product;
use crate::error::SaleRejection;
use crate::money::{Currency, Money};
use crate::pricing::PriceTable;
use crate::types::{BoxTier, PaymentMethod};

// =============================================================================
// Sale Request
// =============================================================================

/// Form input for one sale, as collected by the sales page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    pub product: Product,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
    /// Cash handed over by the customer. Ignored for non-cash methods.
    pub amount_tendered: Money,
    #[serde(default)]
    pub box_tier: Option<BoxTier>,
}

impl SaleRequest {
    pub fn new(product: Product, quantity: i64, payment_method: PaymentMethod) -> Self {
        SaleRequest {
            product,
            quantity,
            payment_method,
            amount_tendered: Money::zero(),
            box_tier: None,
        }
    }

    pub fn tendered(mut self, amount: Money) -> Self {
        self.amount_tendered = amount;
        self
    }

    pub fn box_tier(mut self, tier: BoxTier) -> Self {
        self.box_tier = Some(tier);
        self
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// A recorded sale.
///
/// ## Snapshot Pattern
/// `unit_price` and `currency` are frozen at creation. Editing the price
/// table later never changes a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleRecord {
    pub id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub product: Product,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
    pub currency: Currency,
    pub unit_price: Money,
    /// unit_price × quantity.
    pub total: Money,
    pub amount_tendered: Money,
    /// amount_tendered − total. Negative means the customer still owes.
    pub change_due: Money,
    pub box_tier: Option<BoxTier>,
}

impl SaleRecord {
    /// True when a cash customer handed over less than the total.
    pub fn is_underpaid(&self) -> bool {
        self.change_due.is_negative()
    }
}

// =============================================================================
// Sale Quote
// =============================================================================

/// Live preview of a sale form: what would be recorded if saved now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SaleQuote {
    pub currency: Currency,
    pub unit_price: Money,
    pub total: Money,
    pub amount_tendered: Money,
    pub change_due: Money,
}

/// Runs steps 1-5 of the factory without allocating an id.
pub fn quote(request: &SaleRequest, prices: &PriceTable) -> Result<SaleQuote, SaleRejection> {
    if request.quantity < 1 {
        return Err(SaleRejection::InvalidQuantity {
            quantity: request.quantity,
        });
    }

    let currency = request.payment_method.currency();
    let unit_price = prices.lookup(request.product, currency)?;
    let out_of_range = || SaleRejection::AmountOutOfRange {
        product: request.product,
        quantity: request.quantity,
    };
    let total = unit_price
        .checked_multiply_quantity(request.quantity)
        .ok_or_else(out_of_range)?;

    let amount_tendered = if request.payment_method.is_cash() {
        request.amount_tendered
    } else {
        total
    };
    let change_due = amount_tendered.checked_sub(total).ok_or_else(out_of_range)?;

    Ok(SaleQuote {
        currency,
        unit_price,
        total,
        amount_tendered,
        change_due,
    })
}

// =============================================================================
// Factory
// =============================================================================

/// Validates and prices a sale, returning the record to persist.
///
/// ## Example
/// ```rust
/// use datche_core::pricing::default_prices;
/// use datche_core::sale::{create_sale, SaleRequest};
/// use datche_core::{Money, PaymentMethod, Product};
///
/// let request = SaleRequest::new(Product::Shampoo, 2, PaymentMethod::Revolut)
///     .tendered(Money::from_minor(4300));
/// let sale = create_sale(&request, &default_prices()).unwrap();
///
/// assert_eq!(sale.unit_price.minor(), 2150);
/// assert_eq!(sale.total.minor(), 4300);
/// assert!(sale.change_due.is_zero());
/// ```
pub fn create_sale(request: &SaleRequest, prices: &PriceTable) -> Result<SaleRecord, SaleRejection> {
    create_sale_at(request, prices, Uuid::new_v4().to_string(), Utc::now())
}

/// Same as [`create_sale`] with a caller-supplied id and timestamp.
pub fn create_sale_at(
    request: &SaleRequest,
    prices: &PriceTable,
    id: String,
    created_at: DateTime<Utc>,
) -> Result<SaleRecord, SaleRejection> {
    let quote = quote(request, prices)?;

    Ok(SaleRecord {
        id,
        created_at,
        product: request.product,
        quantity: request.quantity,
        payment_method: request.payment_method,
        currency: quote.currency,
        unit_price: quote.unit_price,
        total: quote.total,
        amount_tendered: quote.amount_tendered,
        change_due: quote.change_due,
        box_tier: request.box_tier.filter(|_| request.product.is_bundle()),
    })
}

// =============================================================================
// Sale Draft
// =============================================================================

/// A pre-filled sale form, used to duplicate an earlier sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDraft {
    pub product: Product,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
    pub amount_tendered: Money,
    pub box_tier: Option<BoxTier>,
}

impl SaleDraft {
    /// Copies a recorded sale into a new form. Only cash keeps the tendered
    /// amount; other methods recompute it from the current price.
    pub fn from_record(record: &SaleRecord) -> Self {
        SaleDraft {
            product: record.product,
            quantity: record.quantity,
            payment_method: record.payment_method,
            amount_tendered: if record.payment_method.is_cash() {
                record.amount_tendered
            } else {
                Money::zero()
            },
            box_tier: record.box_tier,
        }
    }

    pub fn into_request(self) -> SaleRequest {
        SaleRequest {
            product: self.product,
            quantity: self.quantity,
            payment_method: self.payment_method,
            amount_tendered: self.amount_tendered,
            box_tier: self.box_tier,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
