//! # Money Module
//!
//! Provides the `Money` and `Currency` types for the two currencies the
//! stand accepts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TWO CURRENCIES, ONE REPRESENTATION                                     │
//! │                                                                         │
//! │  EUR  (Revolut)             → smallest unit: cent    21.50 € = 2150     │
//! │  FCFA (Mobile Money, cash)  → no minor unit          14000 F = 14000    │
//! │                                                                         │
//! │  Every amount is an i64 in the smallest unit of ITS currency.           │
//! │  Amounts are never converted between currencies.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use datche_core::money::{Currency, Money};
//!
//! let shampoo = Money::from_major_minor(21, 50); // 21.50 €
//! let total = shampoo * 2;
//! assert_eq!(Currency::Eur.format(total), "43.00 €");
//!
//! let fcfa = Money::from_minor(14000);
//! assert_eq!(Currency::Fcfa.format(fcfa), "14000 F CFA");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Currency
// =============================================================================

/// Currency an amount is denominated in.
///
/// The currency of a sale is never chosen directly: it follows from the
/// payment method (see [`crate::PaymentMethod::currency`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// Euro, two decimals.
    Eur,
    /// Franc CFA, whole units only.
    Fcfa,
}

impl Currency {
    /// Both currencies, in display order.
    pub const ALL: [Currency; 2] = [Currency::Eur, Currency::Fcfa];

    /// ISO-style code shown in the sales table.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Fcfa => "FCFA",
        }
    }

    /// Number of decimal places carried by the smallest unit.
    pub const fn decimals(&self) -> u32 {
        match self {
            Currency::Eur => 2,
            Currency::Fcfa => 0,
        }
    }

    /// Formats an amount for display.
    ///
    /// - EUR: two decimals with a trailing euro sign, `"21.50 €"`
    /// - FCFA: whole units with a trailing `F CFA`, `"14000 F CFA"`
    ///
    /// ## Example
    /// ```rust
    /// use datche_core::money::{Currency, Money};
    ///
    /// assert_eq!(Currency::Eur.format(Money::from_minor(-550)), "-5.50 €");
    /// assert_eq!(Currency::Fcfa.format(Money::zero()), "0 F CFA");
    /// ```
    pub fn format(&self, amount: Money) -> String {
        match self {
            Currency::Eur => {
                let sign = if amount.is_negative() { "-" } else { "" };
                format!(
                    "{}{}.{:02} €",
                    sign,
                    amount.major().abs(),
                    amount.minor_part()
                )
            }
            Currency::Fcfa => format!("{} F CFA", amount.minor()),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest unit of its currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: change due is negative when a cash customer still owes
/// - **No currency tag**: the owning record carries the currency, so a sale
///   snapshot stays valid even if the price table changes later
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a value from the smallest currency unit (cents for EUR,
    /// francs for FCFA).
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a EUR-style value from whole and fractional parts.
    ///
    /// ## Example
    /// ```rust
    /// use datche_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(22, 99).minor(), 2299);
    /// assert_eq!(Money::from_major_minor(-5, 50).minor(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Whole-unit portion of a two-decimal amount.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Fractional portion of a two-decimal amount (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use datche_core::money::Money;
    ///
    /// let unit = Money::from_minor(2150);
    /// assert_eq!(unit.checked_multiply_quantity(2), Some(Money::from_minor(4300)));
    /// assert_eq!(unit.checked_multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }

    /// Subtraction, `None` on overflow.
    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }

    /// Addition clamped at the `i64` bounds.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
