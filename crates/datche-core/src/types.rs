//! # Domain Types
//!
//! Small shared enums used across the ledger.
//!
//! ## Payment → Currency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PaymentMethod          Currency        Change handling                 │
//! │  ─────────────          ────────        ───────────────                 │
//! │  Revolut        ──────► EUR             tendered = total                │
//! │  MobileMoney    ──────► FCFA            tendered = total                │
//! │  Cash           ──────► FCFA            tendered entered by cashier     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Currency;

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Revolut transfer, settled in EUR.
    Revolut,
    /// Mobile Money transfer, settled in FCFA.
    MobileMoney,
    /// Physical cash, FCFA.
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Revolut,
        PaymentMethod::MobileMoney,
        PaymentMethod::Cash,
    ];

    /// The currency a sale paid this way is priced in.
    ///
    /// This is the only way a sale's currency is determined.
    pub const fn currency(&self) -> Currency {
        match self {
            PaymentMethod::Revolut => Currency::Eur,
            PaymentMethod::MobileMoney | PaymentMethod::Cash => Currency::Fcfa,
        }
    }

    /// Only cash sales take a tendered amount and give change.
    pub const fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Revolut => "Revolut",
            PaymentMethod::MobileMoney => "Mobile Money",
            PaymentMethod::Cash => "Cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "revolut" => Ok(PaymentMethod::Revolut),
            "mobile_money" | "momo" => Ok(PaymentMethod::MobileMoney),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(ValidationError::InvalidFormat {
                field: "payment_method".to_string(),
                reason: format!(
                    "unknown method '{}', expected revolut, mobile_money or cash",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Box Tier
// =============================================================================

/// Pricing period tag recorded on box sales.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BoxTier {
    /// Sold during the launch.
    Launch,
    /// Sold after the launch period.
    AfterLaunch,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("revolut".parse::<PaymentMethod>().unwrap(), PaymentMethod::Revolut);
        assert_eq!("Mobile Money".parse::<PaymentMethod>().unwrap(), PaymentMethod::MobileMoney);
        assert_eq!("mobile-money".parse::<PaymentMethod>().unwrap(), PaymentMethod::MobileMoney);
        assert_eq!("CASH".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_currency_follows_payment_method() {
        assert_eq!(PaymentMethod::Revolut.currency(), Currency::Eur);
        assert_eq!(PaymentMethod::MobileMoney.currency(), Currency::Fcfa);
        assert_eq!(PaymentMethod::Cash.currency(), Currency::Fcfa);
    }

    #[test]
    fn test_only_cash_is_cash() {
        let cash: Vec<_> = PaymentMethod::ALL.iter().filter(|m| m.is_cash()).collect();
        assert_eq!(cash, vec![&PaymentMethod::Cash]);
    }

    #[test]
    fn test_payment_method_serde() {
        let json = serde_json::to_string(&PaymentMethod::MobileMoney).unwrap();
        assert_eq!(json, "\"mobile_money\"");
        assert_eq!(PaymentMethod::MobileMoney.to_string(), "Mobile Money");
    }
}
