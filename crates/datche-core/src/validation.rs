//! # Validation Module
//!
//! Input checks for the manual edit surfaces (stock page, pricing page,
//! sale deletion). Sale creation has its own ordered checks in
//! [`crate::sale::create_sale`].
//!
//! ## Usage
//! ```rust
//! use datche_core::validation::{validate_stock_quantity, validate_sale_id};
//! use datche_core::Product;
//!
//! assert!(validate_stock_quantity(Product::Mirror, 12).is_ok());
//! assert!(validate_stock_quantity(Product::Mirror, -1).is_err());
//! assert!(validate_sale_id("not-a-uuid").is_err());
//! ```

use crate::catalog::Product;
use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a stock count typed on the stock page.
///
/// ## Rules
/// - The product must carry stock (the box does not)
/// - The count must not be negative
pub fn validate_stock_quantity(product: Product, quantity: i64) -> ValidationResult<()> {
    if !product.has_stock() {
        return Err(ValidationError::NotStocked { product });
    }

    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price typed on the pricing page.
///
/// Zero is allowed here; whether zero means "unset" is decided by
/// [`crate::pricing::PriceEntry`].
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a sale id before a lookup or deletion.
pub fn validate_sale_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(Product::Shampoo, 0).is_ok());
        assert!(validate_stock_quantity(Product::Mirror, 40).is_ok());

        assert_eq!(
            validate_stock_quantity(Product::Oil, -3),
            Err(ValidationError::Negative {
                field: "quantity".to_string()
            })
        );
        assert_eq!(
            validate_stock_quantity(Product::Box, 5),
            Err(ValidationError::NotStocked {
                product: Product::Box
            })
        );
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_minor(2150)).is_ok());
        assert!(validate_price(Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_validate_sale_id() {
        assert!(validate_sale_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_sale_id("").is_err());
        assert!(validate_sale_id("   ").is_err());
        assert!(validate_sale_id("123").is_err());
    }
}
