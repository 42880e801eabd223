//! # Catalog
//!
//! The closed product catalog and the bundle-composition table.
//!
//! ## Catalog Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Datché Catalog                                 │
//! │                                                                         │
//! │  Standalone products        Box components        Stocked separately    │
//! │  ───────────────────        ──────────────        ──────────────────    │
//! │  Shampoo  Mask  Cream  Oil  ◄── also in box                             │
//! │  Towel  Sprayer  Massager   ◄── in box, priced only if sold alone       │
//! │  Mirror                                            ✓                    │
//! │                                                                         │
//! │  Box ──► { Shampoo, Mask, Cream, Oil, Towel, Sprayer, Massager }       │
//! │          (no stock of its own: selling a box moves seven stock rows)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// A catalog item. Identity is immutable and used as a key everywhere.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    Shampoo,
    Mask,
    /// Leave-in cream, 300 ml.
    Cream,
    Oil,
    Towel,
    Sprayer,
    Massager,
    Mirror,
    /// The composite box ("range").
    Box,
}

/// Products that ship free inside the box and need an explicit price
/// before they can be sold on their own.
pub const PRODUCTS_REQUIRING_PRICE: [Product; 3] =
    [Product::Towel, Product::Sprayer, Product::Massager];

/// Bundle composition: composite product → constituents.
///
/// Each unit of a composite sold moves one unit of every constituent.
/// Adding or removing a bundle member is a change to this table only.
pub const BUNDLES: &[(Product, &[Product])] = &[(
    Product::Box,
    &[
        Product::Shampoo,
        Product::Mask,
        Product::Cream,
        Product::Oil,
        Product::Towel,
        Product::Sprayer,
        Product::Massager,
    ],
)];

impl Product {
    /// Every catalog item, in catalog order.
    pub const ALL: [Product; 9] = [
        Product::Shampoo,
        Product::Mask,
        Product::Cream,
        Product::Oil,
        Product::Towel,
        Product::Sprayer,
        Product::Massager,
        Product::Mirror,
        Product::Box,
    ];

    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Product::Shampoo => "Shampoo",
            Product::Mask => "Mask",
            Product::Cream => "Cream",
            Product::Oil => "Oil",
            Product::Towel => "Towel",
            Product::Sprayer => "Sprayer",
            Product::Massager => "Massager",
            Product::Mirror => "Mirror",
            Product::Box => "Box",
        }
    }

    /// True for Towel, Sprayer and Massager.
    pub fn requires_explicit_price(&self) -> bool {
        PRODUCTS_REQUIRING_PRICE.contains(self)
    }

    /// True when the product is a composite listed in [`BUNDLES`].
    pub fn is_bundle(&self) -> bool {
        bundle_components(*self).is_some()
    }

    /// Composites have no stock row of their own.
    pub fn has_stock(&self) -> bool {
        !self.is_bundle()
    }

    /// Products that carry a stock entry, in catalog order.
    pub fn stocked() -> impl Iterator<Item = Product> {
        Product::ALL.into_iter().filter(Product::has_stock)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the constituents of a composite product, or `None` for a plain one.
///
/// ## Example
/// ```rust
/// use datche_core::catalog::{bundle_components, Product};
///
/// assert_eq!(bundle_components(Product::Box).map(|c| c.len()), Some(7));
/// assert!(bundle_components(Product::Mirror).is_none());
/// ```
pub fn bundle_components(product: Product) -> Option<&'static [Product]> {
    BUNDLES
        .iter()
        .find(|(composite, _)| *composite == product)
        .map(|(_, components)| *components)
}
