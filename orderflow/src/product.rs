//! Product entity and catalog category rules.
//!
//! Products exist in two phases: [`NewProduct`] is an unsaved record with no
//! identity, and [`Product`] is the persisted entity the store hands back
//! with an assigned [`ProductId`]. There is no way to fabricate a persisted
//! product without going through a store.
//!
//! Products are never physically deleted; "delete" deactivates the record so
//! historical orders keep a valid reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Money, ProductDescription, ProductId, ProductName, Quantity};

/// Catalog category of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    /// Brewed to order; stock is treated as unbounded.
    Coffee,
    /// Finite baked stock.
    Bagels,
    /// Finite baked stock.
    Croissants,
    /// Finite baked stock.
    Cakes,
}

impl ProductCategory {
    /// Whether availability and reservation consume stored stock.
    ///
    /// Coffee is exempt: availability checks always pass for active coffee
    /// products and ordering or cancelling coffee never touches stock.
    pub const fn is_stock_tracked(self) -> bool {
        !matches!(self, Self::Coffee)
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coffee => write!(f, "Coffee"),
            Self::Bagels => write!(f, "Bagels"),
            Self::Croissants => write!(f, "Croissants"),
            Self::Cakes => write!(f, "Cakes"),
        }
    }
}

/// A stock adjustment that would drive the stored quantity negative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("insufficient stock: requested {requested}, available {available}")]
pub struct InsufficientStock {
    /// The consumption amount that was requested.
    pub requested: u32,
    /// The stock that was actually available.
    pub available: u32,
}

/// An unsaved product record, before the store has assigned an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    name: ProductName,
    description: ProductDescription,
    price: Money,
    stock: u32,
    category: ProductCategory,
}

impl NewProduct {
    /// Creates a product record with the given initial stock.
    ///
    /// The validated argument types carry all input checks, so construction
    /// cannot fail. Products are created active.
    pub const fn new(
        name: ProductName,
        description: ProductDescription,
        price: Money,
        stock: u32,
        category: ProductCategory,
    ) -> Self {
        Self {
            name,
            description,
            price,
            stock,
            category,
        }
    }

    /// The product display name.
    pub const fn name(&self) -> &ProductName {
        &self.name
    }

    /// The initial stock quantity.
    pub const fn stock(&self) -> u32 {
        self.stock
    }

    /// The catalog category.
    pub const fn category(&self) -> ProductCategory {
        self.category
    }
}

/// A persisted product with an assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: ProductName,
    description: ProductDescription,
    price: Money,
    stock: u32,
    active: bool,
    category: ProductCategory,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Builds the persisted entity from a store-assigned identity and the
    /// unsaved record. Intended for store implementations.
    pub fn from_parts(id: ProductId, record: NewProduct) -> Self {
        Self {
            id,
            name: record.name,
            description: record.description,
            price: record.price,
            stock: record.stock,
            active: true,
            category: record.category,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// The store-assigned identity.
    pub const fn id(&self) -> ProductId {
        self.id
    }

    /// The product display name.
    pub const fn name(&self) -> &ProductName {
        &self.name
    }

    /// The product description.
    pub const fn description(&self) -> &ProductDescription {
        &self.description
    }

    /// The current unit price.
    pub const fn price(&self) -> Money {
        self.price
    }

    /// The stored stock quantity.
    ///
    /// For coffee products the stored value is informational only; the
    /// category exempts them from stock accounting.
    pub const fn stock(&self) -> u32 {
        self.stock
    }

    /// Whether the product is active in the catalog.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The catalog category.
    pub const fn category(&self) -> ProductCategory {
        self.category
    }

    /// When the product was created.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the product was last mutated, if ever.
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Whether the product can satisfy a reservation of `quantity`.
    ///
    /// True when the product is active and either the category is exempt
    /// from stock tracking or the stored stock covers the request. Inactive
    /// products can never be reserved.
    pub fn can_reserve(&self, quantity: Quantity) -> bool {
        if !self.active {
            return false;
        }
        if !self.category.is_stock_tracked() {
            return true;
        }
        self.stock >= u32::from(quantity)
    }

    /// Listing rule for "available" catalog queries: active, and either
    /// stock-exempt or with stock remaining.
    pub const fn is_available(&self) -> bool {
        self.active && (!self.category.is_stock_tracked() || self.stock > 0)
    }

    /// Applies a stock delta.
    ///
    /// A positive delta (restock) always succeeds; a negative delta
    /// (consumption) fails when the stored stock cannot cover it. Stock is
    /// capped at `u32::MAX`.
    pub fn adjust_stock(&mut self, delta: i64) -> Result<(), InsufficientStock> {
        // Stock is non-negative, so the addition can only overflow upward,
        // and an upward overflow is just a restock past the cap.
        let next = match i64::from(self.stock).checked_add(delta) {
            Some(next) if next < 0 => {
                return Err(InsufficientStock {
                    requested: delta.unsigned_abs().try_into().unwrap_or(u32::MAX),
                    available: self.stock,
                });
            }
            Some(next) => u32::try_from(next).unwrap_or(u32::MAX),
            None => u32::MAX,
        };
        self.stock = next;
        self.touch();
        Ok(())
    }

    /// Replaces name, description, price, and category.
    pub fn update_details(
        &mut self,
        name: ProductName,
        description: ProductDescription,
        price: Money,
        category: ProductCategory,
    ) {
        self.name = name;
        self.description = description;
        self.price = price;
        self.category = category;
        self.touch();
    }

    /// Overwrites the stored stock quantity.
    pub fn set_stock(&mut self, stock: u32) {
        self.stock = stock;
        self.touch();
    }

    /// Removes the product from the orderable catalog without deleting it.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.touch();
    }

    /// Returns a previously deactivated product to the catalog.
    pub fn activate(&mut self) {
        self.active = true;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(category: ProductCategory, stock: u32, active: bool) -> Product {
        let record = NewProduct::new(
            ProductName::try_new("Test product").unwrap(),
            ProductDescription::try_new("A product used in tests").unwrap(),
            Money::from_cents(450),
            stock,
            category,
        );
        let mut product = Product::from_parts(ProductId::new(1), record);
        if !active {
            product.deactivate();
        }
        product
    }

    fn qty(value: u32) -> Quantity {
        Quantity::try_new(value).unwrap()
    }

    #[test]
    fn coffee_reservation_ignores_stock() {
        let coffee = product(ProductCategory::Coffee, 0, true);
        assert!(coffee.can_reserve(qty(1)));
        assert!(coffee.can_reserve(qty(10_000)));
    }

    #[test]
    fn inactive_products_are_never_reservable() {
        let coffee = product(ProductCategory::Coffee, 100, false);
        assert!(!coffee.can_reserve(qty(1)));

        let bagels = product(ProductCategory::Bagels, 100, false);
        assert!(!bagels.can_reserve(qty(1)));
    }

    #[test]
    fn stock_tracked_reservation_requires_stock() {
        let bagels = product(ProductCategory::Bagels, 5, true);
        assert!(bagels.can_reserve(qty(5)));
        assert!(!bagels.can_reserve(qty(6)));
    }

    #[test]
    fn availability_listing_rule() {
        assert!(product(ProductCategory::Coffee, 0, true).is_available());
        assert!(!product(ProductCategory::Cakes, 0, true).is_available());
        assert!(product(ProductCategory::Cakes, 1, true).is_available());
        assert!(!product(ProductCategory::Cakes, 1, false).is_available());
    }

    #[test]
    fn adjust_stock_rejects_overdraw() {
        let mut bagels = product(ProductCategory::Bagels, 3, true);
        let err = bagels.adjust_stock(-4).unwrap_err();
        assert_eq!(err.requested, 4);
        assert_eq!(err.available, 3);
        assert_eq!(bagels.stock(), 3);

        bagels.adjust_stock(-3).unwrap();
        assert_eq!(bagels.stock(), 0);

        bagels.adjust_stock(10).unwrap();
        assert_eq!(bagels.stock(), 10);
    }

    #[test]
    fn adjust_stock_saturates_at_the_extremes() {
        let mut bagels = product(ProductCategory::Bagels, 3, true);

        bagels.adjust_stock(i64::MAX).unwrap();
        assert_eq!(bagels.stock(), u32::MAX);

        let err = bagels.adjust_stock(i64::MIN).unwrap_err();
        assert_eq!(err.requested, u32::MAX);
        assert_eq!(err.available, u32::MAX);
        assert_eq!(bagels.stock(), u32::MAX);
    }

    #[test]
    fn delete_is_deactivation() {
        let mut cakes = product(ProductCategory::Cakes, 2, true);
        cakes.deactivate();
        assert!(!cakes.is_active());
        assert!(cakes.updated_at().is_some());
        cakes.activate();
        assert!(cakes.is_active());
    }

    proptest! {
        #[test]
        fn stock_tracked_can_reserve_iff_active_and_covered(
            stock in 0u32..1000,
            requested in 1u32..1000,
            active: bool,
        ) {
            let p = product(ProductCategory::Croissants, stock, active);
            let expected = active && stock >= requested;
            prop_assert_eq!(p.can_reserve(qty(requested)), expected);
        }

        #[test]
        fn coffee_can_reserve_iff_active(
            stock in 0u32..1000,
            requested in 1u32..1000,
            active: bool,
        ) {
            let p = product(ProductCategory::Coffee, stock, active);
            prop_assert_eq!(p.can_reserve(qty(requested)), active);
        }
    }
}
