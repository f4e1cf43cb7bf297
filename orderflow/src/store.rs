//! Store abstractions for products and orders.
//!
//! These traits are the port interfaces the services depend on. They are
//! backend-independent: implementations decide the persistence format and
//! transaction isolation. The library ships an in-memory adapter in the
//! `orderflow-memory` crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::StoreResult;
use crate::order::{NewOrder, Order, OrderStatus};
use crate::product::{NewProduct, Product, ProductCategory};
use crate::types::{OrderId, OrderNumber, ProductId};

/// Persistence port for the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetches a product by identity. Missing products are `None`, not an
    /// error.
    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Lists every active product, including ones with no stock left.
    async fn all(&self) -> StoreResult<Vec<Product>>;

    /// Lists available products: active, and with stock remaining unless the
    /// category is exempt from stock tracking.
    async fn available(&self) -> StoreResult<Vec<Product>>;

    /// Lists available products within one category, under the same rule as
    /// [`available`](Self::available).
    async fn available_by_category(
        &self,
        category: ProductCategory,
    ) -> StoreResult<Vec<Product>>;

    /// Persists a new product and returns it with its assigned identity.
    async fn create(&self, record: NewProduct) -> StoreResult<Product>;

    /// Persists the current state of an existing product.
    ///
    /// Fails with [`StoreError::ProductNotFound`](crate::StoreError) when the
    /// identity is unknown.
    async fn update(&self, product: &Product) -> StoreResult<()>;

    /// Applies a stock delta to a product.
    ///
    /// Negative deltas fail with
    /// [`StoreError::InsufficientStock`](crate::StoreError) when the stored
    /// stock cannot cover them; positive deltas always succeed for an
    /// existing product. The store applies whatever delta it is given; the
    /// coffee exemption is the caller's rule, not the store's.
    async fn adjust_stock(&self, id: ProductId, delta: i64) -> StoreResult<()>;
}

/// Persistence port for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Fetches an order by identity.
    async fn get(&self, id: OrderId) -> StoreResult<Option<Order>>;

    /// Fetches an order by its unique order number.
    async fn get_by_order_number(&self, number: &OrderNumber) -> StoreResult<Option<Order>>;

    /// Lists all orders, newest first.
    async fn all(&self) -> StoreResult<Vec<Order>>;

    /// Lists orders in a given status, newest first.
    async fn by_status(&self, status: OrderStatus) -> StoreResult<Vec<Order>>;

    /// Lists orders created in the inclusive range `[start, end]`, newest
    /// first.
    async fn by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Order>>;

    /// Persists a new order and returns it with its assigned identity.
    ///
    /// Implementations MUST surface an order-number uniqueness violation as
    /// [`StoreError::DuplicateOrderNumber`](crate::StoreError), distinct from
    /// every other failure, so the workflow engine can retry with a
    /// regenerated number.
    async fn create(&self, draft: NewOrder) -> StoreResult<Order>;

    /// Persists status and customer-info changes to an existing order.
    async fn update(&self, order: &Order) -> StoreResult<()>;
}
