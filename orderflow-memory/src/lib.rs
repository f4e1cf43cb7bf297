//! In-memory store adapters for the orderflow library.
//!
//! This crate implements the `ProductStore` and `OrderStore` ports over
//! process-local hash maps, useful for testing and development scenarios
//! where persistence is not required. Each write takes a whole-table lock,
//! which stands in for the row-level isolation a database backend provides:
//! stock adjustments and order-number uniqueness checks are atomic.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orderflow::errors::{StoreError, StoreResult};
use orderflow::order::{NewOrder, Order, OrderStatus};
use orderflow::product::{NewProduct, Product, ProductCategory};
use orderflow::store::{OrderStore, ProductStore};
use orderflow::types::{OrderId, OrderNumber, ProductId};

/// Thread-safe in-memory product store.
///
/// Cloning is cheap and clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    rows: Arc<RwLock<HashMap<ProductId, Product>>>,
    next_id: Arc<RwLock<u32>>,
}

impl InMemoryProductStore {
    /// Creates an empty product store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let rows = self.rows.read().expect("RwLock poisoned");
        Ok(rows.get(&id).cloned())
    }

    async fn all(&self) -> StoreResult<Vec<Product>> {
        let rows = self.rows.read().expect("RwLock poisoned");
        let mut products: Vec<Product> = rows.values().filter(|p| p.is_active()).cloned().collect();
        products.sort_by_key(Product::id);
        Ok(products)
    }

    async fn available(&self) -> StoreResult<Vec<Product>> {
        let rows = self.rows.read().expect("RwLock poisoned");
        let mut products: Vec<Product> =
            rows.values().filter(|p| p.is_available()).cloned().collect();
        products.sort_by_key(Product::id);
        Ok(products)
    }

    async fn available_by_category(&self, category: ProductCategory) -> StoreResult<Vec<Product>> {
        let rows = self.rows.read().expect("RwLock poisoned");
        let mut products: Vec<Product> = rows
            .values()
            .filter(|p| p.category() == category && p.is_available())
            .cloned()
            .collect();
        products.sort_by_key(Product::id);
        Ok(products)
    }

    async fn create(&self, record: NewProduct) -> StoreResult<Product> {
        let mut next_id = self.next_id.write().expect("RwLock poisoned");
        let mut rows = self.rows.write().expect("RwLock poisoned");
        *next_id += 1;
        let product = Product::from_parts(ProductId::new(*next_id), record);
        rows.insert(product.id(), product.clone());
        Ok(product)
    }

    async fn update(&self, product: &Product) -> StoreResult<()> {
        let mut rows = self.rows.write().expect("RwLock poisoned");
        if !rows.contains_key(&product.id()) {
            return Err(StoreError::ProductNotFound(product.id()));
        }
        rows.insert(product.id(), product.clone());
        Ok(())
    }

    async fn adjust_stock(&self, id: ProductId, delta: i64) -> StoreResult<()> {
        let mut rows = self.rows.write().expect("RwLock poisoned");
        let product = rows.get_mut(&id).ok_or(StoreError::ProductNotFound(id))?;
        product
            .adjust_stock(delta)
            .map_err(|err| StoreError::InsufficientStock {
                product_id: id,
                requested: err.requested,
                available: err.available,
            })
    }
}

/// Shared mutable state of the order store, behind one lock so that
/// identity assignment and the order-number uniqueness check are atomic.
#[derive(Default)]
struct OrderTable {
    rows: HashMap<OrderId, Order>,
    numbers: HashMap<OrderNumber, OrderId>,
    next_id: u32,
}

/// Thread-safe in-memory order store.
///
/// Order numbers are kept in a unique index; inserting a duplicate fails
/// with [`StoreError::DuplicateOrderNumber`] without assigning an identity.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    table: Arc<RwLock<OrderTable>>,
}

impl InMemoryOrderStore {
    /// Creates an empty order store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(&a.id()))
    });
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let table = self.table.read().expect("RwLock poisoned");
        Ok(table.rows.get(&id).cloned())
    }

    async fn get_by_order_number(&self, number: &OrderNumber) -> StoreResult<Option<Order>> {
        let table = self.table.read().expect("RwLock poisoned");
        Ok(table
            .numbers
            .get(number)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn all(&self) -> StoreResult<Vec<Order>> {
        let table = self.table.read().expect("RwLock poisoned");
        let mut orders: Vec<Order> = table.rows.values().cloned().collect();
        newest_first(&mut orders);
        Ok(orders)
    }

    async fn by_status(&self, status: OrderStatus) -> StoreResult<Vec<Order>> {
        let table = self.table.read().expect("RwLock poisoned");
        let mut orders: Vec<Order> = table
            .rows
            .values()
            .filter(|o| o.status() == status)
            .cloned()
            .collect();
        newest_first(&mut orders);
        Ok(orders)
    }

    async fn by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Order>> {
        let table = self.table.read().expect("RwLock poisoned");
        let mut orders: Vec<Order> = table
            .rows
            .values()
            .filter(|o| o.created_at() >= start && o.created_at() <= end)
            .cloned()
            .collect();
        newest_first(&mut orders);
        Ok(orders)
    }

    async fn create(&self, draft: NewOrder) -> StoreResult<Order> {
        let mut table = self.table.write().expect("RwLock poisoned");
        if table.numbers.contains_key(draft.order_number()) {
            return Err(StoreError::DuplicateOrderNumber(draft.order_number().clone()));
        }
        table.next_id += 1;
        let order = Order::from_parts(OrderId::new(table.next_id), draft);
        table.numbers.insert(order.order_number().clone(), order.id());
        table.rows.insert(order.id(), order.clone());
        Ok(order)
    }

    async fn update(&self, order: &Order) -> StoreResult<()> {
        let mut table = self.table.write().expect("RwLock poisoned");
        if !table.rows.contains_key(&order.id()) {
            return Err(StoreError::OrderNotFound(order.id()));
        }
        table.rows.insert(order.id(), order.clone());
        Ok(())
    }
}
