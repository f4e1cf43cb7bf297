//! Order workflow engine.
//!
//! [`OrderWorkflow`] orchestrates order creation (validate lines → reserve
//! stock → persist with collision retry), status transitions, and
//! cancellation with restock. It talks to the catalog and order stores only
//! through their port traits.
//!
//! # Partial-failure model
//!
//! Stock decrements are issued per line as independent writes and are NOT
//! wrapped in one transaction with the final order insert. When a later line
//! fails validation, decrements already applied for earlier lines in the
//! same call are left in place. The same holds for a crash between a
//! decrement and the order insert. This matches the store-per-call
//! consistency model of the original design and is intentional; callers that
//! need stronger guarantees must layer them on top.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::errors::{StoreError, WorkflowError, WorkflowResult};
use crate::order::{NewOrder, Order, OrderStatus};
use crate::store::{OrderStore, ProductStore};
use crate::types::{CustomerEmail, CustomerName, OrderId, OrderNumber, ProductId, Quantity};

/// Retry configuration for order-number collisions on insert.
///
/// The retry loop is local and synchronous: it re-attempts the insert with a
/// regenerated number up to `max_attempts` times total, with no backoff
/// delay. It covers only the duplicate-number case; every other store error
/// aborts immediately.
#[derive(Debug, Clone)]
pub struct OrderNumberRetry {
    /// Maximum number of insert attempts, including the first.
    pub max_attempts: u32,
}

impl Default for OrderNumberRetry {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

/// One requested order line: a product and a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    /// The product to order.
    pub product_id: ProductId,
    /// How many units to order. Always greater than zero by construction.
    pub quantity: Quantity,
}

impl OrderLine {
    /// Creates an order line.
    pub const fn new(product_id: ProductId, quantity: Quantity) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Input to [`OrderWorkflow::create_order`].
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    /// Optional customer name.
    pub customer_name: Option<CustomerName>,
    /// Optional customer email.
    pub customer_email: Option<CustomerEmail>,
    /// The requested lines, processed in input order. Must be non-empty.
    pub lines: Vec<OrderLine>,
}

impl CreateOrderRequest {
    /// Creates a request with no customer information.
    pub const fn new(lines: Vec<OrderLine>) -> Self {
        Self {
            customer_name: None,
            customer_email: None,
            lines,
        }
    }

    /// Attaches a customer name.
    #[must_use]
    pub fn with_customer_name(mut self, name: CustomerName) -> Self {
        self.customer_name = Some(name);
        self
    }

    /// Attaches a customer email.
    #[must_use]
    pub fn with_customer_email(mut self, email: CustomerEmail) -> Self {
        self.customer_email = Some(email);
        self
    }
}

/// Orchestrates the order lifecycle against a product store and an order
/// store.
#[derive(Debug)]
pub struct OrderWorkflow<P, O> {
    products: P,
    orders: O,
    retry: OrderNumberRetry,
}

impl<P, O> OrderWorkflow<P, O>
where
    P: ProductStore,
    O: OrderStore,
{
    /// Creates a workflow engine with the default retry configuration.
    pub fn new(products: P, orders: O) -> Self {
        Self {
            products,
            orders,
            retry: OrderNumberRetry::default(),
        }
    }

    /// Overrides the order-number retry configuration.
    #[must_use]
    pub fn with_retry(mut self, retry: OrderNumberRetry) -> Self {
        self.retry = retry;
        self
    }

    /// Creates an order from the requested lines.
    ///
    /// Each line is validated against the catalog in input order: a missing
    /// product or a denied reservation aborts the whole call. Reserved stock
    /// for stock-tracked categories is decremented immediately per line;
    /// coffee lines never touch stock. The assembled order is then persisted,
    /// retrying with a regenerated order number on collision.
    #[instrument(skip_all, fields(lines = request.lines.len()))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> WorkflowResult<Order> {
        if request.lines.is_empty() {
            return Err(WorkflowError::Validation(
                "an order must contain at least one item".to_string(),
            ));
        }

        let mut draft = NewOrder::new(request.customer_name, request.customer_email);

        for line in &request.lines {
            let product = self
                .products
                .get(line.product_id)
                .await?
                .ok_or(WorkflowError::ProductNotFound(line.product_id))?;

            // add_item re-checks reservability and merges repeated products.
            draft.add_item(&product, line.quantity)?;

            if product.category().is_stock_tracked() {
                self.products
                    .adjust_stock(line.product_id, -i64::from(u32::from(line.quantity)))
                    .await?;
            }
        }

        self.persist_with_retry(draft).await
    }

    async fn persist_with_retry(&self, mut draft: NewOrder) -> WorkflowResult<Order> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.orders.create(draft.clone()).await {
                Ok(order) => {
                    info!(
                        order_number = %order.order_number(),
                        total = %order.total_amount(),
                        "order created"
                    );
                    return Ok(order);
                }
                Err(StoreError::DuplicateOrderNumber(number)) => {
                    if attempt >= self.retry.max_attempts {
                        warn!(attempts = attempt, "order number retries exhausted");
                        return Err(WorkflowError::OrderNumberExhausted { attempts: attempt });
                    }
                    warn!(
                        order_number = %number,
                        attempt,
                        "order number collision, regenerating"
                    );
                    draft.regenerate_order_number();
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    /// Cancels an order, returning reserved stock to the catalog.
    ///
    /// Only `Pending` and `InProgress` orders are eligible. Every
    /// stock-tracked line is restocked by its quantity before the status
    /// flips to `Cancelled`; a store failure on the final update fails the
    /// whole operation.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> WorkflowResult<Order> {
        let mut order = self
            .orders
            .get(id)
            .await?
            .ok_or(WorkflowError::OrderNotFound(id))?;

        if !order.can_be_cancelled() {
            return Err(WorkflowError::InvalidTransition {
                from: order.status(),
                to: OrderStatus::Cancelled,
            });
        }

        for item in order.items() {
            if item.category().is_stock_tracked() {
                self.products
                    .adjust_stock(item.product_id(), i64::from(u32::from(item.quantity())))
                    .await?;
            }
        }

        order.update_status(OrderStatus::Cancelled)?;
        self.orders.update(&order).await?;
        info!(order_number = %order.order_number(), "order cancelled");
        Ok(order)
    }

    /// Moves an order to `status`, enforcing only the terminal-state lock.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> WorkflowResult<Order> {
        let mut order = self
            .orders
            .get(id)
            .await?
            .ok_or(WorkflowError::OrderNotFound(id))?;

        order.update_status(status)?;
        self.orders.update(&order).await?;
        Ok(order)
    }

    /// Fetches an order by identity.
    pub async fn order(&self, id: OrderId) -> WorkflowResult<Option<Order>> {
        Ok(self.orders.get(id).await?)
    }

    /// Fetches an order by its unique order number.
    pub async fn order_by_number(&self, number: &OrderNumber) -> WorkflowResult<Option<Order>> {
        Ok(self.orders.get_by_order_number(number).await?)
    }

    /// Lists all orders, newest first.
    pub async fn orders(&self) -> WorkflowResult<Vec<Order>> {
        Ok(self.orders.all().await?)
    }

    /// Lists orders in a given status, newest first.
    pub async fn orders_by_status(&self, status: OrderStatus) -> WorkflowResult<Vec<Order>> {
        Ok(self.orders.by_status(status).await?)
    }

    /// Lists orders created in the inclusive range `[start, end]`.
    pub async fn orders_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> WorkflowResult<Vec<Order>> {
        Ok(self.orders.by_date_range(start, end).await?)
    }
}
