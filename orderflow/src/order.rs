//! Order aggregate, line items, and the status machine.
//!
//! Orders exist in two phases, like products: [`NewOrder`] is the unsaved
//! aggregate the workflow engine assembles (it carries an order number but no
//! identity), and [`Order`] is the persisted aggregate a store hands back.
//!
//! The status machine is deliberately permissive: any transition is allowed
//! except moving away from a terminal status (`Completed` or `Cancelled`).
//! `Pending` straight to `Completed` is legal. Do not tighten this.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{WorkflowError, WorkflowResult};
use crate::product::{Product, ProductCategory};
use crate::types::{
    CustomerEmail, CustomerName, Money, OrderId, OrderNumber, ProductDescription, ProductId,
    ProductName, Quantity,
};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Created, not yet picked up for fulfilment.
    Pending,
    /// Being prepared.
    InProgress,
    /// Fulfilled. Terminal.
    Completed,
    /// Abandoned; reserved stock has been returned. Terminal.
    Cancelled,
    /// Handed to delivery.
    Shipped,
}

impl OrderStatus {
    /// Whether this status permits no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether an order in this status may move to `next`.
    ///
    /// Terminal statuses only admit themselves (a no-op); every other move
    /// is permitted, with no linear ordering enforced.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return next == self;
        }
        true
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Shipped => write!(f, "Shipped"),
        }
    }
}

/// A single line of an order.
///
/// The unit price is captured at order time and never re-read from the live
/// product, fixing the historical price. Name, description, and category are
/// materialized alongside it: the first two for display, the category so the
/// cancellation restock path does not depend on a live product read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ProductId,
    product_name: ProductName,
    product_description: ProductDescription,
    category: ProductCategory,
    quantity: Quantity,
    unit_price: Money,
}

impl OrderItem {
    /// Snapshots a product into an order line.
    pub fn from_product(product: &Product, quantity: Quantity) -> Self {
        Self {
            product_id: product.id(),
            product_name: product.name().clone(),
            product_description: product.description().clone(),
            category: product.category(),
            quantity,
            unit_price: product.price(),
        }
    }

    /// Identity of the ordered product.
    pub const fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Product name as it read at order time.
    pub const fn product_name(&self) -> &ProductName {
        &self.product_name
    }

    /// Product description as it read at order time.
    pub const fn product_description(&self) -> &ProductDescription {
        &self.product_description
    }

    /// Product category at order time.
    pub const fn category(&self) -> ProductCategory {
        self.category
    }

    /// Ordered quantity.
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Unit price captured at order time.
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Line total: unit price times quantity.
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// An unsaved order aggregate assembled by the workflow engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    order_number: OrderNumber,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    customer_name: Option<CustomerName>,
    customer_email: Option<CustomerEmail>,
    items: Vec<OrderItem>,
}

impl NewOrder {
    /// Starts an empty pending order with a freshly generated order number.
    pub fn new(customer_name: Option<CustomerName>, customer_email: Option<CustomerEmail>) -> Self {
        Self {
            order_number: OrderNumber::generate(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
            customer_name,
            customer_email,
            items: Vec::new(),
        }
    }

    /// The generated order number.
    pub const fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// The line items, in the order they were added.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Adds `quantity` of `product` to the order.
    ///
    /// A product already present in the order has its existing line's
    /// quantity increased instead of gaining a duplicate line. The product
    /// must be reservable for the requested quantity.
    pub fn add_item(&mut self, product: &Product, quantity: Quantity) -> WorkflowResult<()> {
        if !product.can_reserve(quantity) {
            return Err(reservation_denied(product, quantity));
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id())
        {
            existing.quantity = existing.quantity.checked_add(quantity).ok_or_else(|| {
                WorkflowError::Validation(format!(
                    "quantity overflow for product {}",
                    product.id()
                ))
            })?;
        } else {
            self.items.push(OrderItem::from_product(product, quantity));
        }
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Removes the line for `product_id`, if present.
    pub fn remove_item(&mut self, product_id: ProductId) {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        if self.items.len() != before {
            self.updated_at = Some(Utc::now());
        }
    }

    /// Replaces the order number with a freshly generated one.
    ///
    /// Used by the workflow engine when the store reports an order-number
    /// collision on insert.
    pub fn regenerate_order_number(&mut self) {
        self.order_number = OrderNumber::generate();
        self.updated_at = Some(Utc::now());
    }

    /// Sum of all line totals. Always recomputed, never stored.
    pub fn total_amount(&self) -> Money {
        self.items.iter().map(OrderItem::total_price).sum()
    }
}

/// A persisted order with an assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_number: OrderNumber,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    customer_name: Option<CustomerName>,
    customer_email: Option<CustomerEmail>,
    items: Vec<OrderItem>,
}

impl Order {
    /// Builds the persisted aggregate from a store-assigned identity and the
    /// unsaved aggregate. Intended for store implementations.
    pub fn from_parts(id: OrderId, draft: NewOrder) -> Self {
        Self {
            id,
            order_number: draft.order_number,
            status: draft.status,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            items: draft.items,
        }
    }

    /// The store-assigned identity.
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// The unique order number.
    pub const fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// The current status.
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// When the order was created.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the order was last mutated, if ever.
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Customer name, when one was supplied.
    pub const fn customer_name(&self) -> Option<&CustomerName> {
        self.customer_name.as_ref()
    }

    /// Customer email, when one was supplied.
    pub const fn customer_email(&self) -> Option<&CustomerEmail> {
        self.customer_email.as_ref()
    }

    /// The line items, in insertion order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Looks up the line for a given product.
    pub fn item(&self, product_id: ProductId) -> Option<&OrderItem> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
    }

    /// Sum of all line totals. Always recomputed, never stored.
    pub fn total_amount(&self) -> Money {
        self.items.iter().map(OrderItem::total_price).sum()
    }

    /// Whether the cancellation path may run: only `Pending` and
    /// `InProgress` orders can be cancelled.
    pub const fn can_be_cancelled(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::InProgress)
    }

    /// Whether the order is in a state fulfilment normally completes from.
    ///
    /// This is a query only; the status machine itself stays permissive.
    pub const fn can_be_completed(&self) -> bool {
        matches!(self.status, OrderStatus::InProgress | OrderStatus::Shipped)
    }

    /// Moves the order to `next`, enforcing the terminal-state lock.
    pub fn update_status(&mut self, next: OrderStatus) -> WorkflowResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(WorkflowError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Replaces the customer contact details.
    pub fn update_customer_info(
        &mut self,
        customer_name: Option<CustomerName>,
        customer_email: Option<CustomerEmail>,
    ) {
        self.customer_name = customer_name;
        self.customer_email = customer_email;
        self.updated_at = Some(Utc::now());
    }
}

fn reservation_denied(product: &Product, quantity: Quantity) -> WorkflowError {
    if product.is_active() {
        WorkflowError::InsufficientStock {
            id: product.id(),
            name: product.name().to_string(),
            requested: u32::from(quantity),
            available: product.stock(),
        }
    } else {
        WorkflowError::InactiveProduct {
            id: product.id(),
            name: product.name().to_string(),
        }
    }
}
