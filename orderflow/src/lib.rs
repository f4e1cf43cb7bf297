//! Orderflow: a retail catalog and order workflow library.
//!
//! The library models a small retail operation: a product catalog with
//! per-category stock rules, and an order lifecycle from creation through
//! cancellation or completion. It is storage-agnostic; persistence happens
//! behind the [`ProductStore`] and [`OrderStore`] ports, with an in-memory
//! adapter shipped separately in the `orderflow-memory` crate.
//!
//! # Design
//!
//! - **Parse, don't validate.** Raw input crosses into the domain exactly
//!   once, through validated newtypes such as [`ProductName`] and
//!   [`CustomerEmail`]. Past that boundary, invalid states are
//!   unrepresentable.
//! - **Two-phase entities.** [`NewProduct`] and [`NewOrder`] carry no
//!   identity; only a store can mint the persisted [`Product`] and [`Order`]
//!   forms. Identity assignment is explicit, never injected.
//! - **Structured failure.** Order-number collisions surface as
//!   [`StoreError::DuplicateOrderNumber`], and the workflow engine retries a
//!   bounded number of times with a regenerated number.
//!
//! # Example
//!
//! ```rust
//! use orderflow::{Money, NewProduct, ProductCategory, ProductDescription, ProductName};
//!
//! let record = NewProduct::new(
//!     ProductName::try_new("Espresso")?,
//!     ProductDescription::try_new("Double shot, brewed to order")?,
//!     Money::from_cents(350),
//!     0,
//!     ProductCategory::Coffee,
//! );
//! assert!(!record.category().is_stock_tracked());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod errors;
pub mod order;
pub mod product;
pub mod store;
pub mod types;
pub mod workflow;

pub use catalog::{CatalogService, ProductUpdate};
pub use errors::{StoreError, StoreResult, WorkflowError, WorkflowResult};
pub use order::{NewOrder, Order, OrderItem, OrderStatus};
pub use product::{NewProduct, Product, ProductCategory};
pub use store::{OrderStore, ProductStore};
pub use types::{
    CustomerEmail, CustomerName, Money, MoneyError, OrderId, OrderNumber, ProductDescription,
    ProductId, ProductName, Quantity,
};
pub use workflow::{CreateOrderRequest, OrderLine, OrderNumberRetry, OrderWorkflow};
