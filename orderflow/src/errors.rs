//! Error types for orderflow.
//!
//! Two layers of errors mirror the two layers of the library:
//!
//! - [`StoreError`]: faults surfaced by store implementations (the
//!   persistence ports). Duplicate order numbers are a structured variant so
//!   that retry logic never has to inspect backend error text.
//! - [`WorkflowError`]: business-level failures returned by the catalog and
//!   order services. Every operation returns an explicit result; nothing in
//!   this library terminates the process on failure.

use crate::order::OrderStatus;
use crate::types::{
    CustomerEmailError, CustomerNameError, MoneyError, OrderId, OrderNumber, OrderNumberError,
    ProductDescriptionError, ProductId, ProductNameError, QuantityError,
};
use thiserror::Error;

/// Errors surfaced by product and order store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// An order with the given order number already exists.
    ///
    /// The workflow engine retries creation with a regenerated number when it
    /// sees this variant; every other store error is fatal to the operation.
    #[error("order number '{0}' already exists")]
    DuplicateOrderNumber(OrderNumber),

    /// The referenced product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The referenced order does not exist.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// A stock adjustment would drive the stored quantity negative.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// The product whose stock was adjusted.
        product_id: ProductId,
        /// The consumption amount that was requested.
        requested: u32,
        /// The stock that was actually available.
        available: u32,
    },

    /// The connection to the backing store failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other store-layer fault, with diagnostic detail.
    #[error("internal store error: {0}")]
    Internal(String),
}

/// Errors returned by the catalog and order workflow services.
#[derive(Debug, Clone, Error)]
pub enum WorkflowError {
    /// Malformed input, rejected before any mutation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced product does not exist; nothing was persisted.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The referenced order does not exist; nothing was persisted.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// Reservation denied because the product is inactive.
    #[error("product '{name}' ({id}) is inactive and cannot be ordered")]
    InactiveProduct {
        /// Identity of the inactive product.
        id: ProductId,
        /// Display name of the inactive product.
        name: String,
    },

    /// Reservation denied because stock cannot cover the requested quantity.
    #[error("insufficient stock for '{name}' ({id}): requested {requested}, available {available}")]
    InsufficientStock {
        /// Identity of the product.
        id: ProductId,
        /// Display name of the product.
        name: String,
        /// Quantity that was requested.
        requested: u32,
        /// Stock that was available.
        available: u32,
    },

    /// A status change violated the terminal-state or cancellation rule.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Status the order was in.
        from: OrderStatus,
        /// Status that was requested.
        to: OrderStatus,
    },

    /// Every order-number regeneration attempt collided; the creation failed.
    #[error("order number generation exhausted after {attempts} attempts")]
    OrderNumberExhausted {
        /// Number of persistence attempts that were made.
        attempts: u32,
    },

    /// A store-layer fault, propagated with its diagnostic detail.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Type alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Type alias for workflow results.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

macro_rules! validation_from {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for WorkflowError {
                fn from(err: $error) -> Self {
                    Self::Validation(err.to_string())
                }
            }
        )*
    };
}

validation_from!(
    ProductNameError,
    ProductDescriptionError,
    CustomerNameError,
    CustomerEmailError,
    OrderNumberError,
    QuantityError,
    MoneyError,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomerEmail, Quantity};

    #[test]
    fn store_error_messages_are_descriptive() {
        let number = OrderNumber::try_new("ORD-20250101120000123-ABCD1234").unwrap();
        let err = StoreError::DuplicateOrderNumber(number);
        assert_eq!(
            err.to_string(),
            "order number 'ORD-20250101120000123-ABCD1234' already exists"
        );

        let err = StoreError::InsufficientStock {
            product_id: ProductId::new(7),
            requested: 5,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for product 7: requested 5, available 2"
        );
    }

    #[test]
    fn workflow_error_messages_are_descriptive() {
        let err = WorkflowError::InvalidTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::InProgress,
        };
        assert_eq!(
            err.to_string(),
            "invalid status transition from Completed to InProgress"
        );

        let err = WorkflowError::OrderNumberExhausted { attempts: 5 };
        assert!(err.to_string().contains("after 5 attempts"));
    }

    #[test]
    fn store_errors_convert_into_workflow_errors() {
        let err: WorkflowError = StoreError::ConnectionFailed("refused".to_string()).into();
        assert!(matches!(
            err,
            WorkflowError::Store(StoreError::ConnectionFailed(_))
        ));
    }

    #[test]
    fn validation_errors_convert_into_workflow_errors() {
        let err: WorkflowError = CustomerEmail::try_new("nope").unwrap_err().into();
        assert!(matches!(err, WorkflowError::Validation(_)));

        let err: WorkflowError = Quantity::try_new(0).unwrap_err().into();
        assert!(matches!(err, WorkflowError::Validation(_)));
    }
}
