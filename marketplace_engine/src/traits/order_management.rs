use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderDetails},
    helpers::FieldError,
    traits::ProductApiError,
};

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    Validation(String),
    #[error("Order {0} not found")]
    OrderNotFound(i64),
    #[error("Product not found")]
    ProductNotFound(i64),
    #[error("Product {0} is not available for purchase")]
    ProductUnavailable(i64),
    #[error("Transaction not found")]
    TransactionNotFound,
    #[error("No transactions found for this user")]
    NoTransactions,
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        OrderApiError::DatabaseError(e.to_string())
    }
}

impl From<FieldError> for OrderApiError {
    fn from(e: FieldError) -> Self {
        OrderApiError::Validation(e.0)
    }
}

impl From<ProductApiError> for OrderApiError {
    fn from(e: ProductApiError) -> Self {
        match e {
            ProductApiError::ProductNotFound(id) => OrderApiError::ProductNotFound(id),
            e => OrderApiError::DatabaseError(e.to_string()),
        }
    }
}

/// The `OrderManagement` trait defines behaviour for storing buyer orders.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderApiError>;

    /// All orders placed by the user, newest first, with the buyer summary and product attached.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderApiError>;

    /// Stores the logistics reference for the order and marks it as shipped. Returns `None` if the order does not
    /// exist.
    async fn set_shipment_reference(&self, order_id: i64, reference: &str) -> Result<Option<Order>, OrderApiError>;

    /// Atomically claims the order for shipment booking. Returns `false` if the order has a shipment reference
    /// already, or if another checkout holds the claim. Exactly one caller wins for any given order.
    async fn claim_for_booking(&self, order_id: i64) -> Result<bool, OrderApiError>;

    /// Gives the claim back after a booking that did not go through, so that the checkout can be retried.
    async fn release_booking_claim(&self, order_id: i64) -> Result<(), OrderApiError>;
}
