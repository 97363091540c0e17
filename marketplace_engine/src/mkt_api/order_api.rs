use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderDetails, Transaction},
    mkt_api::order_objects::NewOrderRequest,
    traits::{OrderApiError, OrderManagement, ProductManagement, TransactionManagement},
};

/// The most units of a product a single order may ask for.
pub const MAX_ORDER_QUANTITY: i64 = 1_000;

/// `OrderApi` places orders for approved products and lists a buyer's orders.
pub struct OrderApi<B> {
    db: B,
}

impl<B: Debug> Debug for OrderApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderApi ({:?})", self.db)
    }
}

impl<B> OrderApi<B>
where B: OrderManagement + ProductManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates a `Pending` order for the given product. The amount is the product price times the quantity.
    pub async fn create(&self, user_id: i64, req: NewOrderRequest) -> Result<Order, OrderApiError> {
        let product_id = req.product_id.ok_or_else(|| OrderApiError::Validation("'productId' is required".into()))?;
        let quantity = req.quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(OrderApiError::Validation("'quantity' must be at least 1".into()));
        }
        if quantity > MAX_ORDER_QUANTITY {
            return Err(OrderApiError::Validation(format!("'quantity' cannot be more than {MAX_ORDER_QUANTITY}")));
        }
        let product = self.db.fetch_product(product_id).await?.ok_or(OrderApiError::ProductNotFound(product_id))?;
        let price = match product.price {
            Some(price) if product.is_purchasable() => price,
            _ => return Err(OrderApiError::ProductUnavailable(product_id)),
        };
        let amount = price
            .checked_mul(quantity)
            .ok_or_else(|| OrderApiError::Validation("The order amount is too large".into()))?;
        let order = NewOrder { user_id, product_id, quantity, amount };
        let order = self.db.insert_order(order).await?;
        info!("🧾️ Order #{} for {} placed by user #{user_id}", order.id, order.amount);
        Ok(order)
    }

    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderApiError> {
        self.db.fetch_orders_for_user(user_id).await
    }
}

/// `TransactionApi` reads back payments that have been recorded by the checkout flow.
pub struct TransactionApi<B> {
    db: B,
}

impl<B: Debug> Debug for TransactionApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransactionApi ({:?})", self.db)
    }
}

impl<B> TransactionApi<B>
where B: TransactionManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn by_reference(&self, reference: &str) -> Result<Transaction, OrderApiError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(OrderApiError::Validation("Reference is required".into()));
        }
        self.db.fetch_transaction_by_reference(reference).await?.ok_or(OrderApiError::TransactionNotFound)
    }

    /// Every transaction paid from the given email address, most recent first. An empty history is reported as an
    /// error so that clients can show a "no transactions" state.
    pub async fn for_customer(&self, email: &str) -> Result<Vec<Transaction>, OrderApiError> {
        let transactions = self.db.fetch_transactions_for_email(email).await?;
        if transactions.is_empty() {
            return Err(OrderApiError::NoTransactions);
        }
        Ok(transactions)
    }
}
