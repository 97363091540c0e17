use crate::{
    db_types::{NewTransaction, Transaction},
    traits::OrderApiError,
};

/// The `TransactionManagement` trait defines behaviour for recording verified payments.
#[allow(async_fn_in_trait)]
pub trait TransactionManagement {
    /// Stores a verified payment. The payment reference is unique, so calling this more than once for the same
    /// payment returns the stored record and `false`.
    ///
    /// When the transaction names an order, the same atomic transaction stores the payment reference on the order and
    /// moves a `Pending` order to `Paid`.
    async fn record_transaction(&self, tx: NewTransaction) -> Result<(Transaction, bool), OrderApiError>;

    async fn fetch_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>, OrderApiError>;

    /// All transactions paid by the given customer, most recent payment first.
    async fn fetch_transactions_for_email(&self, email: &str) -> Result<Vec<Transaction>, OrderApiError>;
}
