use sqlx::SqliteConnection;

use crate::db_types::{NewTransaction, Transaction};

/// Inserts the transaction, returning `false` in the second parameter if a transaction with the same reference has
/// already been stored.
///
/// The insert is attempted first, so that inside a transaction the write lock is taken before anything is read.
pub async fn idempotent_insert(
    tx: NewTransaction,
    conn: &mut SqliteConnection,
) -> Result<(Transaction, bool), sqlx::Error> {
    let reference = tx.reference.clone();
    if let Some(inserted) = insert_transaction(tx, conn).await? {
        return Ok((inserted, true));
    }
    let existing = fetch_by_reference(&reference, conn).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok((existing, false))
}

async fn insert_transaction(
    tx: NewTransaction,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO transactions (
                transaction_id,
                reference,
                amount,
                order_id,
                currency,
                status,
                customer_email,
                payment_method,
                paid_at,
                gateway_response
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (reference) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(tx.transaction_id)
    .bind(tx.reference)
    .bind(tx.amount)
    .bind(tx.order_id)
    .bind(tx.currency)
    .bind(tx.status)
    .bind(tx.customer_email)
    .bind(tx.payment_method)
    .bind(tx.paid_at)
    .bind(tx.gateway_response)
    .fetch_optional(conn)
    .await
}

pub async fn fetch_by_reference(
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM transactions WHERE reference = $1").bind(reference).fetch_optional(conn).await
}

pub async fn fetch_for_email(email: &str, conn: &mut SqliteConnection) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM transactions WHERE customer_email = $1 ORDER BY paid_at DESC, id DESC")
        .bind(email)
        .fetch_all(conn)
        .await
}
