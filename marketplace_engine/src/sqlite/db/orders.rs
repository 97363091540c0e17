use log::debug;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{NewOrder, Order, OrderStatusType, Product};

pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (user_id, product_id, quantity, amount, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(order.user_id)
    .bind(order.product_id)
    .bind(order.quantity)
    .bind(order.amount)
    .bind(OrderStatusType::Pending)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order #{} inserted for user #{}", order.id, order.user_id);
    Ok(order)
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await
}

pub async fn fetch_products_by_id(ids: &[i64], conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let mut builder = QueryBuilder::new("SELECT * FROM products WHERE id IN (");
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    list.push_unseparated(")");
    builder.build_query_as::<Product>().fetch_all(conn).await
}

/// Links a payment to the order. A `Pending` order moves to `Paid`; orders that are further along keep their status.
pub async fn mark_paid(id: i64, reference: &str, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE orders SET
                transaction_reference = $1,
                status = CASE WHEN status = 'Pending' THEN 'Paid' ELSE status END,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING *;
        "#,
    )
    .bind(reference)
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn set_shipment_reference(
    id: i64,
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE orders SET shipment_reference = $1, status = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $3 \
         RETURNING *",
    )
    .bind(reference)
    .bind(OrderStatusType::Shipped)
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Claims the order for shipment booking. Returns `false` if the order has already been shipped, or another checkout
/// holds the claim.
pub async fn claim_for_booking(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE orders SET booking_started_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND shipment_reference IS NULL AND booking_started_at IS NULL
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn release_booking_claim(id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET booking_started_at = NULL WHERE id = $1 AND shipment_reference IS NULL")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
