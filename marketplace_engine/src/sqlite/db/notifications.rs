use sqlx::SqliteConnection;

use crate::db_types::{AdminNotification, Notification};

pub async fn insert_notification(
    user_id: i64,
    message: &str,
    conn: &mut SqliteConnection,
) -> Result<Notification, sqlx::Error> {
    sqlx::query_as("INSERT INTO notifications (user_id, message) VALUES ($1, $2) RETURNING *")
        .bind(user_id)
        .bind(message)
        .fetch_one(conn)
        .await
}

pub async fn insert_admin_notification(
    kind: &str,
    message: &str,
    product_id: Option<i64>,
    conn: &mut SqliteConnection,
) -> Result<AdminNotification, sqlx::Error> {
    sqlx::query_as("INSERT INTO admin_notifications (kind, message, product_id) VALUES ($1, $2, $3) RETURNING *")
        .bind(kind)
        .bind(message)
        .bind(product_id)
        .fetch_one(conn)
        .await
}

pub async fn fetch_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await
}

pub async fn mark_all_read(user_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn mark_read(
    user_id: i64,
    id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Notification>, sqlx::Error> {
    sqlx::query_as("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2 RETURNING *")
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
}

pub async fn fetch_admin_notifications(conn: &mut SqliteConnection) -> Result<Vec<AdminNotification>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM admin_notifications ORDER BY created_at DESC, id DESC").fetch_all(conn).await
}

pub async fn mark_all_admin_read(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE admin_notifications SET is_read = TRUE WHERE is_read = FALSE").execute(conn).await?;
    Ok(result.rows_affected())
}

pub async fn mark_admin_read(id: i64, conn: &mut SqliteConnection) -> Result<Option<AdminNotification>, sqlx::Error> {
    sqlx::query_as("UPDATE admin_notifications SET is_read = TRUE WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(conn)
        .await
}
