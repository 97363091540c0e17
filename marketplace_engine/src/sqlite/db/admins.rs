use sqlx::SqliteConnection;

use super::is_unique_violation;
use crate::{db_types::Admin, traits::AccountApiError};

pub async fn insert_admin(email: &str, hash: &str, conn: &mut SqliteConnection) -> Result<Admin, AccountApiError> {
    let admin = sqlx::query_as("INSERT INTO admins (email, password_hash) VALUES ($1, $2) RETURNING *")
        .bind(email)
        .bind(hash)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AccountApiError::EmailAlreadyExists(email.to_string())
            } else {
                AccountApiError::from(e)
            }
        })?;
    Ok(admin)
}

pub async fn fetch_admin_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM admins WHERE email = $1").bind(email).fetch_optional(conn).await
}

pub async fn fetch_admin_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM admins WHERE id = $1").bind(id).fetch_optional(conn).await
}
