use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use super::is_unique_violation;
use crate::{
    db_types::{DashboardSummary, NewUser, User, UserProfileUpdate, UserSummary},
    traits::AccountApiError,
};

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, AccountApiError> {
    let email = user.email.clone();
    let user = sqlx::query_as(
        r#"
            INSERT INTO users (full_name, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(user.full_name)
    .bind(user.username)
    .bind(user.email)
    .bind(user.password_hash)
    .fetch_one(conn)
    .await
    .map_err(|e| if is_unique_violation(&e) { AccountApiError::EmailAlreadyExists(email) } else { e.into() })?;
    Ok(user)
}

pub async fn fetch_user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await
}

pub async fn fetch_user_by_username(username: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE username = $1 ORDER BY id LIMIT 1")
        .bind(username)
        .fetch_optional(conn)
        .await
}

/// Fetches the public summaries for the given users. Unknown ids are skipped.
pub async fn fetch_user_summaries(ids: &[i64], conn: &mut SqliteConnection) -> Result<Vec<UserSummary>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let mut builder =
        QueryBuilder::new("SELECT id, username, email, phone_number, profile_picture FROM users WHERE id IN (");
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    list.push_unseparated(")");
    builder.build_query_as::<UserSummary>().fetch_all(conn).await
}

/// Overwrites every profile field that is `Some` in `update`. Returns `None` if the user does not exist.
pub async fn update_profile(
    id: i64,
    update: UserProfileUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, sqlx::Error> {
    let mut builder = QueryBuilder::new("UPDATE users SET updated_at = CURRENT_TIMESTAMP");
    let text_fields = [
        ("full_name", update.full_name),
        ("username", update.username),
        ("bio", update.bio),
        ("address", update.address),
        ("phone_number", update.phone_number),
        ("city", update.city),
        ("state", update.state),
        ("country", update.country),
        ("account_name", update.account_name),
        ("bank_name", update.bank_name),
        ("account_number", update.account_number),
        ("profile_picture", update.profile_picture),
    ];
    for (column, value) in text_fields {
        if let Some(value) = value {
            builder.push(format!(", {column} = "));
            builder.push_bind(value);
        }
    }
    if let Some(verified) = update.is_verified {
        builder.push(", is_verified = ");
        builder.push_bind(verified);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let user = builder.build_query_as::<User>().fetch_optional(conn).await?;
    if user.is_some() {
        debug!("🗃️ Profile for user #{id} updated");
    }
    Ok(user)
}

pub async fn set_reset_token(
    user_id: i64,
    token: &str,
    expires: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(), AccountApiError> {
    let result = sqlx::query(
        "UPDATE users SET reset_password_token = $1, reset_password_expires = $2, updated_at = CURRENT_TIMESTAMP \
         WHERE id = $3",
    )
    .bind(token)
    .bind(expires)
    .bind(user_id)
    .execute(conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AccountApiError::UserNotFound);
    }
    Ok(())
}

pub async fn fetch_user_by_reset_token(token: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE reset_password_token = $1").bind(token).fetch_optional(conn).await
}

/// Stores the new password hash and clears any outstanding reset token.
pub async fn update_password(user_id: i64, hash: &str, conn: &mut SqliteConnection) -> Result<(), AccountApiError> {
    let result = sqlx::query(
        "UPDATE users SET password_hash = $1, reset_password_token = NULL, reset_password_expires = NULL, updated_at \
         = CURRENT_TIMESTAMP WHERE id = $2",
    )
    .bind(hash)
    .bind(user_id)
    .execute(conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AccountApiError::UserNotFound);
    }
    Ok(())
}

pub async fn dashboard_summary(conn: &mut SqliteConnection) -> Result<DashboardSummary, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS users,
            (SELECT COUNT(*) FROM products WHERE status = 'pending') AS pending_products,
            (SELECT COUNT(*) FROM orders) AS orders,
            (SELECT COUNT(*) FROM admin_notifications WHERE is_read = FALSE) AS unread_notifications
        "#,
    )
    .fetch_one(conn)
    .await
}
