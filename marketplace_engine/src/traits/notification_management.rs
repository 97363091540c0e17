use thiserror::Error;

use crate::{
    db_types::{AdminNotification, Notification},
    helpers::FieldError,
    traits::AccountApiError,
};

#[derive(Debug, Clone, Error)]
pub enum NotificationApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    Validation(String),
    #[error("Notification not found")]
    NotificationNotFound(i64),
    #[error("User not found")]
    RecipientNotFound(i64),
}

impl From<sqlx::Error> for NotificationApiError {
    fn from(e: sqlx::Error) -> Self {
        NotificationApiError::DatabaseError(e.to_string())
    }
}

impl From<FieldError> for NotificationApiError {
    fn from(e: FieldError) -> Self {
        NotificationApiError::Validation(e.0)
    }
}

impl From<AccountApiError> for NotificationApiError {
    fn from(e: AccountApiError) -> Self {
        NotificationApiError::DatabaseError(e.to_string())
    }
}

#[allow(async_fn_in_trait)]
pub trait NotificationManagement {
    async fn insert_notification(&self, user_id: i64, message: &str) -> Result<Notification, NotificationApiError>;

    /// Newest first.
    async fn fetch_notifications_for_user(&self, user_id: i64) -> Result<Vec<Notification>, NotificationApiError>;

    /// Returns the number of notifications that changed.
    async fn mark_all_read(&self, user_id: i64) -> Result<u64, NotificationApiError>;

    /// Marks a single notification as read. Only the owner's notifications match; anything else returns `None`.
    async fn mark_read(&self, user_id: i64, id: i64) -> Result<Option<Notification>, NotificationApiError>;

    /// Newest first.
    async fn fetch_admin_notifications(&self) -> Result<Vec<AdminNotification>, NotificationApiError>;

    async fn mark_all_admin_read(&self) -> Result<u64, NotificationApiError>;

    async fn mark_admin_read(&self, id: i64) -> Result<Option<AdminNotification>, NotificationApiError>;
}
