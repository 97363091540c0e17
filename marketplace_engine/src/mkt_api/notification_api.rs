use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{AdminNotification, Notification},
    traits::{NotificationApiError, NotificationManagement, UserManagement},
};

pub struct NotificationApi<B> {
    db: B,
}

impl<B: Debug> Debug for NotificationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationApi ({:?})", self.db)
    }
}

impl<B> NotificationApi<B>
where B: NotificationManagement + UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn for_user(&self, user_id: i64) -> Result<Vec<Notification>, NotificationApiError> {
        self.db.fetch_notifications_for_user(user_id).await
    }

    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, NotificationApiError> {
        let n = self.db.mark_all_read(user_id).await?;
        debug!("🔔️ Marked {n} notifications as read for user #{user_id}");
        Ok(n)
    }

    pub async fn mark_read(&self, user_id: i64, id: i64) -> Result<Notification, NotificationApiError> {
        self.db.mark_read(user_id, id).await?.ok_or(NotificationApiError::NotificationNotFound(id))
    }

    /// Sends a notification to another user.
    pub async fn notify(
        &self,
        user_id: Option<i64>,
        message: Option<String>,
    ) -> Result<Notification, NotificationApiError> {
        let message = message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty());
        let (user_id, message) = match (user_id, message) {
            (Some(id), Some(m)) => (id, m),
            _ => return Err(NotificationApiError::Validation("Message and userId are required".into())),
        };
        if self.db.fetch_user_by_id(user_id).await?.is_none() {
            return Err(NotificationApiError::RecipientNotFound(user_id));
        }
        self.db.insert_notification(user_id, &message).await
    }

    pub async fn for_admins(&self) -> Result<Vec<AdminNotification>, NotificationApiError> {
        self.db.fetch_admin_notifications().await
    }

    pub async fn mark_all_admin_read(&self) -> Result<u64, NotificationApiError> {
        self.db.mark_all_admin_read().await
    }

    pub async fn mark_admin_read(&self, id: i64) -> Result<AdminNotification, NotificationApiError> {
        self.db.mark_admin_read(id).await?.ok_or(NotificationApiError::NotificationNotFound(id))
    }
}
