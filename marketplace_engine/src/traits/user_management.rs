use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    db_types::{Admin, DashboardSummary, NewUser, User, UserProfileUpdate},
    helpers::{FieldError, PasswordError},
};

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists.")]
    EmailAlreadyExists(String),
    #[error("User not found.")]
    UserNotFound,
    #[error("Seller not found.")]
    SellerNotFound,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid or expired token.")]
    InvalidResetToken,
    #[error("Incomplete bank details for the seller.")]
    IncompleteBankDetails,
    #[error("{0}")]
    PasswordError(#[from] PasswordError),
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}

impl From<FieldError> for AccountApiError {
    fn from(e: FieldError) -> Self {
        AccountApiError::Validation(e.0)
    }
}

/// The `UserManagement` trait defines behaviour for managing user and admin accounts.
///
/// Password hashing happens in [`crate::AccountApi`]; backends only ever see hashes.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Creates a new user. Fails with [`AccountApiError::EmailAlreadyExists`] if the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, AccountApiError>;

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, AccountApiError>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError>;

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, AccountApiError>;

    /// Overwrites the profile fields that are `Some` in `update`. Returns `None` if the user does not exist.
    async fn update_user_profile(&self, id: i64, update: UserProfileUpdate) -> Result<Option<User>, AccountApiError>;

    async fn set_reset_token(&self, user_id: i64, token: &str, expires: DateTime<Utc>) -> Result<(), AccountApiError>;

    async fn fetch_user_by_reset_token(&self, token: &str) -> Result<Option<User>, AccountApiError>;

    /// Stores a new password hash and clears any outstanding reset token.
    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AccountApiError>;

    async fn fetch_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AccountApiError>;

    async fn fetch_admin_by_id(&self, id: i64) -> Result<Option<Admin>, AccountApiError>;

    async fn insert_admin(&self, email: &str, password_hash: &str) -> Result<Admin, AccountApiError>;

    async fn fetch_dashboard_summary(&self) -> Result<DashboardSummary, AccountApiError>;
}
