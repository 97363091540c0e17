//! Unifies API for user and admin accounts.

use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    db_types::{Admin, DashboardSummary, NewUser, SellerProfile, User},
    helpers::{hash_password, new_reset_token, required, verify_password, RESET_TOKEN_LIFETIME},
    mkt_api::{
        account_objects::{BankDetails, ProfileUpdate, RegisterUser},
        product_objects::ProductQueryFilter,
    },
    traits::{AccountApiError, ProductManagement, UserManagement},
};

/// The `AccountApi` handles registration, login, profiles and password resets.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn register(&self, form: RegisterUser) -> Result<User, AccountApiError> {
        let missing = || AccountApiError::Validation("Please provide all fields.".into());
        let full_name = required("fullName", &form.full_name).map_err(|_| missing())?;
        let username = required("username", &form.username).map_err(|_| missing())?;
        let email = required("email", &form.email).map_err(|_| missing())?.to_lowercase();
        let password = form.password.as_deref().filter(|p| !p.is_empty()).ok_or_else(missing)?;
        let confirm = form.confirm_password.as_deref().filter(|p| !p.is_empty()).ok_or_else(missing)?;
        if password != confirm {
            return Err(AccountApiError::Validation("Passwords do not match.".into()));
        }
        if self.db.fetch_user_by_email(&email).await?.is_some() {
            return Err(AccountApiError::EmailAlreadyExists(email));
        }
        let password_hash = hash_password(password)?;
        let user = NewUser { full_name: full_name.into(), username: username.into(), email, password_hash };
        let user = self.db.insert_user(user).await?;
        info!("🙋️ New user #{} ({}) registered", user.id, user.username);
        Ok(user)
    }

    /// Checks a user's email and password. Unknown emails and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AccountApiError> {
        let user = self.db.fetch_user_by_email(&email.trim().to_lowercase()).await?;
        match user {
            Some(user) if verify_password(password, &user.password_hash) => {
                debug!("🙋️ User #{} logged in", user.id);
                Ok(user)
            },
            _ => Err(AccountApiError::InvalidCredentials),
        }
    }

    pub async fn admin_login(&self, email: &str, password: &str) -> Result<Admin, AccountApiError> {
        let admin = self.db.fetch_admin_by_email(&email.trim().to_lowercase()).await?;
        match admin {
            Some(admin) if verify_password(password, &admin.password_hash) => {
                info!("🛡️ Admin #{} logged in", admin.id);
                Ok(admin)
            },
            _ => Err(AccountApiError::InvalidCredentials),
        }
    }

    pub async fn create_admin(&self, email: &str, password: &str) -> Result<Admin, AccountApiError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AccountApiError::Validation("Please provide email and password".into()));
        }
        if self.db.fetch_admin_by_email(&email).await?.is_some() {
            return Err(AccountApiError::EmailAlreadyExists(email));
        }
        let hash = hash_password(password)?;
        self.db.insert_admin(&email, &hash).await
    }

    pub async fn admin_by_id(&self, id: i64) -> Result<Option<Admin>, AccountApiError> {
        self.db.fetch_admin_by_id(id).await
    }

    pub async fn profile(&self, user_id: i64) -> Result<User, AccountApiError> {
        self.db.fetch_user_by_id(user_id).await?.ok_or(AccountApiError::UserNotFound)
    }

    /// Updates a user's profile. The full name and username are always required. Supplying all three bank fields
    /// marks the account as verified, which sellers need before they can list products.
    pub async fn update_profile(&self, user_id: i64, form: ProfileUpdate) -> Result<User, AccountApiError> {
        let missing = |_| AccountApiError::Validation("Please provide all required fields".into());
        required("fullName", &form.full_name).map_err(missing)?;
        required("username", &form.username).map_err(missing)?;
        let update = form.into_update();
        if update.is_verified == Some(true) {
            debug!("🙋️ User #{user_id} supplied bank details. Marking as verified");
        }
        self.db.update_user_profile(user_id, update).await?.ok_or(AccountApiError::UserNotFound)
    }

    /// Issues a password reset token for the user with the given email. The token is valid for one hour. The caller
    /// is responsible for delivering it.
    pub async fn begin_password_reset(&self, email: &str) -> Result<(User, String), AccountApiError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AccountApiError::Validation("Please provide an email address.".into()));
        }
        let user = self.db.fetch_user_by_email(&email).await?.ok_or(AccountApiError::UserNotFound)?;
        let token = new_reset_token();
        let expires = Utc::now() + RESET_TOKEN_LIFETIME;
        self.db.set_reset_token(user.id, &token, expires).await?;
        debug!("🔑️ Password reset token issued for user #{}. It expires at {expires}", user.id);
        Ok((user, token))
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), AccountApiError> {
        if token.trim().is_empty() {
            return Err(AccountApiError::InvalidResetToken);
        }
        if password.is_empty() {
            return Err(AccountApiError::Validation("'password' is required".into()));
        }
        let user = self.db.fetch_user_by_reset_token(token.trim()).await?.ok_or(AccountApiError::InvalidResetToken)?;
        let expired = user.reset_password_expires.map(|t| t < Utc::now()).unwrap_or(true);
        if expired {
            warn!("🔑️ User #{} tried to use an expired reset token", user.id);
            return Err(AccountApiError::InvalidResetToken);
        }
        let hash = hash_password(password)?;
        self.db.update_password(user.id, &hash).await?;
        info!("🔑️ Password reset for user #{}", user.id);
        Ok(())
    }

    /// The payout details a buyer needs to pay a seller directly.
    pub async fn seller_bank_details(&self, seller_id: i64) -> Result<BankDetails, AccountApiError> {
        let seller = self.db.fetch_user_by_id(seller_id).await?.ok_or(AccountApiError::SellerNotFound)?;
        match (seller.bank_name, seller.account_number, seller.account_name) {
            (Some(bank_name), Some(account_number), Some(account_name))
                if !bank_name.is_empty() && !account_number.is_empty() && !account_name.is_empty() =>
            {
                Ok(BankDetails { bank_name, account_number, account_name })
            },
            _ => Err(AccountApiError::IncompleteBankDetails),
        }
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary, AccountApiError> {
        self.db.fetch_dashboard_summary().await
    }
}

impl<B> AccountApi<B>
where B: UserManagement + ProductManagement
{
    /// A seller's public profile, with every product they have listed.
    pub async fn seller_profile(&self, username: &str) -> Result<SellerProfile, AccountApiError> {
        let user = self.db.fetch_user_by_username(username.trim()).await?.ok_or(AccountApiError::UserNotFound)?;
        let query = ProductQueryFilter::default().with_uploader(user.id);
        let products =
            self.db.search_products(query).await.map_err(|e| AccountApiError::DatabaseError(e.to_string()))?;
        Ok(SellerProfile { user, products })
    }
}
