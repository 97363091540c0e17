//! `SqliteDatabase` is the concrete marketplace backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the storage traits defined in the [`crate::traits`]
//! module.
use std::{collections::HashMap, fmt::Debug};

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{migrate, SqlitePool};

use super::db::{admins, db_url, new_pool, notifications, orders, products, transactions, users};
use crate::{
    db_types::{
        Admin,
        AdminNotification,
        DashboardSummary,
        NewOrder,
        NewProduct,
        NewTransaction,
        NewUser,
        Notification,
        Order,
        OrderDetails,
        Product,
        ProductStatus,
        ProductTag,
        ProductUpdate,
        Transaction,
        User,
        UserProfileUpdate,
        UserSummary,
        PRODUCT_PENDING_NOTIFICATION,
    },
    mkt_api::product_objects::ProductQueryFilter,
    traits::{
        AccountApiError,
        NotificationApiError,
        NotificationManagement,
        OrderApiError,
        OrderManagement,
        ProductApiError,
        ProductManagement,
        TransactionManagement,
        UserManagement,
    },
};

pub const PRODUCT_REVIEW_MESSAGE: &str = "Your product would undergo review.";

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl UserManagement for SqliteDatabase {
    async fn insert_user(&self, user: NewUser) -> Result<User, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_id(id, &mut conn).await?)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_email(email, &mut conn).await?)
    }

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_username(username, &mut conn).await?)
    }

    async fn update_user_profile(&self, id: i64, update: UserProfileUpdate) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::update_profile(id, update, &mut conn).await?)
    }

    async fn set_reset_token(&self, user_id: i64, token: &str, expires: DateTime<Utc>) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::set_reset_token(user_id, token, expires, &mut conn).await
    }

    async fn fetch_user_by_reset_token(&self, token: &str) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_reset_token(token, &mut conn).await?)
    }

    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        users::update_password(user_id, password_hash, &mut conn).await
    }

    async fn fetch_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(admins::fetch_admin_by_email(email, &mut conn).await?)
    }

    async fn fetch_admin_by_id(&self, id: i64) -> Result<Option<Admin>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(admins::fetch_admin_by_id(id, &mut conn).await?)
    }

    async fn insert_admin(&self, email: &str, password_hash: &str) -> Result<Admin, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let admin = admins::insert_admin(email, password_hash, &mut conn).await?;
        info!("🗃️ Admin account #{} created for {}", admin.id, admin.email);
        Ok(admin)
    }

    async fn fetch_dashboard_summary(&self) -> Result<DashboardSummary, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::dashboard_summary(&mut conn).await?)
    }
}

impl ProductManagement for SqliteDatabase {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, ProductApiError> {
        let mut tx = self.pool.begin().await?;
        let product = products::insert_product(product, &mut tx).await?;
        notifications::insert_notification(product.uploader_id, PRODUCT_REVIEW_MESSAGE, &mut tx).await?;
        let message = format!("A new product \"{}\" is pending approval.", product.title);
        notifications::insert_admin_notification(PRODUCT_PENDING_NOTIFICATION, &message, Some(product.id), &mut tx)
            .await?;
        tx.commit().await?;
        debug!("🗃️ Product #{} inserted and queued for review", product.id);
        Ok(product)
    }

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, ProductApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::fetch_product(id, &mut conn).await?)
    }

    async fn search_products(&self, query: ProductQueryFilter) -> Result<Vec<Product>, ProductApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::search_products(query, &mut conn).await?)
    }

    async fn fetch_user_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>, ProductApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_summaries(ids, &mut conn).await?)
    }

    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, ProductApiError> {
        let becomes_donation = update.tag == Some(ProductTag::Donate);
        let mut tx = self.pool.begin().await?;
        let product = products::update_product(id, update, &mut tx).await?;
        let product = match product {
            Some(_) if becomes_donation => {
                products::clear_price(id, &mut tx).await?;
                products::fetch_product(id, &mut tx).await?
            },
            p => p,
        };
        tx.commit().await?;
        Ok(product)
    }

    async fn update_product_status(&self, id: i64, status: ProductStatus) -> Result<Option<Product>, ProductApiError> {
        let mut tx = self.pool.begin().await?;
        let Some(product) = products::update_status(id, status, &mut tx).await? else {
            return Ok(None);
        };
        let message = format!("Your product \"{}\" has been {status}.", product.title);
        notifications::insert_notification(product.uploader_id, &message, &mut tx).await?;
        tx.commit().await?;
        Ok(Some(product))
    }

    async fn delete_product(&self, id: i64) -> Result<bool, ProductApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::delete_product(id, &mut conn).await?)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::insert_order(order, &mut conn).await?)
    }

    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order(id, &mut conn).await?)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let user_orders = orders::fetch_orders_for_user(user_id, &mut conn).await?;
        let buyer = users::fetch_user_summaries(&[user_id], &mut conn).await?.pop();
        let mut product_ids = user_orders.iter().filter_map(|o| o.product_id).collect::<Vec<_>>();
        product_ids.sort_unstable();
        product_ids.dedup();
        let by_id = orders::fetch_products_by_id(&product_ids, &mut conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect::<HashMap<_, _>>();
        let details = user_orders
            .into_iter()
            .map(|order| {
                let product = order.product_id.and_then(|id| by_id.get(&id).cloned());
                OrderDetails { order, user: buyer.clone(), product }
            })
            .collect();
        Ok(details)
    }

    async fn set_shipment_reference(&self, order_id: i64, reference: &str) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::set_shipment_reference(order_id, reference, &mut conn).await?)
    }

    async fn claim_for_booking(&self, order_id: i64) -> Result<bool, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let claimed = orders::claim_for_booking(order_id, &mut conn).await?;
        trace!("🗃️ Booking claim for order #{order_id}: {claimed}");
        Ok(claimed)
    }

    async fn release_booking_claim(&self, order_id: i64) -> Result<(), OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::release_booking_claim(order_id, &mut conn).await?)
    }
}

impl TransactionManagement for SqliteDatabase {
    async fn record_transaction(&self, new_tx: NewTransaction) -> Result<(Transaction, bool), OrderApiError> {
        // Write first: the write lock must be held before anything is read.
        let mut tx = self.pool.begin().await?;
        if let Some(id) = new_tx.order_id {
            if orders::mark_paid(id, &new_tx.reference, &mut tx).await?.is_none() {
                return Err(OrderApiError::OrderNotFound(id));
            }
        }
        let (transaction, inserted) = transactions::idempotent_insert(new_tx, &mut tx).await?;
        tx.commit().await?;
        if inserted {
            debug!("🗃️ Transaction {} stored as #{}", transaction.reference, transaction.id);
        }
        Ok((transaction, inserted))
    }

    async fn fetch_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(transactions::fetch_by_reference(reference, &mut conn).await?)
    }

    async fn fetch_transactions_for_email(&self, email: &str) -> Result<Vec<Transaction>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(transactions::fetch_for_email(email, &mut conn).await?)
    }
}

impl NotificationManagement for SqliteDatabase {
    async fn insert_notification(&self, user_id: i64, message: &str) -> Result<Notification, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::insert_notification(user_id, message, &mut conn).await?)
    }

    async fn fetch_notifications_for_user(&self, user_id: i64) -> Result<Vec<Notification>, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::fetch_for_user(user_id, &mut conn).await?)
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<u64, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::mark_all_read(user_id, &mut conn).await?)
    }

    async fn mark_read(&self, user_id: i64, id: i64) -> Result<Option<Notification>, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::mark_read(user_id, id, &mut conn).await?)
    }

    async fn fetch_admin_notifications(&self) -> Result<Vec<AdminNotification>, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::fetch_admin_notifications(&mut conn).await?)
    }

    async fn mark_all_admin_read(&self) -> Result<u64, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::mark_all_admin_read(&mut conn).await?)
    }

    async fn mark_admin_read(&self, id: i64) -> Result<Option<AdminNotification>, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::mark_admin_read(id, &mut conn).await?)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
