use chrono::{DateTime, Utc};
use gateway_tools::GatewayApiError;
use marketplace_engine::{
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
        ProductUpdate,
        Transaction,
        User,
        UserProfileUpdate,
        UserSummary,
    },
    product_objects::ProductQueryFilter,
    traits::{AssignOutcome, BookingOutcome, BookingRequest, VerifiedPayment},
    AccountApiError,
    LogisticsProvider,
    NotificationApiError,
    NotificationManagement,
    OrderApiError,
    OrderManagement,
    PaymentProvider,
    ProductApiError,
    ProductManagement,
    ProviderError,
    TransactionManagement,
    UserManagement,
};
use mockall::mock;

use crate::{
    integrations::ImageStore,
    mailer::{Mailer, MailerError},
};

mock! {
    pub Database {}
    impl UserManagement for Database {
        async fn insert_user(&self, user: NewUser) -> Result<User, AccountApiError>;
        async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, AccountApiError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError>;
        async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, AccountApiError>;
        async fn update_user_profile(
            &self,
            id: i64,
            update: UserProfileUpdate,
        ) -> Result<Option<User>, AccountApiError>;
        async fn set_reset_token(
            &self,
            user_id: i64,
            token: &str,
            expires: DateTime<Utc>,
        ) -> Result<(), AccountApiError>;
        async fn fetch_user_by_reset_token(&self, token: &str) -> Result<Option<User>, AccountApiError>;
        async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), AccountApiError>;
        async fn fetch_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AccountApiError>;
        async fn fetch_admin_by_id(&self, id: i64) -> Result<Option<Admin>, AccountApiError>;
        async fn insert_admin(&self, email: &str, password_hash: &str) -> Result<Admin, AccountApiError>;
        async fn fetch_dashboard_summary(&self) -> Result<DashboardSummary, AccountApiError>;
    }
    impl ProductManagement for Database {
        async fn insert_product(&self, product: NewProduct) -> Result<Product, ProductApiError>;
        async fn fetch_product(&self, id: i64) -> Result<Option<Product>, ProductApiError>;
        async fn search_products(&self, query: ProductQueryFilter) -> Result<Vec<Product>, ProductApiError>;
        async fn fetch_user_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>, ProductApiError>;
        async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, ProductApiError>;
        async fn update_product_status(
            &self,
            id: i64,
            status: ProductStatus,
        ) -> Result<Option<Product>, ProductApiError>;
        async fn delete_product(&self, id: i64) -> Result<bool, ProductApiError>;
    }
    impl OrderManagement for Database {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;
        async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderApiError>;
        async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderApiError>;
        async fn set_shipment_reference(&self, order_id: i64, reference: &str) -> Result<Option<Order>, OrderApiError>;
        async fn claim_for_booking(&self, order_id: i64) -> Result<bool, OrderApiError>;
        async fn release_booking_claim(&self, order_id: i64) -> Result<(), OrderApiError>;
    }
    impl TransactionManagement for Database {
        async fn record_transaction(&self, tx: NewTransaction) -> Result<(Transaction, bool), OrderApiError>;
        async fn fetch_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>, OrderApiError>;
        async fn fetch_transactions_for_email(&self, email: &str) -> Result<Vec<Transaction>, OrderApiError>;
    }
    impl NotificationManagement for Database {
        async fn insert_notification(&self, user_id: i64, message: &str) -> Result<Notification, NotificationApiError>;
        async fn fetch_notifications_for_user(&self, user_id: i64) -> Result<Vec<Notification>, NotificationApiError>;
        async fn mark_all_read(&self, user_id: i64) -> Result<u64, NotificationApiError>;
        async fn mark_read(&self, user_id: i64, id: i64) -> Result<Option<Notification>, NotificationApiError>;
        async fn fetch_admin_notifications(&self) -> Result<Vec<AdminNotification>, NotificationApiError>;
        async fn mark_all_admin_read(&self) -> Result<u64, NotificationApiError>;
        async fn mark_admin_read(&self, id: i64) -> Result<Option<AdminNotification>, NotificationApiError>;
    }
}

mock! {
    pub Mailer {}
    impl Mailer for Mailer {
        async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError>;
    }
}

mock! {
    pub ImageStore {}
    impl ImageStore for ImageStore {
        async fn store_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String, GatewayApiError>;
    }
}

mock! {
    pub Payments {}
    impl PaymentProvider for Payments {
        async fn verify_transaction(&self, reference: &str) -> Result<VerifiedPayment, ProviderError>;
    }
}

mock! {
    pub Logistics {}
    impl LogisticsProvider for Logistics {
        async fn book_shipment(&self, request: BookingRequest) -> Result<BookingOutcome, ProviderError>;
        async fn assign_shipment(&self, shipment_id: &str) -> Result<AssignOutcome, ProviderError>;
    }
}
