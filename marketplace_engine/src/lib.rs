//! Marketplace Engine
//!
//! The marketplace engine holds the core logic of the marketplace backend: accounts, product listings, orders,
//! payments and notifications. It is transport-agnostic; the HTTP server and the operator CLI are thin layers on top.
//!
//! The library is divided into three main sections:
//! 1. Storage ([`mod@traits`] and [`mod@sqlite`]). The traits describe what a backend must provide, and
//!    [`SqliteDatabase`] implements them all. The records that backends hand back are defined in [`mod@db_types`].
//! 2. The public API ([`mod@mkt_api`]). Each API is generic over the storage traits it needs and owns the business
//!    rules: validation, ownership checks and review workflow.
//! 3. The checkout flow ([`CheckoutFlowApi`]), which reconciles a verified payment with its order and books the
//!    shipment through the [`PaymentProvider`] and [`LogisticsProvider`] abstractions.
pub mod db_types;
pub mod helpers;
pub mod mkt_api;
pub mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use mkt_api::{
    account_objects,
    accounts_api::AccountApi,
    checkout_flow_api::{
        CheckoutError,
        CheckoutFlowApi,
        CheckoutOutcome,
        FulfilmentReport,
        ShippingPlatform,
        TransactionDetails,
    },
    notification_api::NotificationApi,
    order_api::{OrderApi, TransactionApi},
    order_objects,
    product_api::ProductApi,
    product_objects,
};
pub use sqlite::{SqliteDatabase, PRODUCT_REVIEW_MESSAGE};
pub use traits::{
    AccountApiError,
    CheckoutDatabase,
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
