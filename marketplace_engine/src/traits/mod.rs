//! # Storage and provider contracts
//!
//! This module defines the interfaces that marketplace *backends* must expose. The domain APIs in [`crate::mkt_api`]
//! are generic over these traits, so the HTTP server can run against SQLite in production and against mocks in
//! tests.
//!
//! ## Storage
//! * [`UserManagement`] handles user and admin accounts, profiles and password resets.
//! * [`ProductManagement`] handles listings and their review status. Creating a listing also queues the review
//!   notifications.
//! * [`OrderManagement`] handles buyer orders.
//! * [`TransactionManagement`] records verified payments against orders.
//! * [`NotificationManagement`] handles user and admin notifications.
//!
//! ## Providers
//! The checkout flow talks to a payment gateway and a logistics company. Those calls are abstracted by
//! [`PaymentProvider`] and [`LogisticsProvider`], which the server implements on top of its HTTP clients.
mod notification_management;
mod order_management;
mod product_management;
mod providers;
mod transaction_management;
mod user_management;

pub use notification_management::{NotificationApiError, NotificationManagement};
pub use order_management::{OrderApiError, OrderManagement};
pub use product_management::{ProductApiError, ProductManagement};
pub use providers::{
    AssignOutcome,
    BookingOutcome,
    BookingRequest,
    CheckoutMetadata,
    LogisticsProvider,
    PaymentProvider,
    ProviderError,
    VerifiedPayment,
};
pub use transaction_management::TransactionManagement;
pub use user_management::{AccountApiError, UserManagement};

/// Everything the checkout flow needs from storage.
pub trait CheckoutDatabase: OrderManagement + TransactionManagement {}

impl<T: OrderManagement + TransactionManagement> CheckoutDatabase for T {}
