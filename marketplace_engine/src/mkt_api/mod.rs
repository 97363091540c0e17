//! # Marketplace engine public API
//!
//! The `mkt_api` module exposes the programmatic API for the marketplace. Each API is generic over the storage traits
//! it needs, so callers pick only the functionality they use.
//!
//! * [`accounts_api`] handles registration, logins, profiles, password resets and the admin dashboard.
//! * [`product_api`] handles listings, from a seller's upload through admin review.
//! * [`order_api`] places orders and reads back recorded payments.
//! * [`notification_api`] reads and updates user and admin notifications.
//! * [`checkout_flow_api`] reconciles a verified payment with its order and books the shipment.
//!
//! # API usage
//!
//! Every API is created from a backend that implements the traits it needs:
//!
//! ```rust,ignore
//! use marketplace_engine::{ProductApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/marketplace.db", 5).await?;
//! let api = ProductApi::new(db);
//! let listing = api.fetch(42).await?;
//! ```

pub mod account_objects;
pub mod accounts_api;
pub mod checkout_flow_api;
pub mod notification_api;
pub mod order_api;
pub mod order_objects;
pub mod product_api;
pub mod product_objects;
