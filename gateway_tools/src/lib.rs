//! Typed REST clients for the third-party services the marketplace relies on:
//!
//! * [`PaystackApi`] for payments, bank lookups and seller subaccounts.
//! * [`GoshiipApi`] for shipping rates, bookings and tracking.
//! * [`CloudinaryApi`] for image hosting.
//!
//! All three share [`RestClient`], which turns non-2xx responses into [`GatewayApiError::QueryError`] so that callers
//! can relay the upstream status and body.
mod config;
mod error;
mod rest;

pub mod cloudinary;
pub mod goshiip;
pub mod paystack;

pub use cloudinary::CloudinaryApi;
pub use config::{CloudinaryConfig, GoshiipConfig, PaystackConfig};
pub use error::GatewayApiError;
pub use goshiip::GoshiipApi;
pub use paystack::{BankDirectory, PaystackApi};
pub use rest::RestClient;
