//! Adapters between the engine's provider traits and the third-party REST clients.
mod goshiip;
mod images;
mod paystack;

pub use goshiip::GoshiipLogistics;
pub use images::ImageStore;
pub use paystack::PaystackPayments;

use gateway_tools::GatewayApiError;
use marketplace_engine::ProviderError;

/// Carries the upstream status and body over into the engine's error type.
pub fn provider_error(e: GatewayApiError) -> ProviderError {
    let mut err = ProviderError::new(e.upstream_message());
    if let Some(status) = e.status() {
        err = err.with_status(status);
    }
    if let Some(body) = e.body() {
        err = err.with_detail(body.clone());
    }
    err
}
