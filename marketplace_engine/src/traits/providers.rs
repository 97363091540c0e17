use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db_types::{Kobo, NewTransaction};

/// A failed call to an external provider. `status` is the upstream HTTP status, when there was one.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub status: Option<u16>,
    pub message: String,
    pub detail: Option<Value>,
}

impl ProviderError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { status: None, message: message.into(), detail: None }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// The identifiers the storefront attaches to a payment when it initialises it. They tie a payment to an order and to
/// the shipping rate the buyer picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutMetadata {
    pub order_id: Option<i64>,
    pub rate_id: Option<String>,
    pub redis_key: Option<String>,
}

/// A payment, as reported by the payment gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedPayment {
    pub transaction_id: String,
    pub reference: String,
    pub amount: Kobo,
    pub currency: String,
    pub status: String,
    pub customer_email: String,
    pub channel: String,
    pub paid_at: DateTime<Utc>,
    pub gateway_response: Option<String>,
    pub metadata: CheckoutMetadata,
}

impl VerifiedPayment {
    pub fn is_successful(&self) -> bool {
        self.status == "success"
    }

    pub fn to_new_transaction(&self, order_id: Option<i64>) -> NewTransaction {
        NewTransaction {
            transaction_id: self.transaction_id.clone(),
            reference: self.reference.clone(),
            amount: self.amount,
            order_id,
            currency: self.currency.clone(),
            status: self.status.clone(),
            customer_email: self.customer_email.clone(),
            payment_method: self.channel.clone(),
            paid_at: self.paid_at,
            gateway_response: self.gateway_response.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub redis_key: String,
    pub rate_id: String,
    pub user_id: String,
    pub platform: String,
    pub delivery_note: String,
}

/// The logistics provider's answer to a booking request. `accepted` is false when the provider declined the booking,
/// in which case `message` says why.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingOutcome {
    pub accepted: bool,
    pub message: String,
    pub shipment_id: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignOutcome {
    pub http_status: u16,
    pub message: String,
}

impl AssignOutcome {
    pub fn is_assigned(&self) -> bool {
        self.http_status == 200
    }
}

#[allow(async_fn_in_trait)]
pub trait PaymentProvider {
    /// Asks the gateway for the current state of the payment with the given reference.
    async fn verify_transaction(&self, reference: &str) -> Result<VerifiedPayment, ProviderError>;
}

#[allow(async_fn_in_trait)]
pub trait LogisticsProvider {
    async fn book_shipment(&self, request: BookingRequest) -> Result<BookingOutcome, ProviderError>;

    /// Asks the provider to assign a carrier to a booked shipment.
    async fn assign_shipment(&self, shipment_id: &str) -> Result<AssignOutcome, ProviderError>;
}
