use chrono::Utc;
use gateway_tools::{paystack::PaystackTransaction, PaystackApi};
use log::*;
use marketplace_engine::{
    traits::{CheckoutMetadata, VerifiedPayment},
    PaymentProvider,
    ProviderError,
};

use super::provider_error;

#[derive(Clone)]
pub struct PaystackPayments {
    api: PaystackApi,
}

impl PaystackPayments {
    pub fn new(api: PaystackApi) -> Self {
        Self { api }
    }
}

impl PaymentProvider for PaystackPayments {
    async fn verify_transaction(&self, reference: &str) -> Result<VerifiedPayment, ProviderError> {
        let tx = self.api.verify_transaction(reference).await.map_err(provider_error)?;
        Ok(verified_payment(tx))
    }
}

/// Converts Paystack's view of a transaction into the engine's. The order id is sent by the storefront as either a
/// number or a string; anything that isn't an integer is treated as missing.
pub fn verified_payment(tx: PaystackTransaction) -> VerifiedPayment {
    let order_id = tx.metadata_field("order_id").and_then(|s| {
        s.parse::<i64>().map_err(|e| warn!("💸️ Transaction {} has an invalid order_id '{s}'. {e}", tx.reference)).ok()
    });
    let metadata =
        CheckoutMetadata { order_id, rate_id: tx.metadata_field("rate_id"), redis_key: tx.metadata_field("redis_key") };
    let paid_at = tx.paid_at.unwrap_or_else(|| {
        debug!("💸️ Transaction {} has no payment time. Using the current time", tx.reference);
        Utc::now()
    });
    VerifiedPayment {
        transaction_id: tx.id.to_string(),
        reference: tx.reference,
        amount: tx.amount,
        currency: tx.currency,
        status: tx.status,
        customer_email: tx.customer.email,
        channel: tx.channel,
        paid_at,
        gateway_response: tx.gateway_response,
        metadata,
    }
}
