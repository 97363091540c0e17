use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use serde::Serialize;
use thiserror::Error;

use crate::{
    db_types::{Kobo, Order},
    traits::{
        AssignOutcome,
        BookingOutcome,
        BookingRequest,
        CheckoutDatabase,
        LogisticsProvider,
        OrderApiError,
        PaymentProvider,
        ProviderError,
        VerifiedPayment,
    },
};

pub const DEFAULT_PLATFORM: &str = "web2";
pub const DEFAULT_DELIVERY_NOTE: &str = "Your delivery is on the way";

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Error verifying transaction")]
    PaymentVerification(ProviderError),
    #[error("Transaction verification failed")]
    PaymentNotSuccessful(String),
    #[error("Missing {0} in transaction metadata")]
    MissingMetadata(&'static str),
    #[error("Order {0} not found")]
    OrderNotFound(i64),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Error occurred during booking process.")]
    BookingError(ProviderError),
    #[error("Booking failed. {0}")]
    BookingRejected(String),
    #[error("Shipment booked, but failed to trigger assignment.")]
    AssignmentError(ProviderError),
    #[error("A shipment for order {0} is already being booked.")]
    BookingInProgress(i64),
}

impl From<OrderApiError> for CheckoutError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::OrderNotFound(id) => CheckoutError::OrderNotFound(id),
            e => CheckoutError::DatabaseError(e.to_string()),
        }
    }
}

/// The settings the logistics provider needs for every booking made on behalf of the marketplace.
#[derive(Debug, Clone)]
pub struct ShippingPlatform {
    pub user_id: String,
    pub platform: String,
    pub delivery_note: String,
}

impl ShippingPlatform {
    pub fn new<S: Into<String>>(user_id: S) -> Self {
        Self {
            user_id: user_id.into(),
            platform: DEFAULT_PLATFORM.to_string(),
            delivery_note: DEFAULT_DELIVERY_NOTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub amount: Kobo,
    pub status: String,
    pub payment_method: String,
    pub currency: String,
    pub paid_at: DateTime<Utc>,
    pub shipment_id: Option<String>,
}

/// What happened during a checkout. `warnings` lists the bookkeeping steps that failed without stopping the flow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfilmentReport {
    pub transaction_details: TransactionDetails,
    pub booking_status: String,
    pub assign_status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    /// Payment recorded, shipment booked and a carrier assigned.
    Fulfilled(FulfilmentReport),
    /// The shipment was booked, but the logistics provider did not accept the carrier assignment.
    AssignmentFailed(FulfilmentReport),
    /// The order already carries a shipment reference. Nothing was done.
    AlreadyFulfilled(Order),
}

/// `CheckoutFlowApi` turns a payment reference into a paid, shipped order.
///
/// The flow verifies the payment with the payment gateway, records it against the order named in the payment
/// metadata, books a shipment using the rate the buyer picked and finally asks the logistics provider to assign a
/// carrier. Recording the payment and storing the shipment reference are best effort: failures there are logged and
/// reported as warnings, and the flow carries on.
///
/// Before booking, the flow claims the order in storage. Only one checkout can hold the claim, so concurrent or
/// repeated verifications of the same payment book at most one shipment. A booking that fails or is declined gives the
/// claim back.
pub struct CheckoutFlowApi<B, P, L> {
    db: B,
    payments: P,
    logistics: L,
    platform: ShippingPlatform,
}

impl<B, P, L> Debug for CheckoutFlowApi<B, P, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutFlowApi ({})", self.platform.platform)
    }
}

impl<B, P, L> CheckoutFlowApi<B, P, L>
where
    B: CheckoutDatabase,
    P: PaymentProvider,
    L: LogisticsProvider,
{
    pub fn new(db: B, payments: P, logistics: L, platform: ShippingPlatform) -> Self {
        Self { db, payments, logistics, platform }
    }

    pub async fn verify_and_fulfil(&self, reference: &str) -> Result<CheckoutOutcome, CheckoutError> {
        let payment = self.payments.verify_transaction(reference).await.map_err(|e| {
            error!("💸️ Could not verify payment {reference}. {e}");
            CheckoutError::PaymentVerification(e)
        })?;
        if !payment.is_successful() {
            info!("💸️ Payment {reference} has status '{}'. Not fulfilling.", payment.status);
            return Err(CheckoutError::PaymentNotSuccessful(payment.status));
        }
        let order_id = payment.metadata.order_id.ok_or(CheckoutError::MissingMetadata("order_id"))?;
        let rate_id = payment.metadata.rate_id.clone().ok_or(CheckoutError::MissingMetadata("rate_id"))?;
        let redis_key = payment.metadata.redis_key.clone().ok_or(CheckoutError::MissingMetadata("redis_key"))?;

        let order = match self.db.fetch_order(order_id).await? {
            Some(order) => order,
            None => {
                warn!("💸️ Payment {reference} names order #{order_id}, which does not exist. Storing it unlinked.");
                if let Err(e) = self.db.record_transaction(payment.to_new_transaction(None)).await {
                    error!("💸️ Could not store payment {reference}. {e}");
                }
                return Err(CheckoutError::OrderNotFound(order_id));
            },
        };
        if order.shipment_reference.is_some() {
            info!("💸️ Order #{order_id} has already been shipped. Payment {reference} needs no further action.");
            return Ok(CheckoutOutcome::AlreadyFulfilled(order));
        }

        let mut warnings = Vec::new();
        self.record_payment(&payment, order_id, &mut warnings).await;

        if !self.db.claim_for_booking(order_id).await? {
            return self.claimed_elsewhere(order_id, reference).await;
        }
        let booking = match self.book(redis_key, rate_id).await {
            Ok(booking) => booking,
            Err(e) => {
                self.release_claim(order_id).await;
                return Err(e);
            },
        };
        let shipment_id = booking.shipment_id.clone();
        match booking.reference.as_deref() {
            Some(shipment_ref) => self.store_shipment_reference(order_id, shipment_ref, &mut warnings).await,
            None => warnings.push("The logistics provider did not return a shipment reference".to_string()),
        }

        let assignment = match shipment_id.as_deref() {
            Some(id) => self.logistics.assign_shipment(id).await.map_err(|e| {
                error!("🚚️ Shipment {id} was booked, but assignment failed. {e}");
                CheckoutError::AssignmentError(e)
            })?,
            None => {
                let e = ProviderError::new("No shipment id was returned by the booking");
                return Err(CheckoutError::AssignmentError(e));
            },
        };
        let report = build_report(&payment, shipment_id, booking, &assignment, warnings);
        if assignment.is_assigned() {
            info!("🚚️ Order #{order_id} is paid, booked and assigned to a carrier");
            Ok(CheckoutOutcome::Fulfilled(report))
        } else {
            warn!("🚚️ Order #{order_id} was booked but the carrier assignment failed: {}", assignment.message);
            Ok(CheckoutOutcome::AssignmentFailed(report))
        }
    }

    async fn claimed_elsewhere(&self, order_id: i64, reference: &str) -> Result<CheckoutOutcome, CheckoutError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(CheckoutError::OrderNotFound(order_id))?;
        if order.shipment_reference.is_some() {
            info!("💸️ Order #{order_id} was shipped by another checkout. Payment {reference} needs no further action.");
            return Ok(CheckoutOutcome::AlreadyFulfilled(order));
        }
        warn!("🚚️ Order #{order_id} is being booked by another checkout. Not booking it again for {reference}.");
        Err(CheckoutError::BookingInProgress(order_id))
    }

    async fn release_claim(&self, order_id: i64) {
        if let Err(e) = self.db.release_booking_claim(order_id).await {
            error!("🚚️ Could not release the booking claim on order #{order_id}. {e}");
        }
    }

    async fn record_payment(&self, payment: &VerifiedPayment, order_id: i64, warnings: &mut Vec<String>) {
        match self.db.record_transaction(payment.to_new_transaction(Some(order_id))).await {
            Ok((tx, true)) => debug!("💸️ Payment {} stored as transaction #{}", tx.reference, tx.id),
            Ok((tx, false)) => debug!("💸️ Payment {} was already stored as transaction #{}", tx.reference, tx.id),
            Err(e) => {
                error!("💸️ Could not store payment {} for order #{order_id}. {e}", payment.reference);
                warnings.push(format!("Error saving transaction: {e}"));
            },
        }
    }

    async fn book(&self, redis_key: String, rate_id: String) -> Result<BookingOutcome, CheckoutError> {
        let request = BookingRequest {
            redis_key,
            rate_id,
            user_id: self.platform.user_id.clone(),
            platform: self.platform.platform.clone(),
            delivery_note: self.platform.delivery_note.clone(),
        };
        let booking = self.logistics.book_shipment(request).await.map_err(|e| {
            error!("🚚️ Booking request failed. {e}");
            CheckoutError::BookingError(e)
        })?;
        if !booking.accepted {
            warn!("🚚️ Booking was declined. {}", booking.message);
            return Err(CheckoutError::BookingRejected(booking.message));
        }
        Ok(booking)
    }

    async fn store_shipment_reference(&self, order_id: i64, shipment_ref: &str, warnings: &mut Vec<String>) {
        match self.db.set_shipment_reference(order_id, shipment_ref).await {
            Ok(Some(_)) => debug!("🚚️ Order #{order_id} has shipment reference {shipment_ref}"),
            Ok(None) => warnings.push(format!("Order {order_id} disappeared before the shipment could be saved")),
            Err(e) => {
                error!("🚚️ Could not store shipment reference {shipment_ref} for order #{order_id}. {e}");
                warnings.push(format!("Error updating order with shipment reference: {e}"));
            },
        }
    }
}

fn build_report(
    payment: &VerifiedPayment,
    shipment_id: Option<String>,
    booking: BookingOutcome,
    assignment: &AssignOutcome,
    warnings: Vec<String>,
) -> FulfilmentReport {
    FulfilmentReport {
        transaction_details: TransactionDetails {
            amount: payment.amount,
            status: payment.status.clone(),
            payment_method: payment.channel.clone(),
            currency: payment.currency.clone(),
            paid_at: payment.paid_at,
            shipment_id,
        },
        booking_status: booking.message,
        assign_status: assignment.message.clone(),
        warnings,
    }
}
