use std::fmt::Display;

use chrono::{DateTime, Utc};
use marketplace_engine::db_types::{Admin, Kobo, Transaction, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The envelope every JSON route answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T = Value> {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl JsonResponse<Value> {
    pub fn success<S: Display>(message: S) -> Self {
        Self { ok: true, message: message.to_string(), data: None, error: None }
    }

    pub fn failure<S: Display>(message: S, error: Option<Value>) -> Self {
        Self { ok: false, message: message.to_string(), data: None, error }
    }
}

impl<T: Serialize> JsonResponse<T> {
    pub fn with_data<S: Display>(message: S, data: T) -> Self {
        Self { ok: true, message: message.to_string(), data: Some(data), error: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub token: String,
}

impl LoginResponse {
    pub fn new(user: &User, token: String) -> Self {
        Self { id: user.id, full_name: user.full_name.clone(), email: user.email.clone(), token }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub id: i64,
    pub email: String,
    pub token: String,
}

impl AdminLoginResponse {
    pub fn new(admin: &Admin, token: String) -> Self {
        Self { id: admin.id, email: admin.email.clone(), token }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsernameQuery {
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploaderQuery {
    pub uploader: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveAccountQuery {
    pub account_number: Option<String>,
    pub bank_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubaccountRequest {
    pub business_name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub percentage_charge: Option<f64>,
}

/// The identifiers the storefront attaches to a payment so that it can be reconciled with an order later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutMetadataRequest {
    pub order_id: Option<i64>,
    pub rate_id: Option<String>,
    pub redis_key: Option<String>,
}

impl CheckoutMetadataRequest {
    /// The metadata as the payment gateway should store it. Field names match what the reconciliation flow reads back.
    pub fn to_gateway_metadata(&self) -> Value {
        serde_json::json!({
            "order_id": self.order_id,
            "rate_id": self.rate_id,
            "redis_key": self.redis_key,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeTransactionRequest {
    pub email: Option<String>,
    pub amount: Option<Kobo>,
    pub seller_subaccount: Option<String>,
    pub metadata: Option<CheckoutMetadataRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourierQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShipmentStatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotificationRequest {
    pub message: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse<T> {
    pub admin: Admin,
    pub summary: T,
}

/// A stored payment, as the storefront displays it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub transaction_id: String,
    pub reference: String,
    pub amount: Kobo,
    pub currency: String,
    pub status: String,
    pub customer_email: String,
    pub payment_method: String,
    pub paid_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionSummary {
    fn from(tx: Transaction) -> Self {
        Self {
            transaction_id: tx.transaction_id,
            reference: tx.reference,
            amount: tx.amount,
            currency: tx.currency,
            status: tx.status,
            customer_email: tx.customer_email,
            payment_method: tx.payment_method,
            paid_at: tx.paid_at,
        }
    }
}
