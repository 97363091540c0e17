//! Paystack: payments, bank lookups and split-payment subaccounts.
//!
//! Paystack quotes every amount in kobo, which maps directly onto [`Kobo`].
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::*;
use mkt_common::{Kobo, NAIRA_CURRENCY_CODE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::{GatewayApiError, PaystackConfig, RestClient};

/// The marketplace keeps this share of every sale.
pub const PLATFORM_FEE_PERCENT: u8 = 20;

/// Every Paystack response is wrapped in this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaystackResponse<T> {
    pub status: bool,
    pub message: String,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaystackTransaction {
    pub id: u64,
    pub reference: String,
    pub amount: Kobo,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub channel: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub gateway_response: Option<String>,
    pub customer: Customer,
    #[serde(default)]
    pub metadata: Value,
}

impl PaystackTransaction {
    /// Reads a metadata field as a string. Paystack hands back whatever the storefront sent, so numbers are accepted
    /// too. Empty values count as missing.
    pub fn metadata_field(&self, key: &str) -> Option<String> {
        match &self.metadata[key] {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: u64,
    pub name: String,
    pub slug: Option<String>,
    pub code: String,
    #[serde(default)]
    pub active: bool,
    pub country: Option<String>,
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub bank_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubaccount {
    pub business_name: String,
    pub bank_code: String,
    pub account_number: String,
    pub percentage_charge: f64,
}

/// A payment to a seller, split with the platform. The platform's cut is added when the payment is initialised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInitialization {
    pub email: String,
    pub amount: Kobo,
    pub subaccount: String,
    pub metadata: Option<Value>,
}

#[derive(Clone)]
pub struct PaystackApi {
    client: RestClient,
}

impl PaystackApi {
    pub fn new(config: PaystackConfig) -> Result<Self, GatewayApiError> {
        let client = RestClient::new(&config.base_url, Some(&config.secret_key))?;
        Ok(Self { client })
    }

    pub async fn verify_transaction(&self, reference: &str) -> Result<PaystackTransaction, GatewayApiError> {
        let path = format!("/transaction/verify/{}", urlencoding::encode(reference));
        debug!("💸️ Verifying transaction {reference}");
        let result =
            self.client.rest_query::<PaystackResponse<PaystackTransaction>, ()>(Method::GET, &path, &[], None).await?;
        info!("💸️ Transaction {reference} is '{}'", result.data.status);
        Ok(result.data)
    }

    pub async fn list_banks(&self) -> Result<Vec<Bank>, GatewayApiError> {
        let params = [("currency", NAIRA_CURRENCY_CODE)];
        let result =
            self.client.rest_query::<PaystackResponse<Vec<Bank>>, ()>(Method::GET, "/bank", &params, None).await?;
        debug!("💸️ Fetched {} banks", result.data.len());
        Ok(result.data)
    }

    /// Looks up the account holder's name. The upstream response is returned as is.
    pub async fn resolve_account(&self, account_number: &str, bank_code: &str) -> Result<Value, GatewayApiError> {
        let params = [("account_number", account_number), ("bank_code", bank_code)];
        self.client.rest_query::<Value, ()>(Method::GET, "/bank/resolve", &params, None).await
    }

    pub async fn create_subaccount(&self, account: NewSubaccount) -> Result<Value, GatewayApiError> {
        info!("💸️ Creating subaccount for {}", account.business_name);
        self.client.rest_query(Method::POST, "/subaccount", &[], Some(account)).await
    }

    /// Starts a split payment. The platform fee is charged to the seller's subaccount.
    pub async fn initialize_transaction(&self, tx: TransactionInitialization) -> Result<Value, GatewayApiError> {
        let body = initialization_body(&tx);
        debug!("💸️ Initialising a payment of {} from {}", tx.amount, tx.email);
        self.client.rest_query(Method::POST, "/transaction/initialize", &[], Some(body)).await
    }
}

fn initialization_body(tx: &TransactionInitialization) -> Value {
    let mut body = json!({
        "email": tx.email,
        "amount": tx.amount,
        "subaccount": tx.subaccount,
        "transaction_charge": tx.amount.percent(PLATFORM_FEE_PERCENT),
        "bearer": "subaccount",
    });
    if let Some(metadata) = &tx.metadata {
        body["metadata"] = metadata.clone();
    }
    body
}

/// An in-memory copy of Paystack's bank list. The list is fetched on first use, and again whenever it is empty.
#[derive(Clone)]
pub struct BankDirectory {
    api: PaystackApi,
    banks: Arc<RwLock<Vec<Bank>>>,
}

impl BankDirectory {
    pub fn new(api: PaystackApi) -> Self {
        Self { api, banks: Arc::new(RwLock::new(Vec::new())) }
    }

    pub async fn banks(&self) -> Result<Vec<Bank>, GatewayApiError> {
        {
            let banks = self.banks.read().await;
            if !banks.is_empty() {
                return Ok(banks.clone());
            }
        }
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<Vec<Bank>, GatewayApiError> {
        let mut banks = self.banks.write().await;
        if banks.is_empty() {
            *banks = self.api.list_banks().await?;
            info!("💸️ Bank directory loaded with {} banks", banks.len());
        }
        Ok(banks.clone())
    }

    /// Finds a bank by name, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Bank>, GatewayApiError> {
        let name = name.trim().to_lowercase();
        let banks = self.banks().await?;
        Ok(banks.into_iter().find(|b| b.name.to_lowercase() == name))
    }
}
