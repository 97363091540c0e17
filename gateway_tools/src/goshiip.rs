//! GoShiip logistics: courier partners, rate quotes, bookings and tracking.
use log::*;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{GatewayApiError, GoshiipConfig, RestClient};

/// GoShiip quotes every shipment with the same parcel. Callers cannot override it.
pub const STANDARD_PARCEL: Parcel = Parcel { weight: 5, length: 10, width: 10, height: 5 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    pub weight: u32,
    pub length: u32,
    pub width: u32,
    pub height: u32,
}

/// GoShiip's envelope. `status` is usually a boolean, though some endpoints use an HTTP-style code. `message` may be
/// missing or null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoshiipResponse {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl GoshiipResponse {
    pub fn succeeded(&self) -> bool {
        match &self.status {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_u64() == Some(200),
            Value::String(s) => s.eq_ignore_ascii_case("success"),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A rate quote request for a single carrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "toAddress")]
    pub to_address: ShippingAddress,
    #[serde(rename = "fromAddress")]
    pub from_address: ShippingAddress,
    pub items: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentBooking {
    pub redis_key: String,
    pub rate_id: String,
    pub user_id: String,
    pub platform: String,
    pub delivery_note: String,
}

/// Why a rate quote failed, in terms the storefront can show to a buyer.
#[derive(Debug, Clone, PartialEq)]
pub enum RateFailure {
    Validation(Option<Value>),
    Authentication(Option<Value>),
    RateLimited(Option<Value>),
    InvalidAddress,
    InvalidWeight,
    Provider(String),
    Other { status: Option<u16>, message: String },
}

/// Maps a failed rate request onto a [`RateFailure`]. The HTTP status takes precedence over the message in the body.
pub fn classify_rate_error(e: &GatewayApiError) -> RateFailure {
    let body = e.body().cloned();
    match e.status() {
        Some(400) => return RateFailure::Validation(body),
        Some(401) => return RateFailure::Authentication(body),
        Some(429) => return RateFailure::RateLimited(body),
        _ => {},
    }
    let rates = body.as_ref().map(|b| &b["rates"]);
    if let Some(rates) = rates.filter(|r| r["status"] == Value::Bool(false)) {
        let message = rates["message"].as_str().unwrap_or_default();
        if message.contains("Undefined array key \"distance\"") {
            return RateFailure::InvalidAddress;
        }
        if message.contains("Truq cannot service this shipment because of the weight.") {
            return RateFailure::InvalidWeight;
        }
        return RateFailure::Provider(message.to_string());
    }
    RateFailure::Other { status: e.status(), message: e.upstream_message() }
}

#[derive(Clone)]
pub struct GoshiipApi {
    client: RestClient,
}

impl GoshiipApi {
    pub fn new(config: &GoshiipConfig) -> Result<Self, GatewayApiError> {
        let client = RestClient::new(&config.base_url, Some(&config.api_key))?;
        Ok(Self { client })
    }

    pub async fn courier_partners(&self, kind: &str) -> Result<Value, GatewayApiError> {
        let params = [("type", kind)];
        self.client.rest_query::<Value, ()>(Method::GET, "/shipments/courier-partners/", &params, None).await
    }

    /// Quotes a single carrier using the [`STANDARD_PARCEL`].
    pub async fn single_rate(&self, carrier: &str, request: RateRequest) -> Result<Value, GatewayApiError> {
        let path = format!("/tariffs/getpricesingle/{}", urlencoding::encode(carrier));
        let body = json!({
            "type": request.kind,
            "toAddress": request.to_address,
            "fromAddress": request.from_address,
            "parcels": STANDARD_PARCEL,
            "items": request.items,
        });
        debug!("🚚️ Requesting a {} rate from {carrier}", request.kind);
        self.client.rest_query(Method::POST, &path, &[], Some(body)).await
    }

    pub async fn book_shipment(&self, booking: ShipmentBooking) -> Result<GoshiipResponse, GatewayApiError> {
        debug!("🚚️ Booking shipment for rate {}", booking.rate_id);
        self.client.rest_query(Method::POST, "/bookshipment", &[], Some(booking)).await
    }

    /// Triggers carrier assignment. The HTTP status is returned alongside the body, since only a 200 means the
    /// assignment went through.
    pub async fn assign_shipment(&self, shipment_id: &str) -> Result<(u16, GoshiipResponse), GatewayApiError> {
        let body = json!({ "shipment_id": shipment_id });
        debug!("🚚️ Assigning shipment {shipment_id}");
        self.client.rest_query_with_status(Method::POST, "/shipment/assign", &[], Some(body)).await
    }

    pub async fn track_shipment(&self, reference: &str) -> Result<GoshiipResponse, GatewayApiError> {
        let path = format!("/shipment/track/{}", urlencoding::encode(reference));
        self.client.rest_query::<GoshiipResponse, ()>(Method::GET, &path, &[], None).await
    }

    pub async fn all_shipments(&self, status: Option<&str>) -> Result<GoshiipResponse, GatewayApiError> {
        let params = status.map(|s| vec![("status", s)]).unwrap_or_default();
        self.client.rest_query::<GoshiipResponse, ()>(Method::GET, "/user/allorders", &params, None).await
    }

    pub async fn cancel_shipment(&self, reference: &str) -> Result<GoshiipResponse, GatewayApiError> {
        let path = format!("/shipment/cancel/{}", urlencoding::encode(reference));
        info!("🚚️ Cancelling shipment {reference}");
        self.client.rest_query::<GoshiipResponse, ()>(Method::GET, &path, &[], None).await
    }

    /// The id of the account that owns the API key. Bookings must name it as `user_id`.
    pub async fn my_profile(&self) -> Result<String, GatewayApiError> {
        let profile = self.client.rest_query::<GoshiipResponse, ()>(Method::GET, "/user/myprofile", &[], None).await?;
        value_as_string(&profile.data["id"])
            .ok_or_else(|| GatewayApiError::JsonError("The profile response did not contain an id".into()))
    }
}

/// GoShiip is inconsistent about whether ids are strings or numbers.
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
