//! Request checks that belong to the HTTP layer rather than to the engine.
use gateway_tools::goshiip::{RateRequest, ShippingAddress};
use log::error;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::ServerError;

pub const PHONE_PATTERN: &str = r"^0\d{10}$";
pub const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$";

fn is_match(pattern: &str, value: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(value),
        Err(e) => {
            error!("💻️ Invalid validation pattern {pattern}. {e}");
            false
        },
    }
}

/// Nigerian mobile numbers: 11 digits starting with 0.
pub fn is_valid_phone(phone: &str) -> bool {
    is_match(PHONE_PATTERN, phone)
}

pub fn is_valid_email(email: &str) -> bool {
    is_match(EMAIL_PATTERN, email)
}

pub fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true)
}

/// A rate quote request as the storefront sends it. `parcels` is required but ignored, since every quote uses the
/// standard parcel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateQuoteRequest {
    pub carrier_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub to_address: Option<ShippingAddress>,
    pub from_address: Option<ShippingAddress>,
    pub parcels: Option<Value>,
    pub items: Option<Value>,
}

impl RateQuoteRequest {
    /// Checks the request and splits it into the carrier name and the body for the logistics provider.
    pub fn validate(self) -> Result<(String, RateRequest), ServerError> {
        let missing = || ServerError::ValidationError("Missing required fields".into());
        let carrier = self.carrier_name.filter(|s| !s.trim().is_empty()).ok_or_else(missing)?;
        let kind = self.kind.filter(|s| !s.trim().is_empty()).ok_or_else(missing)?;
        let (to_address, from_address) = match (self.to_address, self.from_address) {
            (Some(to), Some(from)) => (to, from),
            _ => return Err(missing()),
        };
        let items = match (self.parcels, self.items) {
            (Some(p), Some(items)) if !p.is_null() && !items.is_null() => items,
            _ => return Err(missing()),
        };
        if is_blank(&to_address.name) {
            return Err(ServerError::ValidationError("Name is required.".into()));
        }
        if !to_address.phone.as_deref().map(is_valid_phone).unwrap_or(false) {
            return Err(ServerError::ValidationError(
                "Invalid phone number. Please enter 11 digits starting with 0.".into(),
            ));
        }
        if !to_address.email.as_deref().map(is_valid_email).unwrap_or(false) {
            return Err(ServerError::ValidationError("Invalid email address".into()));
        }
        if is_blank(&to_address.address) {
            return Err(ServerError::ValidationError("Address is required.".into()));
        }
        Ok((carrier, RateRequest { kind, to_address, from_address, items }))
    }
}
