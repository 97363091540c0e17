//! GoShiip relays: couriers, rate quotes, tracking and shipment management.
use actix_web::{web, HttpResponse};
use gateway_tools::{
    goshiip::{classify_rate_error, RateFailure},
    GatewayApiError,
    GoshiipApi,
};
use log::*;
use serde_json::json;

use crate::{
    data_objects::{CourierQuery, JsonResponse, ShipmentStatusQuery},
    errors::ServerError,
    route,
    validation::RateQuoteRequest,
};

/// Turns a failed rate quote into the error the storefront shows the buyer.
pub fn rate_error(e: &GatewayApiError) -> ServerError {
    match classify_rate_error(e) {
        RateFailure::Validation(detail) => ServerError::failed_with_detail(400, "Validation error", detail),
        RateFailure::Authentication(detail) => ServerError::failed_with_detail(401, "Authentication error", detail),
        RateFailure::RateLimited(detail) => ServerError::failed_with_detail(429, "Rate limit exceeded", detail),
        RateFailure::InvalidAddress => ServerError::failed(400, "Invalid address. Please enter a valid address."),
        RateFailure::InvalidWeight => ServerError::failed(
            400,
            "Invalid shipment weight. Truq cannot service this shipment because of the weight.",
        ),
        RateFailure::Provider(message) => {
            ServerError::failed_with_detail(400, format!("Goshiip API error {message}"), Some(json!(message)))
        },
        RateFailure::Other { status, message } => {
            ServerError::failed(status.unwrap_or(500), format!("Failed to fetch couriers {message}"))
        },
    }
}

route!(couriers => Get "/couriers");
pub async fn couriers(
    query: web::Query<CourierQuery>,
    goshiip: web::Data<GoshiipApi>,
) -> Result<HttpResponse, ServerError> {
    let kind = query
        .into_inner()
        .kind
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ServerError::ValidationError("Type query parameter is required.".into()))?;
    let partners = goshiip.courier_partners(kind.trim()).await.map_err(|e| {
        error!("🚚️ Error fetching {kind} couriers. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(partners))
}

route!(rates => Post "/rates");
pub async fn rates(
    body: web::Json<RateQuoteRequest>,
    goshiip: web::Data<GoshiipApi>,
) -> Result<HttpResponse, ServerError> {
    let (carrier, request) = body.into_inner().validate()?;
    let quote = goshiip.single_rate(&carrier, request).await.map_err(|e| {
        warn!("🚚️ Rate quote from {carrier} failed. {e}");
        rate_error(&e)
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Rates fetched successfully", quote)))
}

route!(track_shipment => Get "/track-shipment/{reference}");
pub async fn track_shipment(
    path: web::Path<String>,
    goshiip: web::Data<GoshiipApi>,
) -> Result<HttpResponse, ServerError> {
    let reference = path.into_inner();
    let response = goshiip.track_shipment(&reference).await.map_err(|e| {
        error!("🚚️ Error tracking shipment {reference}. {e}");
        ServerError::failed_with_detail(e.status().unwrap_or(500), "Error tracking shipment", e.body().cloned())
    })?;
    if !response.succeeded() {
        let message = response.message.unwrap_or_else(|| format!("Shipment {reference} was not found"));
        debug!("🚚️ GoShiip does not know shipment {reference}: {message}");
        return Err(ServerError::failed(404, message));
    }
    let message = response.message.unwrap_or_else(|| "Shipment tracked successfully".into());
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(message, response.data)))
}

route!(shipments => Get "/shipments");
pub async fn shipments(
    query: web::Query<ShipmentStatusQuery>,
    goshiip: web::Data<GoshiipApi>,
) -> Result<HttpResponse, ServerError> {
    let status = query.into_inner().status.filter(|s| !s.trim().is_empty());
    let response = goshiip.all_shipments(status.as_deref()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Shipments fetched successfully", response.data)))
}

route!(cancel_shipment => Get "/shipments/cancel/{reference}");
pub async fn cancel_shipment(
    path: web::Path<String>,
    goshiip: web::Data<GoshiipApi>,
) -> Result<HttpResponse, ServerError> {
    let reference = path.into_inner();
    if reference.trim().is_empty() {
        return Err(ServerError::ValidationError("Shipment reference is required".into()));
    }
    let response = goshiip.cancel_shipment(reference.trim()).await?;
    info!("🚚️ Shipment {reference} canceled");
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Shipment canceled successfully", response.data)))
}
