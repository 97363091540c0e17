use gateway_tools::{
    goshiip::{value_as_string, ShipmentBooking},
    GoshiipApi,
};
use marketplace_engine::{
    traits::{AssignOutcome, BookingOutcome, BookingRequest},
    LogisticsProvider,
    ProviderError,
};

use super::provider_error;

#[derive(Clone)]
pub struct GoshiipLogistics {
    api: GoshiipApi,
}

impl GoshiipLogistics {
    pub fn new(api: GoshiipApi) -> Self {
        Self { api }
    }
}

impl LogisticsProvider for GoshiipLogistics {
    async fn book_shipment(&self, request: BookingRequest) -> Result<BookingOutcome, ProviderError> {
        let booking = ShipmentBooking {
            redis_key: request.redis_key,
            rate_id: request.rate_id,
            user_id: request.user_id,
            platform: request.platform,
            delivery_note: request.delivery_note,
        };
        let response = self.api.book_shipment(booking).await.map_err(provider_error)?;
        Ok(BookingOutcome {
            accepted: response.succeeded(),
            shipment_id: value_as_string(&response.data["shipmentId"]),
            reference: value_as_string(&response.data["reference"]),
            message: response.message.unwrap_or_default(),
        })
    }

    async fn assign_shipment(&self, shipment_id: &str) -> Result<AssignOutcome, ProviderError> {
        let (http_status, response) = self.api.assign_shipment(shipment_id).await.map_err(provider_error)?;
        Ok(AssignOutcome { http_status, message: response.message.unwrap_or_default() })
    }
}
