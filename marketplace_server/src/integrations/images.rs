use gateway_tools::{CloudinaryApi, GatewayApiError};

/// Somewhere to put uploaded pictures. Returns the public URL of the stored image.
#[allow(async_fn_in_trait)]
pub trait ImageStore {
    async fn store_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String, GatewayApiError>;
}

impl ImageStore for CloudinaryApi {
    async fn store_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String, GatewayApiError> {
        self.upload_image(bytes, filename).await
    }
}
