//! Signed image uploads to Cloudinary.
use chrono::Utc;
use log::*;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{CloudinaryConfig, GatewayApiError, RestClient};

/// Every upload lands in this folder.
pub const UPLOAD_FOLDER: &str = "marketplace";

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResult {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub bytes: u64,
}

#[derive(Clone)]
pub struct CloudinaryApi {
    config: CloudinaryConfig,
    client: RestClient,
}

impl CloudinaryApi {
    pub fn new(config: CloudinaryConfig) -> Result<Self, GatewayApiError> {
        let client = RestClient::new(&config.base_url, None)?;
        Ok(Self { config, client })
    }

    /// Uploads an image and returns its HTTPS URL.
    pub async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String, GatewayApiError> {
        if bytes.is_empty() {
            return Err(GatewayApiError::InvalidRequest("The image is empty".into()));
        }
        let timestamp = Utc::now().timestamp().to_string();
        let params = [("folder", UPLOAD_FOLDER), ("timestamp", timestamp.as_str())];
        let signature = sign_params(&params, self.config.api_secret.reveal());
        let file = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("folder", UPLOAD_FOLDER)
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        let path = format!("/{}/image/upload", self.config.cloud_name);
        let result = self.client.post_multipart::<UploadResult>(&path, form).await?;
        info!("🖼️ Uploaded {filename} as {} ({} bytes)", result.public_id, result.bytes);
        Ok(result.secure_url)
    }
}

/// Cloudinary's request signature: the parameters sorted by name and joined as a query string, followed by the API
/// secret, hashed with SHA-256.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
