use log::*;
use mkt_common::Secret;

const DEFAULT_PAYSTACK_URL: &str = "https://api.paystack.co";
const DEFAULT_GOSHIIP_URL: &str = "https://delivery-staging.apiideraos.com/api/v2/token";
const DEFAULT_CLOUDINARY_URL: &str = "https://api.cloudinary.com/v1_1";

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| {
        debug!("🪛️ {var} not set, using {default}");
        default.to_string()
    })
}

fn secret_from_env(var: &str) -> Secret<String> {
    Secret::new(std::env::var(var).unwrap_or_else(|_| {
        warn!("🪛️ {var} is not set. Calls that need it will fail.");
        String::default()
    }))
}

#[derive(Debug, Clone, Default)]
pub struct PaystackConfig {
    pub base_url: String,
    pub secret_key: Secret<String>,
}

impl PaystackConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = env_or("PAYSTACK_BASE_URL", DEFAULT_PAYSTACK_URL);
        let secret_key = secret_from_env("PAYSTACK_SECRET_KEY");
        Self { base_url, secret_key }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoshiipConfig {
    pub base_url: String,
    pub api_key: Secret<String>,
    /// The marketplace's own account id on GoShiip. Bookings are made on its behalf.
    pub platform_user_id: String,
}

impl GoshiipConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = env_or("GOSHIIP_BASE_URL", DEFAULT_GOSHIIP_URL);
        let api_key = secret_from_env("GOSHIIP_API_KEY");
        let platform_user_id = std::env::var("GOSHIP_USER_ID").unwrap_or_else(|_| {
            warn!(
                "🪛️ GOSHIP_USER_ID is not set. Shipments cannot be booked. Run `mkttools goshiip-user-id` to look \
                 it up."
            );
            String::default()
        });
        Self { base_url, api_key, platform_user_id }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CloudinaryConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: Secret<String>,
}

impl CloudinaryConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = env_or("CLOUDINARY_BASE_URL", DEFAULT_CLOUDINARY_URL);
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_else(|_| {
            warn!("🪛️ CLOUDINARY_CLOUD_NAME is not set. Image uploads will fail.");
            String::default()
        });
        let api_key = std::env::var("CLOUDINARY_API_KEY").unwrap_or_else(|_| {
            warn!("🪛️ CLOUDINARY_API_KEY is not set. Image uploads will fail.");
            String::default()
        });
        let api_secret = secret_from_env("CLOUDINARY_API_SECRET");
        Self { base_url, cloud_name, api_key, api_secret }
    }
}
