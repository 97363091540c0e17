use std::env;

use chrono::Duration;
use gateway_tools::{CloudinaryConfig, GoshiipConfig, PaystackConfig};
use log::*;
use mkt_common::{
    helpers::{parse_boolean_flag, split_csv},
    Secret,
};
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::errors::ServerError;

const DEFAULT_MKT_HOST: &str = "127.0.0.1";
const DEFAULT_MKT_PORT: u16 = 5000;
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::days(30);
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_EMAIL_PORT: u16 = 587;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub email: EmailConfig,
    pub paystack: PaystackConfig,
    pub goshiip: GoshiipConfig,
    pub cloudinary: CloudinaryConfig,
    /// Origins allowed to make cross-origin requests. `*` allows any origin. An empty list allows none.
    pub cors_origins: Vec<String>,
    /// Base URL of the storefront. Password reset links point here.
    pub frontend_url: String,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address.
    pub use_forwarded: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MKT_HOST.to_string(),
            port: DEFAULT_MKT_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            email: EmailConfig::default(),
            paystack: PaystackConfig::default(),
            goshiip: GoshiipConfig::default(),
            cloudinary: CloudinaryConfig::default(),
            cors_origins: Vec::new(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            use_x_forwarded_for: false,
            use_forwarded: false,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("MKT_HOST").ok().unwrap_or_else(|| DEFAULT_MKT_HOST.into());
        let port = env::var("MKT_PORT")
            .or_else(|_| env::var("PORT"))
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MKT_PORT. {e} Using the default, {DEFAULT_MKT_PORT}, instead."
                    );
                    DEFAULT_MKT_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MKT_PORT);
        let database_url = marketplace_engine::sqlite::db::db_url();
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let cors_origins = env::var("CORS_ORIGINS").map(|s| split_csv(&s)).unwrap_or_else(|_| {
            info!("🪛️ CORS_ORIGINS is not set. Cross-origin requests will be refused.");
            Vec::new()
        });
        let frontend_url = env::var("FRONTEND_URL_PRODUCTION").unwrap_or_else(|_| {
            warn!("🪛️ FRONTEND_URL_PRODUCTION is not set. Password reset links will point to {DEFAULT_FRONTEND_URL}.");
            DEFAULT_FRONTEND_URL.to_string()
        });
        let use_x_forwarded_for = parse_boolean_flag(env::var("MKT_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("MKT_USE_FORWARDED").ok(), false);
        Self {
            host,
            port,
            database_url,
            auth,
            email: EmailConfig::from_env_or_default(),
            paystack: PaystackConfig::new_from_env_or_default(),
            goshiip: GoshiipConfig::new_from_env_or_default(),
            cloudinary: CloudinaryConfig::new_from_env_or_default(),
            cors_origins,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
            use_x_forwarded_for,
            use_forwarded,
        }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HMAC key for tokens issued to marketplace users.
    pub user_token_secret: Secret<String>,
    /// HMAC key for tokens issued to admins. It must differ from the user key, since the key that validates a token
    /// decides its role.
    pub admin_token_secret: Secret<String>,
    pub token_lifetime: Duration,
}

fn random_secret() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect()
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT signing keys have not been set. I'm using random values for this session. DO NOT operate \
             in production like this, since every token will be invalidated when the server restarts. 🚨️🚨️🚨️"
        );
        Self {
            user_token_secret: Secret::new(random_secret()),
            admin_token_secret: Secret::new(random_secret()),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
        }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let user = env::var("TOKEN_SECRET_KEY")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [TOKEN_SECRET_KEY]")))?;
        let admin = env::var("ADMIN_TOKEN_SECRET_KEY")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [ADMIN_TOKEN_SECRET_KEY]")))?;
        if user.is_empty() || admin.is_empty() {
            return Err(ServerError::ConfigurationError("The token secrets may not be empty".into()));
        }
        if user == admin {
            return Err(ServerError::ConfigurationError(
                "TOKEN_SECRET_KEY and ADMIN_TOKEN_SECRET_KEY must be different".into(),
            ));
        }
        let token_lifetime = env::var("MKT_TOKEN_LIFETIME_DAYS")
            .ok()
            .and_then(|s| parse_token_lifetime(&s))
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);
        Ok(Self {
            user_token_secret: Secret::new(user),
            admin_token_secret: Secret::new(admin),
            token_lifetime,
        })
    }
}

/// Parses a token lifetime given in days. Anything that is not a positive number of days chrono can represent is
/// rejected with a warning.
fn parse_token_lifetime(s: &str) -> Option<Duration> {
    let days = s
        .trim()
        .parse::<i64>()
        .map_err(|e| warn!("🪛️ Invalid configuration value for MKT_TOKEN_LIFETIME_DAYS. {e}"))
        .ok()?;
    match Duration::try_days(days) {
        Some(lifetime) if days > 0 => Some(lifetime),
        _ => {
            warn!("🪛️ MKT_TOKEN_LIFETIME_DAYS is out of range ({days}). Using the default, {DEFAULT_TOKEN_LIFETIME}.");
            None
        },
    }
}

//-------------------------------------------------  EmailConfig  ------------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
}

impl EmailConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("EMAIL_HOST").unwrap_or_else(|_| {
            warn!("🪛️ EMAIL_HOST is not set. Password reset emails cannot be sent.");
            String::default()
        });
        let port = env::var("EMAIL_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().map_err(|e| warn!("🪛️ Invalid EMAIL_PORT. {e}")).ok())
            .unwrap_or(DEFAULT_EMAIL_PORT);
        let username = env::var("EMAIL_USERNAME").unwrap_or_else(|_| {
            warn!("🪛️ EMAIL_USERNAME is not set. Password reset emails cannot be sent.");
            String::default()
        });
        let password = Secret::new(env::var("EMAIL_PASSWORD").unwrap_or_default());
        Self { host, port, username, password }
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that handlers need. Secrets are excluded so that they are not passed
/// around the system.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
    pub frontend_url: String,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            use_x_forwarded_for: config.use_x_forwarded_for,
            use_forwarded: config.use_forwarded,
            frontend_url: config.frontend_url.clone(),
        }
    }

    pub fn reset_password_url(&self, token: &str) -> String {
        format!("{}/reset-password?token={token}", self.frontend_url)
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self { use_x_forwarded_for: false, use_forwarded: false, frontend_url: DEFAULT_FRONTEND_URL.to_string() }
    }
}
