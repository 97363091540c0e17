use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String, body: Option<Value> },
    #[error("The provider reported a failure: {0}")]
    Rejected(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayApiError {
    /// The upstream HTTP status, if the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayApiError::QueryError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The upstream JSON error body, if there was one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            GatewayApiError::QueryError { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// The best human-readable message available: the `message` field of the upstream body, else the error itself.
    pub fn upstream_message(&self) -> String {
        self.body()
            .and_then(|b| b["message"].as_str())
            .map(String::from)
            .unwrap_or_else(|| match self {
                GatewayApiError::QueryError { message, .. } => message.clone(),
                e => e.to_string(),
            })
    }
}
