use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use gateway_tools::GatewayApiError;
use log::error;
use marketplace_engine::{AccountApiError, CheckoutError, NotificationApiError, OrderApiError, ProductApiError};
use serde_json::Value;
use thiserror::Error;

use crate::data_objects::JsonResponse;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("{0}")]
    AuthenticationError(#[from] AuthError),
    #[error("{0}")]
    NoRecordFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InsufficientPermissions(String),
    /// A failure with an explicit status code, usually relayed from a third-party API.
    #[error("{message}")]
    RequestFailed { status: u16, message: String, detail: Option<Value> },
}

impl ServerError {
    pub fn failed<S: Into<String>>(status: u16, message: S) -> Self {
        Self::RequestFailed { status, message: message.into(), detail: None }
    }

    pub fn failed_with_detail<S: Into<String>>(status: u16, message: S, detail: Option<Value>) -> Self {
        Self::RequestFailed { status, message: message.into(), detail }
    }

    /// The message shown to the caller. Backend failures are logged but never described.
    pub fn public_message(&self) -> String {
        match self {
            Self::InitializeError(_) | Self::BackendError(_) | Self::IOError(_) | Self::ConfigurationError(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            },
            e => e.to_string(),
        }
    }

    fn detail(&self) -> Option<Value> {
        match self {
            Self::RequestFailed { detail, .. } => detail.clone(),
            _ => None,
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
                AuthError::CouldNotIssueToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::RequestFailed { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        HttpResponse::build(status).json(JsonResponse::failure(self.public_message(), self.detail()))
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Not authorized, no token")]
    MissingToken,
    #[error("Not authorized, token failed")]
    InvalidToken(String),
    #[error("Insufficient permissions")]
    InsufficientPermissions,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Could not issue an access token. {0}")]
    CouldNotIssueToken(String),
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            AccountApiError::PasswordError(e) => Self::BackendError(e.to_string()),
            AccountApiError::Validation(msg) => Self::ValidationError(msg),
            AccountApiError::EmailAlreadyExists(_) => Self::Conflict(e.to_string()),
            AccountApiError::UserNotFound | AccountApiError::SellerNotFound => Self::NoRecordFound(e.to_string()),
            AccountApiError::InvalidCredentials => Self::AuthenticationError(AuthError::InvalidCredentials),
            AccountApiError::InvalidResetToken | AccountApiError::IncompleteBankDetails => {
                Self::ValidationError(e.to_string())
            },
        }
    }
}

impl From<ProductApiError> for ServerError {
    fn from(e: ProductApiError) -> Self {
        match e {
            ProductApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            ProductApiError::ProductNotFound(_) | ProductApiError::UploaderNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            ProductApiError::NotOwner | ProductApiError::IncompleteProfile | ProductApiError::UnverifiedBankDetails => {
                Self::InsufficientPermissions(e.to_string())
            },
            ProductApiError::Validation(msg) => Self::ValidationError(msg),
            ProductApiError::InvalidStatus => Self::ValidationError(e.to_string()),
        }
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            OrderApiError::Validation(msg) => Self::ValidationError(msg),
            OrderApiError::ProductUnavailable(_) => Self::ValidationError(e.to_string()),
            OrderApiError::OrderNotFound(_)
            | OrderApiError::ProductNotFound(_)
            | OrderApiError::TransactionNotFound
            | OrderApiError::NoTransactions => Self::NoRecordFound(e.to_string()),
        }
    }
}

impl From<NotificationApiError> for ServerError {
    fn from(e: NotificationApiError) -> Self {
        match e {
            NotificationApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            NotificationApiError::Validation(msg) => Self::ValidationError(msg),
            NotificationApiError::NotificationNotFound(_) | NotificationApiError::RecipientNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
        }
    }
}

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        let message = e.to_string();
        match e {
            CheckoutError::PaymentVerification(p)
            | CheckoutError::BookingError(p)
            | CheckoutError::AssignmentError(p) => {
                Self::failed_with_detail(500, message, p.detail.or(Some(Value::String(p.message))))
            },
            CheckoutError::PaymentNotSuccessful(status) => {
                Self::failed_with_detail(400, message, Some(Value::String(status)))
            },
            CheckoutError::MissingMetadata(_) | CheckoutError::BookingRejected(_) => Self::failed(400, message),
            CheckoutError::OrderNotFound(_) => Self::NoRecordFound(message),
            CheckoutError::BookingInProgress(_) => Self::failed(409, message),
            CheckoutError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

/// Relays a third-party failure. The upstream status and body are passed on when there was a response; transport
/// and decoding failures become a 502.
impl From<GatewayApiError> for ServerError {
    fn from(e: GatewayApiError) -> Self {
        match e.status() {
            Some(status) => Self::failed_with_detail(status, e.upstream_message(), e.body().cloned()),
            None => Self::failed(502, e.to_string()),
        }
    }
}
