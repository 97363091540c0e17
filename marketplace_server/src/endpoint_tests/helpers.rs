use std::sync::Arc;

use actix_web::{
    body::to_bytes,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::{Duration, TimeZone, Utc};
use log::debug;
use marketplace_engine::{
    db_types::{
        Admin,
        Kobo,
        Notification,
        Order,
        OrderStatusType,
        Product,
        ProductStatus,
        ProductTag,
        Role,
        Transaction,
        User,
    },
    helpers::hash_password,
};
use mkt_common::Secret;
use serde_json::Value;
use sqlx::types::Json;

use crate::{
    auth::{JwtClaims, TokenIssuer, TokenVerifier},
    config::{AuthConfig, ServerOptions},
    middleware::JwtAuthMiddlewareFactory,
};

pub const PASSWORD: &str = "correct horse battery staple";
pub const BOUNDARY: &str = "----marketplace-test-boundary";

// Token secrets for the endpoint tests. DO NOT re-use these anywhere.
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        user_token_secret: Secret::new("endpoint-tests-user-secret".to_string()),
        admin_token_secret: Secret::new("endpoint-tests-admin-secret".to_string()),
        token_lifetime: Duration::hours(1),
    }
}

pub fn token(id: i64, email: &str, role: Role) -> String {
    TokenIssuer::new(&auth_config()).issue_token(JwtClaims::new(id, email, role)).expect("Failed to sign token")
}

pub fn bearer(id: i64, email: &str, role: Role) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token(id, email, role)))
}

/// Runs `req` through an app holding the routes registered by `configure`, behind the JWT middleware. Returns the
/// status and the body, as JSON if it parses, otherwise as a string.
pub async fn send<F>(req: TestRequest, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    let _ = env_logger::try_init();
    let config = auth_config();
    let app = App::new()
        .wrap(JwtAuthMiddlewareFactory::new(Arc::new(TokenVerifier::new(&config))))
        .app_data(web::Data::new(TokenIssuer::new(&config)))
        .app_data(web::Data::new(ServerOptions::default()))
        .configure(configure);
    let service = test::init_service(app).await;
    let (status, bytes) = match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => (res.status(), test::read_body(res).await),
        Err(e) => {
            let res = e.error_response();
            (res.status(), to_bytes(res.into_body()).await.expect("Failed to read error body"))
        },
    };
    debug!("Response: {status} {}", String::from_utf8_lossy(&bytes));
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()));
    (status, body)
}

/// A `multipart/form-data` body with the given text fields and an optional `(field, filename, bytes)` file.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> (&'static str, String) {
    ("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}"))
}

//--------------------------------------------   Fixtures  ----------------------------------------------------------
fn timestamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// A seller with a complete profile and verified bank details.
pub fn user(id: i64) -> User {
    User {
        id,
        full_name: "Ada Obi".into(),
        username: format!("ada{id}"),
        email: format!("ada{id}@example.com"),
        password_hash: hash_password(PASSWORD).expect("Failed to hash password"),
        bio: Some("I sell things".into()),
        profile_picture: None,
        address: Some("12 Allen Avenue".into()),
        phone_number: Some("08030000000".into()),
        city: Some("Ikeja".into()),
        state: Some("Lagos".into()),
        country: Some("Nigeria".into()),
        account_name: Some("Ada Obi".into()),
        bank_name: Some("Access Bank".into()),
        account_number: Some("0123456789".into()),
        is_verified: true,
        reset_password_token: None,
        reset_password_expires: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

/// A user who has only registered.
pub fn new_user(id: i64) -> User {
    User {
        bio: None,
        address: None,
        phone_number: None,
        city: None,
        state: None,
        country: None,
        account_name: None,
        bank_name: None,
        account_number: None,
        is_verified: false,
        ..user(id)
    }
}

pub fn admin(id: i64) -> Admin {
    Admin {
        id,
        email: "root@example.com".into(),
        password_hash: hash_password(PASSWORD).expect("Failed to hash password"),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn product(id: i64, uploader_id: i64, status: ProductStatus) -> Product {
    Product {
        id,
        title: "Standing fan".into(),
        description: "16 inch, barely used".into(),
        category: "Household-Items".into(),
        price: Some(Kobo::from(2_500_000)),
        price_category: Some("Negotiable".into()),
        images: Json(vec!["https://img.example.com/fan.jpg".to_string()]),
        primary_image: Some("https://img.example.com/fan.jpg".into()),
        image: None,
        location: "Yaba".into(),
        tag: ProductTag::ForSale,
        availability: true,
        status,
        video_url: Some("https://img.example.com/fan.mp4".into()),
        specification: "Binatone".into(),
        condition: "Used".into(),
        uploader_id,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn order(id: i64, user_id: i64, product_id: i64) -> Order {
    Order {
        id,
        user_id,
        product_id: Some(product_id),
        quantity: 1,
        amount: Kobo::from(2_500_000),
        status: OrderStatusType::Pending,
        transaction_reference: None,
        shipment_reference: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn transaction(id: i64, reference: &str, order_id: Option<i64>) -> Transaction {
    Transaction {
        id,
        transaction_id: format!("40{id}"),
        reference: reference.into(),
        amount: Kobo::from(2_500_000),
        order_id,
        currency: "NGN".into(),
        status: "success".into(),
        customer_email: "ada1@example.com".into(),
        payment_method: "card".into(),
        paid_at: timestamp(),
        gateway_response: Some("Approved".into()),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn notification(id: i64, user_id: i64, message: &str) -> Notification {
    Notification { id, user_id, message: message.into(), is_read: false, created_at: timestamp() }
}
