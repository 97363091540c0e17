use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::Duration;
use marketplace_engine::{db_types::Role, AccountApi};

use super::{
    helpers::{auth_config, send, token, user},
    mocks::MockDatabase,
};
use crate::{
    auth::{JwtClaims, TokenIssuer},
    routes::{accounts::MyProfileRoute, health, index},
};

fn configure(db: MockDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(index)
            .service(health)
            .service(MyProfileRoute::<MockDatabase>::new())
            .app_data(web::Data::new(AccountApi::new(db)));
    }
}

#[actix_web::test]
async fn health_and_index_are_public() {
    let (status, body) = send(TestRequest::get().uri("/health"), configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
    let (status, body) = send(TestRequest::get().uri("/"), configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "API is running...");
}

#[actix_web::test]
async fn profile_with_a_valid_token() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_id().withf(|id| *id == 1).returning(|id| Ok(Some(user(id))));
    let req = TestRequest::get()
        .uri("/userProfile/profile")
        .insert_header(("Authorization", format!("Bearer {}", token(1, "ada1@example.com", Role::User))));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "ada1");
}

#[actix_web::test]
async fn expired_token() {
    let claims = JwtClaims::new(1, "ada1@example.com", Role::User);
    let expired = TokenIssuer::new(&auth_config()).issue_token_with_lifetime(claims, Duration::hours(-1)).unwrap();
    let req = TestRequest::get()
        .uri("/userProfile/profile")
        .insert_header(("Authorization", format!("Bearer {expired}")));
    let (status, body) = send(req, configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, token failed");
}

#[actix_web::test]
async fn admin_tokens_cannot_use_user_routes() {
    let req = TestRequest::get()
        .uri("/userProfile/profile")
        .insert_header(("Authorization", format!("Bearer {}", token(9, "root@example.com", Role::Admin))));
    let (status, body) = send(req, configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Insufficient permissions");
}

#[actix_web::test]
async fn non_bearer_schemes_are_ignored() {
    let req = TestRequest::get().uri("/userProfile/profile").insert_header(("Authorization", "Basic YWRhOmh1bnRlcjI="));
    let (status, body) = send(req, configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, no token");
}
