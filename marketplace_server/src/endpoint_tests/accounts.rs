use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use marketplace_engine::{
    db_types::{DashboardSummary, Role},
    AccountApi,
};
use serde_json::json;

use super::{
    helpers::{admin, bearer, multipart_body, multipart_content_type, new_user, send, user, PASSWORD},
    mocks::{MockDatabase, MockImageStore, MockMailer},
};
use crate::{
    auth::TokenVerifier,
    endpoint_tests::helpers::auth_config,
    mailer::MailerError,
    routes::accounts::{
        AdminDashboardRoute,
        ForgotPasswordRoute,
        LoginRoute,
        MessageProfileRoute,
        RegisterRoute,
        UpdateMyProfileRoute,
        RESET_EMAIL_SUBJECT,
    },
};

fn configure(db: MockDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(RegisterRoute::<MockDatabase>::new())
            .service(LoginRoute::<MockDatabase>::new())
            .service(MessageProfileRoute::<MockDatabase>::new())
            .service(AdminDashboardRoute::<MockDatabase>::new())
            .app_data(web::Data::new(AccountApi::new(db)));
    }
}

#[actix_web::test]
async fn register_new_user() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_email().returning(|_| Ok(None));
    db.expect_insert_user().withf(|u| u.email == "ada@example.com" && u.password_hash != PASSWORD).returning(|u| {
        let mut user = new_user(5);
        user.email = u.email;
        Ok(user)
    });
    let req = TestRequest::post().uri("/users/register").set_json(json!({
        "fullName": "Ada Obi",
        "username": "ada",
        "email": "Ada@Example.com",
        "password": PASSWORD,
        "confirmPassword": PASSWORD
    }));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["id"], 5);
    assert!(body["data"].get("passwordHash").is_none());
}

#[actix_web::test]
async fn register_with_taken_email() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_email().returning(|_| Ok(Some(user(1))));
    db.expect_insert_user().never();
    let req = TestRequest::post().uri("/users/register").set_json(json!({
        "fullName": "Ada Obi",
        "username": "ada",
        "email": "ada1@example.com",
        "password": PASSWORD,
        "confirmPassword": PASSWORD
    }));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["ok"], false);
}

#[actix_web::test]
async fn login_issues_a_user_token() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_email().withf(|e| e == "ada1@example.com").returning(|_| Ok(Some(user(1))));
    let req = TestRequest::post()
        .uri("/users/login")
        .set_json(json!({"email": " ADA1@example.com", "password": PASSWORD}));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    let token = body["data"]["token"].as_str().expect("No token in response");
    let claims = TokenVerifier::new(&auth_config()).verify(token).expect("Token did not verify");
    assert_eq!(claims.id, 1);
    assert_eq!(claims.role, Role::User);
}

#[actix_web::test]
async fn login_needs_email_and_password() {
    let req = TestRequest::post().uri("/users/login").set_json(json!({"email": "ada1@example.com"}));
    let (status, body) = send(req, configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide email and password");
}

#[actix_web::test]
async fn login_with_wrong_password() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_email().returning(|_| Ok(Some(user(1))));
    let req =
        TestRequest::post().uri("/users/login").set_json(json!({"email": "ada1@example.com", "password": "hunter2"}));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[actix_web::test]
async fn message_profile_needs_a_username() {
    let req = TestRequest::get().uri("/users/message-profile");
    let (status, body) = send(req, configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "'username' is required");
}

#[actix_web::test]
async fn dashboard_is_for_admins_only() {
    let req = TestRequest::get()
        .uri("/adminDashboard/dashboard")
        .insert_header(bearer(1, "ada1@example.com", Role::User));
    let (status, body) = send(req, configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Insufficient permissions");

    let req = TestRequest::get().uri("/adminDashboard/dashboard");
    let (status, body) = send(req, configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, no token");
}

#[actix_web::test]
async fn admin_dashboard() {
    let mut db = MockDatabase::new();
    db.expect_fetch_admin_by_id().withf(|id| *id == 9).returning(|id| Ok(Some(admin(id))));
    db.expect_fetch_dashboard_summary().returning(|| {
        Ok(DashboardSummary { users: 12, pending_products: 3, orders: 7, unread_notifications: 2 })
    });
    let req = TestRequest::get()
        .uri("/adminDashboard/dashboard")
        .insert_header(bearer(9, "root@example.com", Role::Admin));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome root@example.com, this is your dashboard");
    assert_eq!(body["data"]["summary"]["pendingProducts"], 3);
}

#[actix_web::test]
async fn forgot_password_sends_a_reset_link() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_email().returning(|_| Ok(Some(user(1))));
    db.expect_set_reset_token().times(1).returning(|_, _, _| Ok(()));
    let mut mailer = MockMailer::new();
    mailer
        .expect_send_email()
        .withf(|to, subject, body| {
            to == "ada1@example.com" && subject == RESET_EMAIL_SUBJECT && body.contains("/reset-password?token=")
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let req = TestRequest::post().uri("/users/forgot-password").set_json(json!({"email": "ada1@example.com"}));
    let (status, _) = send(req, move |cfg| {
        cfg.service(ForgotPasswordRoute::<MockDatabase, MockMailer>::new())
            .app_data(web::Data::new(AccountApi::new(db)))
            .app_data(web::Data::new(mailer));
    })
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn forgot_password_when_mail_fails() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_email().returning(|_| Ok(Some(user(1))));
    db.expect_set_reset_token().returning(|_, _, _| Ok(()));
    let mut mailer = MockMailer::new();
    mailer.expect_send_email().returning(|_, _, _| Err(MailerError::NotConfigured));
    let req = TestRequest::post().uri("/users/forgot-password").set_json(json!({"email": "ada1@example.com"}));
    let (status, body) = send(req, move |cfg| {
        cfg.service(ForgotPasswordRoute::<MockDatabase, MockMailer>::new())
            .app_data(web::Data::new(AccountApi::new(db)))
            .app_data(web::Data::new(mailer));
    })
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error sending email. Please try again.");
}

#[actix_web::test]
async fn update_profile_with_picture() {
    let mut db = MockDatabase::new();
    db.expect_update_user_profile()
        .withf(|id, update| {
            *id == 1 &&
                update.city.as_deref() == Some("Abuja") &&
                update.profile_picture.as_deref() == Some("https://img.example.com/ada.png")
        })
        .returning(|id, update| {
            let mut user = user(id);
            user.city = update.city;
            user.profile_picture = update.profile_picture;
            Ok(Some(user))
        });
    let mut images = MockImageStore::new();
    images
        .expect_store_image()
        .withf(|bytes, filename| bytes == b"PNGDATA" && filename == "ada.png")
        .returning(|_, _| Ok("https://img.example.com/ada.png".to_string()));
    let body = multipart_body(
        &[("fullName", "Ada Obi"), ("username", "ada1"), ("city", "Abuja")],
        Some(("profilePicture", "ada.png", &b"PNGDATA"[..])),
    );
    let req = TestRequest::put()
        .uri("/userProfile/profile")
        .insert_header(bearer(1, "ada1@example.com", Role::User))
        .insert_header(multipart_content_type())
        .set_payload(body);
    let (status, body) = send(req, move |cfg| {
        cfg.service(UpdateMyProfileRoute::<MockDatabase, MockImageStore>::new())
            .app_data(web::Data::new(AccountApi::new(db)))
            .app_data(web::Data::new(images));
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "Abuja");
    assert_eq!(body["data"]["profilePicture"], "https://img.example.com/ada.png");
}
