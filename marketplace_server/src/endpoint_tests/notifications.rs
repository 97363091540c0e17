use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use marketplace_engine::{db_types::Role, NotificationApi};
use serde_json::json;

use super::{
    helpers::{bearer, notification, send, user},
    mocks::MockDatabase,
};
use crate::routes::notifications::{
    AdminNotificationsRoute,
    CreateNotificationRoute,
    MarkMyNotificationReadRoute,
    MarkMyNotificationsReadRoute,
    MyNotificationsRoute,
};

fn configure(db: MockDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(MyNotificationsRoute::<MockDatabase>::new())
            .service(MarkMyNotificationsReadRoute::<MockDatabase>::new())
            .service(CreateNotificationRoute::<MockDatabase>::new())
            .service(MarkMyNotificationReadRoute::<MockDatabase>::new())
            .service(AdminNotificationsRoute::<MockDatabase>::new())
            .app_data(web::Data::new(NotificationApi::new(db)));
    }
}

#[actix_web::test]
async fn list_my_notifications() {
    let mut db = MockDatabase::new();
    db.expect_fetch_notifications_for_user()
        .withf(|id| *id == 1)
        .returning(|id| Ok(vec![notification(2, id, "Your fan sold"), notification(1, id, "Welcome")]));
    let req = TestRequest::get().uri("/notify/notifications").insert_header(bearer(1, "ada1@example.com", Role::User));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["message"], "Your fan sold");
    assert_eq!(body["data"][0]["read"], false);
}

#[actix_web::test]
async fn mark_all_my_notifications_read() {
    let mut db = MockDatabase::new();
    db.expect_mark_all_read().withf(|id| *id == 1).returning(|_| Ok(3));
    let req = TestRequest::patch()
        .uri("/notify/notifications/mark-read")
        .insert_header(bearer(1, "ada1@example.com", Role::User));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 3);
}

#[actix_web::test]
async fn someone_elses_notification_is_not_found() {
    let mut db = MockDatabase::new();
    db.expect_mark_read().withf(|user, id| *user == 1 && *id == 40).returning(|_, _| Ok(None));
    let req = TestRequest::patch()
        .uri("/notify/notifications/40/mark-read")
        .insert_header(bearer(1, "ada1@example.com", Role::User));
    let (status, _) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn notify_another_user() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_id().withf(|id| *id == 4).returning(|id| Ok(Some(user(id))));
    db.expect_insert_notification()
        .withf(|id, msg| *id == 4 && msg == "Is the fan still available?")
        .returning(|id, msg| Ok(notification(8, id, msg)));
    let req = TestRequest::post()
        .uri("/notify/notifications")
        .insert_header(bearer(1, "ada1@example.com", Role::User))
        .set_json(json!({"userId": 4, "message": "Is the fan still available?"}));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["userId"], 4);
}

#[actix_web::test]
async fn notifications_need_a_message_and_recipient() {
    let mut db = MockDatabase::new();
    db.expect_insert_notification().never();
    let req = TestRequest::post()
        .uri("/notify/notifications")
        .insert_header(bearer(1, "ada1@example.com", Role::User))
        .set_json(json!({"userId": 4}));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Message and userId are required");

    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_id().returning(|_| Ok(None));
    db.expect_insert_notification().never();
    let req = TestRequest::post()
        .uri("/notify/notifications")
        .insert_header(bearer(1, "ada1@example.com", Role::User))
        .set_json(json!({"userId": 99, "message": "Hello?"}));
    let (status, _) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admin_notifications_need_an_admin_token() {
    let mut db = MockDatabase::new();
    db.expect_fetch_admin_notifications().never();
    let req = TestRequest::get()
        .uri("/notifyAdmin/notifications")
        .insert_header(bearer(1, "ada1@example.com", Role::User));
    let (status, _) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut db = MockDatabase::new();
    db.expect_fetch_admin_notifications().returning(|| Ok(vec![]));
    let req = TestRequest::get()
        .uri("/notifyAdmin/notifications")
        .insert_header(bearer(9, "root@example.com", Role::Admin));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Notifications fetched successfully");
}
