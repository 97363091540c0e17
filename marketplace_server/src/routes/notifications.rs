use actix_web::{web, HttpResponse};
use log::*;
use marketplace_engine::{db_types::Role, NotificationApi, NotificationManagement, UserManagement};
use serde_json::json;

use crate::{
    auth::JwtClaims,
    data_objects::{JsonResponse, NewNotificationRequest},
    errors::ServerError,
    route,
};

//----------------------------------------------   User notifications  -------------------------------------------
route!(my_notifications => Get "/notify/notifications"
    impl B: NotificationManagement + UserManagement
    where requires [Role::User]);
pub async fn my_notifications<B: NotificationManagement + UserManagement>(
    claims: JwtClaims,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let notifications = api.for_user(claims.id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Notifications retrieved successfully", notifications)))
}

route!(mark_my_notifications_read => Patch "/notify/notifications/mark-read"
    impl B: NotificationManagement + UserManagement
    where requires [Role::User]);
pub async fn mark_my_notifications_read<B: NotificationManagement + UserManagement>(
    claims: JwtClaims,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let updated = api.mark_all_read(claims.id).await?;
    let body = JsonResponse::with_data("All notifications marked as read", json!({ "updated": updated }));
    Ok(HttpResponse::Ok().json(body))
}

route!(create_notification => Post "/notify/notifications"
    impl B: NotificationManagement + UserManagement
    where requires [Role::User]);
pub async fn create_notification<B: NotificationManagement + UserManagement>(
    claims: JwtClaims,
    body: web::Json<NewNotificationRequest>,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let NewNotificationRequest { message, user_id } = body.into_inner();
    let notification = api.notify(user_id, message).await?;
    debug!("🔔️ User #{} notified user #{}", claims.id, notification.user_id);
    Ok(HttpResponse::Created().json(JsonResponse::with_data("Notification created successfully", notification)))
}

route!(mark_my_notification_read => Patch "/notify/notifications/{id}/mark-read"
    impl B: NotificationManagement + UserManagement
    where requires [Role::User]);
pub async fn mark_my_notification_read<B: NotificationManagement + UserManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let notification = api.mark_read(claims.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Notification marked as read", notification)))
}

//----------------------------------------------   Admin notifications  -------------------------------------------
route!(admin_notifications => Get "/notifyAdmin/notifications"
    impl B: NotificationManagement + UserManagement
    where requires [Role::Admin]);
pub async fn admin_notifications<B: NotificationManagement + UserManagement>(
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let notifications = api.for_admins().await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Notifications fetched successfully", notifications)))
}

route!(mark_admin_notifications_read => Patch "/notifyAdmin/notifications/mark-all-read"
    impl B: NotificationManagement + UserManagement
    where requires [Role::Admin]);
pub async fn mark_admin_notifications_read<B: NotificationManagement + UserManagement>(
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let updated = api.mark_all_admin_read().await?;
    let body = JsonResponse::with_data("All notifications marked as read", json!({ "updated": updated }));
    Ok(HttpResponse::Ok().json(body))
}

route!(mark_admin_notification_read => Patch "/notifyAdmin/notifications/{id}/mark-read"
    impl B: NotificationManagement + UserManagement
    where requires [Role::Admin]);
pub async fn mark_admin_notification_read<B: NotificationManagement + UserManagement>(
    path: web::Path<i64>,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let notification = api.mark_admin_read(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Notification marked as read", notification)))
}
