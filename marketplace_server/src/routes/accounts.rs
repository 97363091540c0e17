//! User and admin accounts: registration, login, password resets and profiles.
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use log::*;
use marketplace_engine::{
    account_objects::{Credentials, PasswordResetRequest, ProfileUpdate, RegisterUser},
    db_types::Role,
    AccountApi,
    ProductManagement,
    UserManagement,
};
use serde_json::json;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::ServerOptions,
    data_objects::{
        AdminLoginResponse,
        DashboardResponse,
        ForgotPasswordRequest,
        JsonResponse,
        LoginResponse,
        UsernameQuery,
    },
    errors::ServerError,
    helpers::get_remote_ip,
    integrations::ImageStore,
    mailer::Mailer,
    multipart::MultipartForm,
    route,
};

pub const RESET_EMAIL_SUBJECT: &str = "Password Reset Request";

fn credentials(form: Credentials) -> Result<(String, String), ServerError> {
    match (form.email, form.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => Ok((email, password)),
        _ => Err(ServerError::ValidationError("Please provide email and password".into())),
    }
}

route!(register => Post "/users/register" impl B: UserManagement);
pub async fn register<B: UserManagement>(
    body: web::Json<RegisterUser>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user = api.register(body.into_inner()).await?;
    debug!("💻️ Registered user #{}", user.id);
    Ok(HttpResponse::Created().json(JsonResponse::with_data("User registered successfully", user)))
}

route!(login => Post "/users/login" impl B: UserManagement);
pub async fn login<B: UserManagement>(
    req: HttpRequest,
    body: web::Json<Credentials>,
    api: web::Data<AccountApi<B>>,
    signer: web::Data<TokenIssuer>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let (email, password) = credentials(body.into_inner())?;
    let user = api.login(&email, &password).await.map_err(|e| {
        let ip = get_remote_ip(&req, &options).map(|ip| ip.to_string()).unwrap_or_else(|| "unknown".into());
        warn!("💻️ Failed login for {email} from {ip}. {e}");
        e
    })?;
    let token = signer.issue_token(JwtClaims::new(user.id, &user.email, Role::User))?;
    debug!("💻️ User #{} logged in", user.id);
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Login successful", LoginResponse::new(&user, token))))
}

// Tokens are stateless, so there is nothing to revoke. The client discards its token.
route!(logout => Post "/users/logout");
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(JsonResponse::success("User logged out"))
}

route!(forgot_password => Post "/users/forgot-password" impl B: UserManagement, M: Mailer);
pub async fn forgot_password<B: UserManagement, M: Mailer>(
    body: web::Json<ForgotPasswordRequest>,
    api: web::Data<AccountApi<B>>,
    mailer: web::Data<M>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let email = body.into_inner().email.unwrap_or_default();
    let (user, token) = api.begin_password_reset(&email).await?;
    let url = options.reset_password_url(&token);
    let text = format!("To reset your password, click the following link: {url}");
    if let Err(e) = mailer.send_email(&user.email, RESET_EMAIL_SUBJECT, &text).await {
        error!("📧️ Could not send the password reset email to user #{}. {e}", user.id);
        return Err(ServerError::failed_with_detail(
            500,
            "Error sending email. Please try again.",
            Some(json!(e.to_string())),
        ));
    }
    Ok(HttpResponse::Ok().json(JsonResponse::success("A reset link has been sent to your email address.")))
}

route!(reset_password => Post "/users/reset-password" impl B: UserManagement);
pub async fn reset_password<B: UserManagement>(
    body: web::Json<PasswordResetRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let PasswordResetRequest { token, password } = body.into_inner();
    api.reset_password(&token.unwrap_or_default(), &password.unwrap_or_default()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Password reset successful.")))
}

route!(message_profile => Get "/users/message-profile" impl B: UserManagement + ProductManagement);
pub async fn message_profile<B: UserManagement + ProductManagement>(
    query: web::Query<UsernameQuery>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let username = query
        .into_inner()
        .username
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ServerError::ValidationError("'username' is required".into()))?;
    let profile = api.seller_profile(&username).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Seller profile fetched successfully", profile)))
}

route!(admin_login => Post "/admin/login" impl B: UserManagement);
pub async fn admin_login<B: UserManagement>(
    req: HttpRequest,
    body: web::Json<Credentials>,
    api: web::Data<AccountApi<B>>,
    signer: web::Data<TokenIssuer>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let (email, password) = credentials(body.into_inner())?;
    let ip = get_remote_ip(&req, &options).map(|ip| ip.to_string()).unwrap_or_else(|| "unknown".into());
    let admin = api.admin_login(&email, &password).await.map_err(|e| {
        warn!("💻️ Failed admin login for {email} from {ip}. {e}");
        e
    })?;
    let token = signer.issue_token(JwtClaims::new(admin.id, &admin.email, Role::Admin))?;
    info!("💻️ Admin #{} logged in from {ip}", admin.id);
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Login successful", AdminLoginResponse::new(&admin, token))))
}

route!(admin_dashboard => Get "/adminDashboard/dashboard" impl B: UserManagement where requires [Role::Admin]);
pub async fn admin_dashboard<B: UserManagement>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let admin = api
        .admin_by_id(claims.id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Admin #{} does not exist", claims.id)))?;
    let summary = api.dashboard().await?;
    let message = format!("Welcome {}, this is your dashboard", admin.email);
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(message, DashboardResponse { admin, summary })))
}

route!(my_profile => Get "/userProfile/profile" impl B: UserManagement where requires [Role::User]);
pub async fn my_profile<B: UserManagement>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user = api.profile(claims.id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Profile fetched successfully", user)))
}

route!(update_my_profile => Put "/userProfile/profile"
    impl B: UserManagement, I: ImageStore
    where requires [Role::User]);
pub async fn update_my_profile<B: UserManagement, I: ImageStore>(
    claims: JwtClaims,
    payload: Multipart,
    api: web::Data<AccountApi<B>>,
    images: web::Data<I>,
) -> Result<HttpResponse, ServerError> {
    let form = MultipartForm::collect(payload, &["profilePicture"]).await?;
    let mut update = form.deserialize_fields::<ProfileUpdate>()?;
    if let Some(file) = form.file {
        let url = images.store_image(file.bytes, &file.filename).await.map_err(|e| {
            error!("🖼️ Profile picture upload for user #{} failed. {e}", claims.id);
            ServerError::failed_with_detail(500, "Image upload failed", Some(json!(e.to_string())))
        })?;
        update.profile_picture = Some(url);
    }
    let user = api.update_profile(claims.id, update).await?;
    debug!("💻️ User #{} updated their profile", user.id);
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Profile updated successfully", user)))
}
