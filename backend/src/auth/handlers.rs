//! Handler functions for the account lifecycle API endpoints.
//!
//! These functions parse incoming HTTP requests, delegate to
//! `auth::service` for the business logic, and translate results into
//! responses. Login and logout additionally manage the `jwt` session cookie.

use crate::api::common::service_error_to_http;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::config::Config;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path},
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Json as ResponseJson, Response},
};
use sqlx::SqlitePool;

/// Name of the session cookie.
pub const JWT_COOKIE: &str = "jwt";

/// Cookie attribute string that discards the session cookie.
pub const CLEAR_SESSION_COOKIE: &str = "jwt=; Path=/; Max-Age=0; Secure; SameSite=Lax";

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<MessageResponse>), (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);

    match service.register(payload).await {
        Ok(response) => Ok((StatusCode::CREATED, ResponseJson(response))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle account activation from an emailed link
#[axum::debug_handler]
pub async fn activate(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Path((uidb64, token)): Path<(String, String)>,
) -> Result<ResponseJson<MessageResponse>, (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);

    match service.activate(&uidb64, &token).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle password reset request (sends the emailed link)
#[axum::debug_handler]
pub async fn request_password_reset(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<ResponseJson<MessageResponse>, (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);

    match service.request_password_reset(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle password reset confirmation from an emailed link
#[axum::debug_handler]
pub async fn confirm_password_reset(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Path((uidb64, token)): Path<(String, String)>,
    Json(payload): Json<PasswordResetConfirmRequest>,
) -> Result<ResponseJson<MessageResponse>, (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);

    match service.confirm_password_reset(&uidb64, &token, payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request.
///
/// The credential is returned in the body and duplicated into the `jwt`
/// cookie. The cookie is deliberately not HttpOnly: the frontends read it
/// from script. Secure and SameSite=Lax are kept.
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);

    let login_response = match service.login(payload).await {
        Ok(response) => response,
        Err(error) => return Err(service_error_to_http(error)),
    };

    let cookie = format!(
        "{}={}; Path=/; Secure; SameSite=Lax",
        JWT_COOKIE, login_response.token
    );

    let mut response = ResponseJson(login_response).into_response();
    match cookie.parse() {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(_) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to set session cookie".to_string(),
            ));
        }
    }

    Ok(response)
}

/// Handle logout request: clears the session cookie.
///
/// There is nothing to revoke server-side; the credential simply stops
/// being presented.
#[axum::debug_handler]
pub async fn logout(Extension(_claims): Extension<Claims>) -> Response {
    let mut response = ResponseJson(MessageResponse::new("Logout success!")).into_response();
    if let Ok(value) = CLEAR_SESSION_COOKIE.parse() {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// Handle password change for the authenticated user
#[axum::debug_handler]
pub async fn change_password(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<ResponseJson<MessageResponse>, (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);

    match service.change_password(claims.user_id(), payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Get current user information from the session credential
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<UserInfo>, (StatusCode, String)> {
    let service = AuthService::new(&pool, &config);

    match service.current_user(claims.user_id()).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}
