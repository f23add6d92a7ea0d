//! Middleware for protecting authenticated routes.
//!
//! Resolves the session credential from the `jwt` cookie (or an
//! Authorization bearer header) and inserts the validated claims into the
//! request extensions. Expired sessions get a 401 that also clears the
//! cookie; malformed tokens are logged and treated as anonymous, which on a
//! protected route means 401 as well.

use crate::auth::handlers::{CLEAR_SESSION_COOKIE, JWT_COOKIE};
use crate::config::Config;
use crate::utils::jwt::{JwtUtils, TokenError};
use axum::{
    extract::Request,
    http::{
        StatusCode,
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

/// JWT authentication middleware
pub async fn jwt_auth(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let config = request
        .extensions()
        .get::<Config>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let token = token_from_request(&request).ok_or(StatusCode::UNAUTHORIZED)?;

    let jwt_utils = JwtUtils::new(&config);
    match jwt_utils.validate_token(&token) {
        Ok(claims) => {
            // Add claims to request extensions for use in handlers
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(TokenError::Expired) => Ok(session_expired_response()),
        Err(TokenError::Invalid) => {
            tracing::error!("Invalid session token");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Extracts the session credential: `jwt` cookie first, bearer header as a
/// fallback.
fn token_from_request(request: &Request) -> Option<String> {
    if let Some(cookies) = request
        .headers()
        .get(COOKIE)
        .and_then(|header| header.to_str().ok())
    {
        let prefix = format!("{}=", JWT_COOKIE);
        for pair in cookies.split(';') {
            if let Some(value) = pair.trim().strip_prefix(&prefix) {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// 401 that also instructs the client to discard the stale cookie.
fn session_expired_response() -> Response {
    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "message": "Session ended. Please log in again."
        })),
    )
        .into_response();
    if let Ok(value) = CLEAR_SESSION_COOKIE.parse() {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::HeaderValue;

    fn request_with_cookie(cookie: &str) -> Request {
        let mut request = Request::new(Body::empty());
        request
            .headers_mut()
            .insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        request
    }

    #[test]
    fn cookie_takes_precedence_over_bearer() {
        let mut request = request_with_cookie("theme=dark; jwt=cookie-token");
        request.headers_mut().insert(
            AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        assert_eq!(token_from_request(&request).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn bearer_is_used_when_cookie_is_absent_or_empty() {
        let mut request = Request::new(Body::empty());
        request.headers_mut().insert(
            AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        assert_eq!(token_from_request(&request).as_deref(), Some("header-token"));

        let request = request_with_cookie("jwt=");
        assert_eq!(token_from_request(&request), None);
    }
}
