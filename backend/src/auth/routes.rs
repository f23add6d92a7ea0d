//! Defines the HTTP routes for the account lifecycle.
//!
//! These routes handle registration, activation, password reset, login,
//! logout, and session-scoped operations. They are designed to be integrated
//! into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the account router with all lifecycle routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/activate/{uidb64}/{token}", get(activate))
        .route("/password_reset", post(request_password_reset))
        .route(
            "/password_reset/confirm/{uidb64}/{token}",
            post(confirm_password_reset),
        )
        .route("/login", post(login))
        .route(
            "/logout",
            post(logout).layer(middleware::from_fn(jwt_auth)),
        )
        .route("/me", get(me).layer(middleware::from_fn(jwt_auth)))
        .route(
            "/me/change_password",
            post(change_password).layer(middleware::from_fn(jwt_auth)),
        )
}
