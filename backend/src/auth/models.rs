//! Data structures for authentication-related entities.
//!
//! This module defines the request and response payloads for the account
//! lifecycle endpoints, used for data transfer within the authentication flow.

use crate::database::models::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request payload. The role defaults to customer when absent.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,

    pub password_confirmation: String,

    pub role: Option<Role>,
}

/// Login request payload. Lookup is keyed on the (email, role) pair.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub role: Role,
}

/// Login response carrying the session credential. The same credential is
/// also set as the `jwt` cookie by the handler.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub new_password1: String,
    pub new_password2: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub new_password: String,

    pub confirm_password: String,
}

/// Plain message response used by most lifecycle endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Current-user information returned by the `/me` endpoint.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub company_id: Option<String>,
    pub is_active: bool,
}
