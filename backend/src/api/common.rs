//! Error handling utilities for API responses.
//!
//! Provides structured error responses and conversion between service-layer
//! errors and HTTP responses. Includes:
//! - Standard response format
//! - ServiceError to HTTP status code mapping
//!
//! # Response Format
//! Error responses are consistent JSON containing:
//! - `message`: Human-readable message
//! - `error.error_type`: Machine-readable error category
//! - `error.details`: Optional field-specific errors

use crate::errors::ServiceError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    pub message: String,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Request timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
    /// Field-specific validation errors when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-specific validation error details
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the field with validation error
    pub field: String,
    /// Description of the validation failure
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a successful response with default message
    pub fn ok(data: T) -> Self {
        Self::success(data, "Request successful")
    }

    /// Create an error response
    pub fn error(
        message: impl Into<String>,
        error_type: impl Into<String>,
        details: Option<Vec<FieldError>>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            error: Some(ErrorDetails {
                error_type: error_type.into(),
                details,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, String) {
    let (status, error_type, message) = match error {
        ServiceError::Validation { message } => {
            (StatusCode::BAD_REQUEST, "validation_error", message)
        }
        ServiceError::DuplicateEmail { .. } => (
            StatusCode::BAD_REQUEST,
            "duplicate_email",
            "This email is already registered.".to_string(),
        ),
        ServiceError::NotFound { entity, identifier } => (
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{} '{}' not found", entity, identifier),
        ),
        ServiceError::InvalidToken => (
            StatusCode::BAD_REQUEST,
            "invalid_token",
            "Invalid activation link.".to_string(),
        ),
        ServiceError::InvalidCredential { message } => {
            (StatusCode::BAD_REQUEST, "invalid_credential", message)
        }
        ServiceError::InactiveAccount => (
            StatusCode::BAD_REQUEST,
            "inactive_account",
            "User account not active!".to_string(),
        ),
        ServiceError::AlreadyActive => (
            StatusCode::BAD_REQUEST,
            "already_active",
            "Account already activated.".to_string(),
        ),
        ServiceError::EmailDelivery { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "email_delivery_error",
            format!("Failed to send email. Please try again later. {}", message),
        ),
        ServiceError::Configuration { message } => {
            tracing::error!("Configuration error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
                "Internal server error".to_string(),
            )
        }
        ServiceError::Database { source } => {
            tracing::error!("Database error: {}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error".to_string(),
            )
        }
    };

    let error_response = ApiResponse::<()>::error(message, error_type, None);
    (status, serde_json::to_string(&error_response).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        let cases: Vec<(ServiceError, StatusCode)> = vec![
            (ServiceError::validation("bad input"), StatusCode::BAD_REQUEST),
            (
                ServiceError::duplicate_email("a@x.com"),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::not_found("User", "missing"),
                StatusCode::NOT_FOUND,
            ),
            (ServiceError::InvalidToken, StatusCode::BAD_REQUEST),
            (
                ServiceError::invalid_credential("Incorrect password!"),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::InactiveAccount, StatusCode::BAD_REQUEST),
            (ServiceError::AlreadyActive, StatusCode::BAD_REQUEST),
            (
                ServiceError::email_delivery("smtp down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::configuration("missing secret"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let (status, body) = service_error_to_http(error);
            assert_eq!(status, expected);
            let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(parsed["success"], false);
            assert!(parsed["error"]["error_type"].is_string());
        }
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let (_, body) = service_error_to_http(ServiceError::Database {
            source: anyhow::anyhow!("secret table missing"),
        });
        assert!(!body.contains("secret table"));
    }
}
