//! JWT session credential utilities.
//!
//! Provides creation and validation of the signed session credential carried
//! in the `jwt` cookie. Claims are kept minimal: the user id, issue time and
//! expiry. Expired and malformed tokens are reported as distinct failures so
//! callers can end the session on expiry but treat garbage as anonymous.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::errors::ServiceError;

/// JWT claims for the session credential.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Distinguishes an out-of-window credential from a forged or garbled one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("session expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from application configuration.
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Exact expiry boundary: a credential issued at T is rejected at
        // T + lifetime + 1s, so no clock leeway.
        validation.leeway = 0;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds: config.jwt_expires_in_seconds,
        }
    }

    /// Generate a new session credential for the given user.
    pub fn generate_token(&self, user_id: &str) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::configuration(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a session credential.
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    /// Session lifetime in seconds, as configured.
    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }
}
