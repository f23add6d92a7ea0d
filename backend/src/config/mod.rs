//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, token secrets and lifetimes, frontend base
//! URLs used in emailed links, and the optional SMTP section.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    /// Secret for both the session JWT and the state-bound email tokens.
    pub jwt_secret: String,
    /// Session credential lifetime. Defaults to 7 days.
    pub jwt_expires_in_seconds: u64,
    /// Validity window for activation/password-reset tokens. Defaults to 3 days.
    pub state_token_timeout_seconds: u64,
    pub server_port: u16,
    /// Customer-facing frontend, used for activation and customer reset links.
    pub frontend_public_url: String,
    /// Staff-facing frontend, used for non-customer reset links.
    pub frontend_staff_url: String,
    email: Option<EmailConfig>,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_name: String,
    pub from_email: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;

        let jwt_expires_in_seconds = env::var("JWT_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| "604800".to_string())
            .parse::<u64>()
            .context("JWT_EXPIRES_IN_SECONDS must be a valid number")?;

        let state_token_timeout_seconds = env::var("STATE_TOKEN_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "259200".to_string())
            .parse::<u64>()
            .context("STATE_TOKEN_TIMEOUT_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let frontend_public_url = env::var("FRONTEND_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let frontend_staff_url = env::var("FRONTEND_STAFF_URL")
            .unwrap_or_else(|_| "http://localhost:5174".to_string());

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_expires_in_seconds,
            state_token_timeout_seconds,
            server_port,
            frontend_public_url,
            frontend_staff_url,
            email: EmailConfig::from_env(),
        })
    }

    /// Returns the SMTP configuration when all required variables are set.
    pub fn email_config(&self) -> Option<&EmailConfig> {
        self.email.as_ref()
    }

    /// Configuration for tests: no SMTP, fixed secret, in-memory database.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in_seconds: 604_800,
            state_token_timeout_seconds: 259_200,
            server_port: 0,
            frontend_public_url: "http://public.test".to_string(),
            frontend_staff_url: "http://staff.test".to_string(),
            email: None,
        }
    }
}

impl EmailConfig {
    fn from_env() -> Option<Self> {
        let smtp_host = env::var("SMTP_HOST").ok()?;
        let smtp_username = env::var("SMTP_USERNAME").ok()?;
        let smtp_password = env::var("SMTP_PASSWORD").ok()?;
        let from_email = env::var("EMAIL_FROM").ok()?;

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .ok()?;

        let from_name =
            env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "Logistics Accounts".to_string());

        Some(EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_name,
            from_email,
        })
    }
}
