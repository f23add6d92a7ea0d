//! Outbound email for account activation and password reset.
//!
//! Messages are plain text with a single link, sent over SMTP. The service
//! is fire-and-forget: no retry logic, no delivery tracking.

use crate::config::EmailConfig;
use crate::errors::{ServiceError, ServiceResult};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::str::FromStr;

pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new EmailService instance
    pub fn new(config: EmailConfig) -> ServiceResult<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| ServiceError::configuration(format!("Invalid SMTP host: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, config })
    }

    /// Sends the activation link to a freshly registered user.
    pub async fn send_activation_email(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        activation_url: &str,
    ) -> ServiceResult<()> {
        let body = format!(
            "Hi {recipient_name},\n\n\
             Please use the link below to activate your account.\n\n\
             Link: {activation_url}"
        );
        self.send_email(recipient_email, "Activate your account", &body)
            .await
    }

    /// Sends the password-reset link.
    pub async fn send_password_reset_email(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        reset_url: &str,
    ) -> ServiceResult<()> {
        let body = format!(
            "Hi {recipient_name},\n\n\
             Please use the link below to reset your password.\n\n\
             Link: {reset_url}"
        );
        self.send_email(recipient_email, "Password Reset Requested", &body)
            .await
    }

    /// Sends a plain-text email.
    pub async fn send_email(&self, to_email: &str, subject: &str, body: &str) -> ServiceResult<()> {
        let from_mailbox = Mailbox::from_str(&format!(
            "{} <{}>",
            self.config.from_name, self.config.from_email
        ))
        .map_err(|e| ServiceError::configuration(format!("Invalid from email: {e}")))?;

        let to_mailbox = Mailbox::from_str(to_email)
            .map_err(|e| ServiceError::email_delivery(format!("Invalid recipient email: {e}")))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| ServiceError::email_delivery(format!("Failed to build email: {e}")))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| ServiceError::email_delivery(e.to_string()))?;

        Ok(())
    }
}
