//! Core business logic for the account lifecycle.
//!
//! Orchestrates registration, activation, login, password reset and password
//! change over the credential store, the token utilities and the mailer.
//! Every failure is reported as a `ServiceError`; nothing here panics on bad
//! input.

use crate::auth::models::*;
use crate::config::Config;
use crate::database::models::{CreateNewUser, Role, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::services::email_service::EmailService;
use crate::services::user_service::{UserService, flatten_errors, normalize_email};
use crate::utils::jwt::JwtUtils;
use crate::utils::state_token::StateTokenGenerator;
use crate::utils::uid::{decode_uid, encode_uid};
use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

/// Authentication service handling the full account lifecycle.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    config: Config,
    jwt_utils: JwtUtils,
    token_generator: StateTokenGenerator,
    user_service: UserService<'a>,
    email_service: Option<EmailService>,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance.
    ///
    /// The mailer is optional: without SMTP configuration the service still
    /// runs, activation/reset emails are skipped with a warning.
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        let email_service = match config.email_config() {
            Some(email_config) => match EmailService::new(email_config.clone()) {
                Ok(service) => Some(service),
                Err(e) => {
                    tracing::warn!(
                        "Failed to initialize email service: {}. Outbound email disabled.",
                        e
                    );
                    None
                }
            },
            None => {
                tracing::warn!("Email configuration not found. Outbound email disabled.");
                None
            }
        };

        AuthService {
            pool,
            config: config.clone(),
            jwt_utils: JwtUtils::new(config),
            token_generator: StateTokenGenerator::new(config),
            user_service: UserService::new(pool),
            email_service,
        }
    }

    /// Registers a new user.
    ///
    /// The user is created inactive and mailed an activation link. The
    /// activation token is never part of the response. An email delivery
    /// failure on this path is logged, not surfaced: the account exists and
    /// activation can be re-requested out of band.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<MessageResponse> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(flatten_errors(validation_errors)));
        }
        if request.password != request.password_confirmation {
            return Err(ServiceError::validation("The passwords do not match."));
        }

        let user = self
            .user_service
            .create_user(CreateNewUser {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                password: request.password,
                role: request.role.unwrap_or(Role::Customer),
                company_id: None,
            })
            .await?;

        // Self-registered accounts start inactive until the emailed link is
        // followed.
        let repo = UserRepository::new(self.pool);
        repo.set_active(&user.id, false).await?;

        let token = self.token_generator.make_token(&user);
        let activation_url = format!(
            "{}/account/activate/{}/{}/",
            self.config.frontend_public_url,
            encode_uid(&user.id),
            token
        );
        self.try_send_activation_email(&user, &activation_url).await;

        Ok(MessageResponse::new(
            "Registration successful. Please check your email to activate your account.",
        ))
    }

    /// Activates an account from an emailed link.
    pub async fn activate(&self, uidb64: &str, token: &str) -> ServiceResult<MessageResponse> {
        let user_id = decode_uid(uidb64)
            .ok_or_else(|| ServiceError::not_found("User", uidb64))?;

        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(&user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &user_id))?;

        if user.is_active {
            return Err(ServiceError::AlreadyActive);
        }

        if !self.token_generator.check_token(&user, token) {
            return Err(ServiceError::InvalidToken);
        }

        repo.set_active(&user.id, true).await?;

        Ok(MessageResponse::new(
            "Your account has been activated successfully.",
        ))
    }

    /// Issues a password-reset link by email.
    ///
    /// The reset URL is role-dependent: customers get the public frontend,
    /// everyone else the staff frontend. A send failure is surfaced as
    /// `EmailDelivery`; the token needs no rollback since it is stateless.
    pub async fn request_password_reset(
        &self,
        request: PasswordResetRequest,
    ) -> ServiceResult<MessageResponse> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(flatten_errors(validation_errors)));
        }

        let email = normalize_email(&request.email);
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &email))?;

        if !user.is_active {
            return Err(ServiceError::InactiveAccount);
        }

        let token = self.token_generator.make_token(&user);
        let uidb64 = encode_uid(&user.id);
        let reset_url = if user.role == Role::Customer {
            format!(
                "{}/client/password_reset/confirm/{}/{}/",
                self.config.frontend_public_url, uidb64, token
            )
        } else {
            format!(
                "{}/staff/password_reset/confirm/{}/{}/",
                self.config.frontend_staff_url, uidb64, token
            )
        };

        let Some(ref email_service) = self.email_service else {
            return Err(ServiceError::email_delivery("Email service not configured"));
        };
        email_service
            .send_password_reset_email(&user.email, &user.full_name(), &reset_url)
            .await?;

        Ok(MessageResponse::new(
            "Password reset link has been sent to your email address.",
        ))
    }

    /// Completes a password reset from an emailed link.
    pub async fn confirm_password_reset(
        &self,
        uidb64: &str,
        token: &str,
        request: PasswordResetConfirmRequest,
    ) -> ServiceResult<MessageResponse> {
        if request.new_password1 != request.new_password2 {
            return Err(ServiceError::validation("Passwords do not match."));
        }
        if request.new_password1.len() < 8 {
            return Err(ServiceError::validation(
                "Password must be at least 8 characters long",
            ));
        }

        let user_id = decode_uid(uidb64)
            .ok_or_else(|| ServiceError::not_found("User", uidb64))?;

        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(&user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &user_id))?;

        if !self.token_generator.check_token(&user, token) {
            return Err(ServiceError::InvalidToken);
        }

        let password_hash = UserService::hash_password(&request.new_password1)?;
        repo.set_password_hash(&user.id, &password_hash).await?;

        Ok(MessageResponse::new(
            "Your password has been reset successfully.",
        ))
    }

    /// Authenticates a user and issues a session credential.
    ///
    /// The lookup is keyed on the (email, role) pair, so an email registered
    /// under one role does not authenticate under another. Stamping
    /// last_login doubles as the server-side session marker and implicitly
    /// invalidates outstanding activation/reset tokens.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(flatten_errors(validation_errors)));
        }

        let email = normalize_email(&request.email);
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_email_and_role(&email, request.role)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &email))?;

        if !UserService::verify_password(&request.password, &user.password_hash)? {
            return Err(ServiceError::invalid_credential("Incorrect password!"));
        }

        if !user.is_active {
            return Err(ServiceError::InactiveAccount);
        }

        repo.set_last_login(&user.id, Utc::now()).await?;

        let token = self.jwt_utils.generate_token(&user.id)?;

        Ok(LoginResponse {
            message: "Login successful!".to_string(),
            token,
        })
    }

    /// Changes the password of the authenticated user.
    ///
    /// The existing session credential stays valid: it is bound to the user
    /// id, not the hash, so no re-login is forced.
    pub async fn change_password(
        &self,
        user_id: &str,
        request: ChangePasswordRequest,
    ) -> ServiceResult<MessageResponse> {
        let user = self.user_service.get_user_required(user_id).await?;

        if !UserService::verify_password(&request.old_password, &user.password_hash)? {
            return Err(ServiceError::invalid_credential("Old password is incorrect."));
        }

        if request.new_password != request.confirm_password {
            return Err(ServiceError::validation("New passwords do not match."));
        }
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(flatten_errors(validation_errors)));
        }

        let password_hash = UserService::hash_password(&request.new_password)?;
        UserRepository::new(self.pool)
            .set_password_hash(&user.id, &password_hash)
            .await?;

        Ok(MessageResponse::new("Password updated successfully"))
    }

    /// Resolves the authenticated user for the `/me` endpoint.
    pub async fn current_user(&self, user_id: &str) -> ServiceResult<UserInfo> {
        let user = self.user_service.get_user_required(user_id).await?;
        Ok(UserInfo {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            company_id: user.company_id,
            is_active: user.is_active,
        })
    }

    async fn try_send_activation_email(&self, user: &User, activation_url: &str) {
        let Some(ref email_service) = self.email_service else {
            tracing::warn!(
                "Email service not configured. Activation email not sent to {}",
                user.email
            );
            return;
        };
        match email_service
            .send_activation_email(&user.email, &user.full_name(), activation_url)
            .await
        {
            Ok(_) => {
                tracing::info!("Activation email sent to {}", user.email);
            }
            Err(e) => {
                tracing::error!("Failed to send activation email to {}: {}", user.email, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::JwtUtils;

    async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn register_request(email: &str, role: Option<Role>) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Okafor".to_string(),
            password: "pass1234".to_string(),
            password_confirmation: "pass1234".to_string(),
            role,
        }
    }

    async fn registered_user(service: &AuthService<'_>, pool: &SqlitePool, email: &str) -> User {
        service
            .register(register_request(email, Some(Role::Customer)))
            .await
            .unwrap();
        UserRepository::new(pool)
            .get_user_by_email(email)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn register_creates_inactive_user() {
        let pool = test_pool().await;
        let config = Config::for_tests();
        let service = AuthService::new(&pool, &config);

        let user = registered_user(&service, &pool, "a@x.com").await;
        assert!(!user.is_active);
        assert_eq!(user.role, Role::Customer);
    }

    #[tokio::test]
    async fn register_rejects_mismatch_short_password_and_duplicates() {
        let pool = test_pool().await;
        let config = Config::for_tests();
        let service = AuthService::new(&pool, &config);

        let mut request = register_request("a@x.com", None);
        request.password_confirmation = "different1".to_string();
        let err = service.register(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        let mut request = register_request("a@x.com", None);
        request.password = "short".to_string();
        request.password_confirmation = "short".to_string();
        let err = service.register(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        service
            .register(register_request("a@x.com", None))
            .await
            .unwrap();
        let err = service
            .register(register_request("a@x.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEmail { .. }));
    }

    #[tokio::test]
    async fn activation_flow() {
        let pool = test_pool().await;
        let config = Config::for_tests();
        let service = AuthService::new(&pool, &config);

        let user = registered_user(&service, &pool, "a@x.com").await;
        let uidb64 = encode_uid(&user.id);
        let token = StateTokenGenerator::new(&config).make_token(&user);

        // Wrong token leaves the account inactive.
        let err = service.activate(&uidb64, "123-deadbeef").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidToken));
        let user = UserRepository::new(&pool)
            .get_user_by_id(&user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!user.is_active);

        // Correct token activates.
        service.activate(&uidb64, &token).await.unwrap();
        let user = UserRepository::new(&pool)
            .get_user_by_id(&user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(user.is_active);

        // Second activation with the same (still valid) token fails.
        let err = service.activate(&uidb64, &token).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyActive));

        // Unknown and undecodable ids are NotFound.
        let err = service
            .activate(&encode_uid("no-such-user"), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
        let err = service.activate("!!bad!!", &token).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn login_distinguishes_failure_modes() {
        let pool = test_pool().await;
        let config = Config::for_tests();
        let service = AuthService::new(&pool, &config);

        let user = registered_user(&service, &pool, "a@x.com").await;

        // Registered as customer, so a driver login does not find the pair.
        let err = service
            .login(LoginRequest {
                email: "a@x.com".to_string(),
                password: "pass1234".to_string(),
                role: Role::Driver,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        // Wrong password is reported before the inactive flag.
        let err = service
            .login(LoginRequest {
                email: "a@x.com".to_string(),
                password: "wrongpass".to_string(),
                role: Role::Customer,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredential { .. }));

        // Correct credentials on an inactive account.
        let err = service
            .login(LoginRequest {
                email: "a@x.com".to_string(),
                password: "pass1234".to_string(),
                role: Role::Customer,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InactiveAccount));

        // Activate, then login succeeds, stamps last_login and the returned
        // credential validates.
        UserRepository::new(&pool)
            .set_active(&user.id, true)
            .await
            .unwrap();
        let response = service
            .login(LoginRequest {
                email: "A@X.com".to_string(),
                password: "pass1234".to_string(),
                role: Role::Customer,
            })
            .await
            .unwrap();
        assert_eq!(response.message, "Login successful!");
        let claims = JwtUtils::new(&config).validate_token(&response.token).unwrap();
        assert_eq!(claims.user_id(), user.id);

        let user = UserRepository::new(&pool)
            .get_user_by_id(&user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(user.last_login.is_some());
    }

    #[tokio::test]
    async fn password_reset_request_failure_modes() {
        let pool = test_pool().await;
        let config = Config::for_tests();
        let service = AuthService::new(&pool, &config);

        let err = service
            .request_password_reset(PasswordResetRequest {
                email: "nobody@x.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let user = registered_user(&service, &pool, "a@x.com").await;
        let err = service
            .request_password_reset(PasswordResetRequest {
                email: "a@x.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InactiveAccount));

        // Active account but no mailer configured: delivery failure, and the
        // caller sees it.
        UserRepository::new(&pool)
            .set_active(&user.id, true)
            .await
            .unwrap();
        let err = service
            .request_password_reset(PasswordResetRequest {
                email: "a@x.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EmailDelivery { .. }));
    }

    #[tokio::test]
    async fn password_reset_confirm_flow() {
        let pool = test_pool().await;
        let config = Config::for_tests();
        let service = AuthService::new(&pool, &config);

        let user = registered_user(&service, &pool, "a@x.com").await;
        UserRepository::new(&pool)
            .set_active(&user.id, true)
            .await
            .unwrap();
        let user = UserRepository::new(&pool)
            .get_user_by_id(&user.id)
            .await
            .unwrap()
            .unwrap();

        let uidb64 = encode_uid(&user.id);
        let token = StateTokenGenerator::new(&config).make_token(&user);

        let err = service
            .confirm_password_reset(
                &uidb64,
                &token,
                PasswordResetConfirmRequest {
                    new_password1: "newpass123".to_string(),
                    new_password2: "different1".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        let err = service
            .confirm_password_reset(
                &uidb64,
                "123-deadbeef",
                PasswordResetConfirmRequest {
                    new_password1: "newpass123".to_string(),
                    new_password2: "newpass123".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidToken));

        service
            .confirm_password_reset(
                &uidb64,
                &token,
                PasswordResetConfirmRequest {
                    new_password1: "newpass123".to_string(),
                    new_password2: "newpass123".to_string(),
                },
            )
            .await
            .unwrap();

        // New password logs in; the reset token died with the hash change.
        service
            .login(LoginRequest {
                email: "a@x.com".to_string(),
                password: "newpass123".to_string(),
                role: Role::Customer,
            })
            .await
            .unwrap();
        let err = service
            .confirm_password_reset(
                &uidb64,
                &token,
                PasswordResetConfirmRequest {
                    new_password1: "another123".to_string(),
                    new_password2: "another123".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidToken));
    }

    #[tokio::test]
    async fn change_password_flow() {
        let pool = test_pool().await;
        let config = Config::for_tests();
        let service = AuthService::new(&pool, &config);

        let user = registered_user(&service, &pool, "a@x.com").await;
        let original_hash = user.password_hash.clone();

        // Wrong old password.
        let err = service
            .change_password(
                &user.id,
                ChangePasswordRequest {
                    old_password: "wrongpass".to_string(),
                    new_password: "newpass123".to_string(),
                    confirm_password: "newpass123".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredential { .. }));

        // Mismatched confirmation leaves the stored hash untouched.
        let err = service
            .change_password(
                &user.id,
                ChangePasswordRequest {
                    old_password: "pass1234".to_string(),
                    new_password: "newpass123".to_string(),
                    confirm_password: "different1".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
        let unchanged = UserRepository::new(&pool)
            .get_user_by_id(&user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.password_hash, original_hash);

        // Success re-hashes.
        service
            .change_password(
                &user.id,
                ChangePasswordRequest {
                    old_password: "pass1234".to_string(),
                    new_password: "newpass123".to_string(),
                    confirm_password: "newpass123".to_string(),
                },
            )
            .await
            .unwrap();
        let updated = UserRepository::new(&pool)
            .get_user_by_id(&user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(UserService::verify_password("newpass123", &updated.password_hash).unwrap());
        assert!(!UserService::verify_password("pass1234", &updated.password_hash).unwrap());
    }
}
