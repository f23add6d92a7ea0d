//! User business logic service.
//!
//! Handles user creation for both the public registration path and the
//! administrative superuser path: input validation, email normalization,
//! duplicate checks, password hashing and the post-create profile hook.

use crate::database::models::{CreateNewUser, CreateSuperuser, CreateUser, Role, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::services::profile_provisioner::ProfileProvisioner;
use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user with full validation.
    ///
    /// The email is normalized to lowercase before the uniqueness check and
    /// insert. After a successful insert the profile provisioner hook runs,
    /// which creates an empty customer profile for customer users.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Validation failures (missing email/names, short password)
    /// - `DuplicateEmail` when the address is already registered
    pub async fn create_user(&self, create_user: CreateNewUser) -> ServiceResult<User> {
        // Input validation using validator crate
        if let Err(validation_errors) = create_user.validate() {
            return Err(ServiceError::validation(flatten_errors(validation_errors)));
        }

        let email = normalize_email(&create_user.email);

        let repo = UserRepository::new(self.pool);
        if repo.email_exists(&email).await? {
            return Err(ServiceError::duplicate_email(email));
        }

        let password_hash = Self::hash_password(&create_user.password)?;

        let user = repo
            .create_user(CreateUser {
                id: Uuid::now_v7().to_string(),
                email,
                password_hash,
                first_name: create_user.first_name,
                last_name: create_user.last_name,
                role: create_user.role,
                company_id: create_user.company_id,
                is_active: true,
                is_staff: false,
                is_superuser: false,
            })
            .await?;

        ProfileProvisioner::new(self.pool).user_created(&user).await?;

        Ok(user)
    }

    /// Creates a superuser.
    ///
    /// The role is forced to super_admin and the staff/superuser/active
    /// flags are forced on. Explicitly passing either flag as false is a
    /// configuration error, not a silent override.
    pub async fn create_superuser(&self, create: CreateSuperuser) -> ServiceResult<User> {
        if create.is_staff == Some(false) {
            return Err(ServiceError::configuration(
                "Superuser must have is_staff=true",
            ));
        }
        if create.is_superuser == Some(false) {
            return Err(ServiceError::configuration(
                "Superuser must have is_superuser=true",
            ));
        }

        if let Err(validation_errors) = create.validate() {
            return Err(ServiceError::validation(flatten_errors(validation_errors)));
        }

        let email = normalize_email(&create.email);

        let repo = UserRepository::new(self.pool);
        if repo.email_exists(&email).await? {
            return Err(ServiceError::duplicate_email(email));
        }

        let password_hash = Self::hash_password(&create.password)?;

        let user = repo
            .create_user(CreateUser {
                id: Uuid::now_v7().to_string(),
                email,
                password_hash,
                first_name: create.first_name,
                last_name: create.last_name,
                role: Role::SuperAdmin,
                company_id: None,
                is_active: true,
                is_staff: true,
                is_superuser: true,
            })
            .await?;

        ProfileProvisioner::new(self.pool).user_created(&user).await?;

        Ok(user)
    }

    /// Retrieves a user by ID with existence verification.
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user)
    }

    /// Function to hash a password before storing in database
    pub fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::configuration(format!("Password hashing failed: {}", e)))
    }

    /// Function to verify a password against the stored hash
    pub fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash)
            .map_err(|e| ServiceError::configuration(format!("Password verification failed: {}", e)))
    }
}

/// Lowercases the address. Uniqueness and all lookups operate on the
/// normalized form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Flattens validator field errors into a single message string.
pub fn flatten_errors(validation_errors: validator::ValidationErrors) -> String {
    let error_messages: Vec<String> = validation_errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error.message.as_ref().unwrap_or(&"Invalid value".into())
                )
            })
        })
        .collect();
    error_messages.join(", ")
}
