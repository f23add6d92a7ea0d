//! Database repository for user management operations.
//!
//! Provides CRUD operations for system users.

use crate::database::models::{CreateUser, Role, User};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, role, company_id, \
     is_active, is_staff, is_superuser, last_login, date_joined";

/// Repository for user database operations.
///
/// Handles all persistence operations for the User entity,
/// maintaining the relationship with companies.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    ///
    /// # Arguments
    /// * `user` - CreateUser DTO containing the hashed password and all fields
    ///
    /// # Returns
    /// The newly created User with all fields populated
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, role, \
             company_id, is_active, is_staff, is_superuser, date_joined) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role)
            .bind(&user.company_id)
            .bind(user.is_active)
            .bind(user.is_staff)
            .bind(user.is_superuser)
            .bind(Utc::now())
            .fetch_one(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by their email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user matching both email and role.
    ///
    /// Login is keyed on the (email, role) pair: the same email cannot
    /// authenticate under a role it was not registered with.
    pub async fn get_user_by_email_and_role(
        &self,
        email: &str,
        role: Role,
    ) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? AND role = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(role)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Checks if an email already exists in the system.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Sets the active flag for a user.
    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<()> {
        sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Replaces the stored password hash for a user.
    pub async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Stamps the last-login marker for a user.
    pub async fn set_last_login(&self, id: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
