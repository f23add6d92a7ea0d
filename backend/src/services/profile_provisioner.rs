//! Post-create hook that provisions role profiles.
//!
//! Runs synchronously right after a user row is inserted. Only the customer
//! role gets an automatic (empty) profile; the other four roles have their
//! profiles created explicitly by administrative tooling. The asymmetry is
//! intentional and mirrors the observed behavior of the platform.

use crate::database::models::{Role, User};
use crate::errors::ServiceResult;
use crate::repositories::profile_repository::ProfileRepository;
use sqlx::SqlitePool;

pub struct ProfileProvisioner<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProfileProvisioner<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Called once per successfully created user.
    pub async fn user_created(&self, user: &User) -> ServiceResult<()> {
        if user.role == Role::Customer {
            ProfileRepository::new(self.pool)
                .create_customer_profile(&user.id)
                .await?;
            tracing::info!("Created customer profile for user {}", user.id);
        }
        Ok(())
    }
}
