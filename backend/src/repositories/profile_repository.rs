//! Database repository for per-role profile records.
//!
//! Each role has its own profile table, one-to-one with the owning user and
//! cascade-deleted with it. The customer variant is created empty by the
//! profile provisioner; the other variants are created explicitly with their
//! role-specific fields.

use crate::database::models::{
    AccountantProfile, CreateAccountantProfile, CreateDispatcherProfile, CreateDriverProfile,
    CreateWarehouseStaffProfile, CustomerProfile, DispatcherProfile, DriverProfile,
    WarehouseStaffProfile,
};
use anyhow::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct ProfileRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates an empty customer profile for a user. Called by the profile
    /// provisioner right after user creation.
    pub async fn create_customer_profile(&self, user_id: &str) -> Result<CustomerProfile> {
        let profile = sqlx::query_as::<_, CustomerProfile>(
            "INSERT INTO customer_profiles (id, user_id) VALUES (?, ?) \
             RETURNING id, user_id, phone, gender, address, profile_image, \
             company_name, preferred_payment_method",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn get_customer_profile(&self, user_id: &str) -> Result<Option<CustomerProfile>> {
        let profile = sqlx::query_as::<_, CustomerProfile>(
            "SELECT id, user_id, phone, gender, address, profile_image, \
             company_name, preferred_payment_method \
             FROM customer_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn create_dispatcher_profile(
        &self,
        profile: CreateDispatcherProfile,
    ) -> Result<DispatcherProfile> {
        let profile = sqlx::query_as::<_, DispatcherProfile>(
            "INSERT INTO dispatcher_profiles \
             (id, user_id, phone, gender, address, assigned_regions) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING id, user_id, phone, gender, address, profile_image, assigned_regions",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&profile.user_id)
        .bind(&profile.phone)
        .bind(profile.gender)
        .bind(&profile.address)
        .bind(&profile.assigned_regions)
        .fetch_one(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn get_dispatcher_profile(&self, user_id: &str) -> Result<Option<DispatcherProfile>> {
        let profile = sqlx::query_as::<_, DispatcherProfile>(
            "SELECT id, user_id, phone, gender, address, profile_image, assigned_regions \
             FROM dispatcher_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn create_warehouse_staff_profile(
        &self,
        profile: CreateWarehouseStaffProfile,
    ) -> Result<WarehouseStaffProfile> {
        let profile = sqlx::query_as::<_, WarehouseStaffProfile>(
            "INSERT INTO warehouse_staff_profiles \
             (id, user_id, phone, gender, address, warehouse_id, shift) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING id, user_id, phone, gender, address, profile_image, \
             warehouse_id, shift, is_active",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&profile.user_id)
        .bind(&profile.phone)
        .bind(profile.gender)
        .bind(&profile.address)
        .bind(&profile.warehouse_id)
        .bind(&profile.shift)
        .fetch_one(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn get_warehouse_staff_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<WarehouseStaffProfile>> {
        let profile = sqlx::query_as::<_, WarehouseStaffProfile>(
            "SELECT id, user_id, phone, gender, address, profile_image, \
             warehouse_id, shift, is_active \
             FROM warehouse_staff_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn create_driver_profile(
        &self,
        profile: CreateDriverProfile,
    ) -> Result<DriverProfile> {
        let profile = sqlx::query_as::<_, DriverProfile>(
            "INSERT INTO driver_profiles \
             (id, user_id, phone, gender, address, license_number, vehicle_assigned) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING id, user_id, phone, gender, address, profile_image, \
             license_number, vehicle_assigned, last_check_in, current_location",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&profile.user_id)
        .bind(&profile.phone)
        .bind(profile.gender)
        .bind(&profile.address)
        .bind(&profile.license_number)
        .bind(&profile.vehicle_assigned)
        .fetch_one(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn get_driver_profile(&self, user_id: &str) -> Result<Option<DriverProfile>> {
        let profile = sqlx::query_as::<_, DriverProfile>(
            "SELECT id, user_id, phone, gender, address, profile_image, \
             license_number, vehicle_assigned, last_check_in, current_location \
             FROM driver_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn create_accountant_profile(
        &self,
        profile: CreateAccountantProfile,
    ) -> Result<AccountantProfile> {
        let profile = sqlx::query_as::<_, AccountantProfile>(
            "INSERT INTO accountant_profiles \
             (id, user_id, phone, gender, address, employee_id, can_approve_invoices) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING id, user_id, phone, gender, address, profile_image, \
             employee_id, can_approve_invoices",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&profile.user_id)
        .bind(&profile.phone)
        .bind(profile.gender)
        .bind(&profile.address)
        .bind(&profile.employee_id)
        .bind(profile.can_approve_invoices)
        .fetch_one(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn get_accountant_profile(&self, user_id: &str) -> Result<Option<AccountantProfile>> {
        let profile = sqlx::query_as::<_, AccountantProfile>(
            "SELECT id, user_id, phone, gender, address, profile_image, \
             employee_id, can_approve_invoices \
             FROM accountant_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{CreateUser, Gender, Role, User};
    use crate::repositories::user_repository::UserRepository;

    async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    async fn insert_user(pool: &SqlitePool, email: &str, role: Role) -> User {
        UserRepository::new(pool)
            .create_user(CreateUser {
                id: Uuid::now_v7().to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                first_name: "Bisi".to_string(),
                last_name: "Adeyemi".to_string(),
                role,
                company_id: None,
                is_active: true,
                is_staff: false,
                is_superuser: false,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn customer_profile_starts_empty() {
        let pool = test_pool().await;
        let repo = ProfileRepository::new(&pool);
        let user = insert_user(&pool, "c@example.com", Role::Customer).await;

        let profile = repo.create_customer_profile(&user.id).await.unwrap();
        assert_eq!(profile.user_id, user.id);
        assert!(profile.phone.is_none());
        assert!(profile.company_name.is_empty());
    }

    #[tokio::test]
    async fn one_profile_per_user() {
        let pool = test_pool().await;
        let repo = ProfileRepository::new(&pool);
        let user = insert_user(&pool, "c@example.com", Role::Customer).await;

        repo.create_customer_profile(&user.id).await.unwrap();
        assert!(repo.create_customer_profile(&user.id).await.is_err());
    }

    #[tokio::test]
    async fn dispatcher_profile_round_trips() {
        let pool = test_pool().await;
        let repo = ProfileRepository::new(&pool);
        let user = insert_user(&pool, "d@example.com", Role::Dispatcher).await;

        repo.create_dispatcher_profile(CreateDispatcherProfile {
            user_id: user.id.clone(),
            phone: Some("+2348012345678".to_string()),
            gender: Some(Gender::Female),
            address: None,
            assigned_regions: "Lagos,Ibadan".to_string(),
        })
        .await
        .unwrap();

        let profile = repo
            .get_dispatcher_profile(&user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.assigned_regions, "Lagos,Ibadan");
        assert_eq!(profile.gender, Some(Gender::Female));
    }

    #[tokio::test]
    async fn warehouse_staff_profile_defaults_to_active() {
        let pool = test_pool().await;
        let repo = ProfileRepository::new(&pool);
        let user = insert_user(&pool, "w@example.com", Role::WarehouseStaff).await;

        let profile = repo
            .create_warehouse_staff_profile(CreateWarehouseStaffProfile {
                user_id: user.id.clone(),
                phone: None,
                gender: None,
                address: None,
                warehouse_id: "WH-04".to_string(),
                shift: "night".to_string(),
            })
            .await
            .unwrap();
        assert!(profile.is_active);
        assert_eq!(profile.shift, "night");
    }

    #[tokio::test]
    async fn driver_and_accountant_profiles_store_role_fields() {
        let pool = test_pool().await;
        let repo = ProfileRepository::new(&pool);

        let driver = insert_user(&pool, "drv@example.com", Role::Driver).await;
        let profile = repo
            .create_driver_profile(CreateDriverProfile {
                user_id: driver.id.clone(),
                phone: None,
                gender: Some(Gender::Male),
                address: None,
                license_number: "LGS-99-112".to_string(),
                vehicle_assigned: "Truck 7".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(profile.license_number, "LGS-99-112");
        assert!(profile.last_check_in.is_none());

        let accountant = insert_user(&pool, "acct@example.com", Role::Accountant).await;
        let profile = repo
            .create_accountant_profile(CreateAccountantProfile {
                user_id: accountant.id.clone(),
                phone: None,
                gender: None,
                address: None,
                employee_id: "EMP-031".to_string(),
                can_approve_invoices: true,
            })
            .await
            .unwrap();
        assert!(profile.can_approve_invoices);
    }

    #[tokio::test]
    async fn profiles_are_deleted_with_their_user() {
        let pool = test_pool().await;
        let repo = ProfileRepository::new(&pool);
        let user = insert_user(&pool, "c@example.com", Role::Customer).await;
        repo.create_customer_profile(&user.id).await.unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(&user.id)
            .execute(&pool)
            .await
            .unwrap();
        assert!(repo.get_customer_profile(&user.id).await.unwrap().is_none());
    }
}
