//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Fixed set of roles a user can hold. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    CompanyAdmin,
    Dispatcher,
    WarehouseStaff,
    Driver,
    Customer,
    Accountant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::SuperAdmin => "super_admin",
            Role::CompanyAdmin => "company_admin",
            Role::Dispatcher => "dispatcher",
            Role::WarehouseStaff => "warehouse_staff",
            Role::Driver => "driver",
            Role::Customer => "customer",
            Role::Accountant => "accountant",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "company_admin" => Ok(Role::CompanyAdmin),
            "dispatcher" => Ok(Role::Dispatcher),
            "warehouse_staff" => Ok(Role::WarehouseStaff),
            "driver" => Ok(Role::Driver),
            "customer" => Ok(Role::Customer),
            "accountant" => Ok(Role::Accountant),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Profile gender field. Absent means not provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub company_id: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public user-creation DTO, validated before hashing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNewUser {
    #[validate(
        email(message = "Must be a valid email"),
        length(min = 1, max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,

    pub role: Role,

    pub company_id: Option<String>,
}

/// Superuser-creation DTO. The staff/superuser flags may be passed but
/// must not be false; the creation path rejects any attempt to unset them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSuperuser {
    #[validate(
        email(message = "Must be a valid email"),
        length(min = 1, message = "Email address is required")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,

    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Internal insert DTO carrying the already-hashed password.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub company_id: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCompany {
    #[validate(length(min = 1, max = 255, message = "Company name must be 1-255 characters"))]
    pub name: String,
    pub logo: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DispatcherProfile {
    pub id: String,
    pub user_id: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub assigned_regions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WarehouseStaffProfile {
    pub id: String,
    pub user_id: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub warehouse_id: String,
    pub shift: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverProfile {
    pub id: String,
    pub user_id: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub license_number: String,
    pub vehicle_assigned: String,
    pub last_check_in: Option<DateTime<Utc>>,
    pub current_location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomerProfile {
    pub id: String,
    pub user_id: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub company_name: String,
    pub preferred_payment_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountantProfile {
    pub id: String,
    pub user_id: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub employee_id: String,
    pub can_approve_invoices: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDispatcherProfile {
    pub user_id: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub assigned_regions: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWarehouseStaffProfile {
    pub user_id: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub warehouse_id: String,
    pub shift: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDriverProfile {
    pub user_id: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub license_number: String,
    pub vehicle_assigned: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAccountantProfile {
    pub user_id: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub employee_id: String,
    pub can_approve_invoices: bool,
}
