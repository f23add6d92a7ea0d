//! Database repository for company management operations.
//!
//! Provides CRUD operations for companies. Company names are unique; the
//! schema cascades user deletion when a company is removed.

use crate::database::models::{Company, CreateCompany};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct CompanyRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> CompanyRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new company. A duplicate name surfaces as a UNIQUE
    /// constraint violation from the database.
    pub async fn create_company(&self, company: CreateCompany) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(
            "INSERT INTO companies (id, name, logo, address, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, name, logo, address, created_at",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&company.name)
        .bind(&company.logo)
        .bind(&company.address)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(company)
    }

    /// Retrieves a company by its ID.
    pub async fn get_company_by_id(&self, id: &str) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT id, name, logo, address, created_at FROM companies WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(company)
    }

    /// Retrieves a company by its unique name.
    pub async fn get_company_by_name(&self, name: &str) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT id, name, logo, address, created_at FROM companies WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(company)
    }

    /// Deletes a company. Users referencing it are removed by the
    /// ON DELETE CASCADE on users.company_id.
    pub async fn delete_company(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
