//! Module for all database repository implementations.
//!
//! Repositories encapsulate the SQL for a single entity and expose typed
//! operations to the service layer.

pub mod company_repository;
pub mod profile_repository;
pub mod user_repository;
