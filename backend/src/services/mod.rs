//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business
//! operations and orchestrate interactions between different parts of the
//! application, such as user provisioning and outbound email.

pub mod email_service;
pub mod profile_provisioner;
pub mod user_service;
