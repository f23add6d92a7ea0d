//! Authentication module for managing user accounts, sessions, and access control.
//!
//! This module provides the public interface for the account lifecycle:
//! registration, activation, login, logout, password reset and password
//! change, plus the authorization middleware.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
