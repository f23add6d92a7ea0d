//! Collection of general utility functions and common helpers.
//!
//! This module groups the token machinery (session JWTs and state-bound
//! activation/reset tokens) together with the URL-safe user-id codec used in
//! emailed links.

pub mod jwt;
pub mod state_token;
pub mod uid;
