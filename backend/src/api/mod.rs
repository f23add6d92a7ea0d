//! Shared API plumbing.
//!
//! The account routes themselves live under `crate::auth`; this module holds
//! the response envelope and error translation they share.

pub mod common;
