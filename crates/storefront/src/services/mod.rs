//! Business logic services for the catalog.
//!
//! # Services
//!
//! - `auth` - Account registration and password login

pub mod auth;
