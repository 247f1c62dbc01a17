//! Rablo Core - Validated domain types for the product catalog.
//!
//! This crate provides the types shared by the catalog components:
//! - `storefront` - The catalog web application
//! - `cli` - Command-line tools for migrations, seeding and account creation
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database access,
//! no HTTP. Every constructor checks its invariants, so a value of one of these
//! types is always valid once it exists.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, prices, ratings, usernames, emails and product drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
