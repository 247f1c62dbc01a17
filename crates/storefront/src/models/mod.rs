//! Domain models for the catalog.
//!
//! These types represent validated domain objects separate from database row types.

pub mod product;
pub mod session;
pub mod user;
