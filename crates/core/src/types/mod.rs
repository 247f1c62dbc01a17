//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod rating;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{ProductDraft, ProductError, ProductInput};
pub use rating::{Rating, RatingError};
pub use username::{Username, UsernameError};
