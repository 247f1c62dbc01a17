//! Product domain type.

use chrono::{DateTime, Utc};

use rablo_core::{Price, ProductDraft, ProductId, Rating};

/// A catalog entry as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Immutable identifier assigned at creation.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Non-negative price.
    pub price: Price,
    /// Whether the product is featured.
    pub featured: bool,
    /// Rating in `[0, 5]`.
    pub rating: Rating,
    /// Manufacturer or seller.
    pub company: String,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product record from a validated draft.
    #[must_use]
    pub fn new(id: ProductId, draft: &ProductDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name().to_owned(),
            price: draft.price(),
            featured: draft.featured(),
            rating: draft.rating(),
            company: draft.company().to_owned(),
            created_at,
        }
    }

    /// Replace every editable field. ID and creation time are kept.
    pub fn apply(&mut self, draft: &ProductDraft) {
        draft.name().clone_into(&mut self.name);
        self.price = draft.price();
        self.featured = draft.featured();
        self.rating = draft.rating();
        draft.company().clone_into(&mut self.company);
    }
}
