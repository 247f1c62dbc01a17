//! Validated product input.
//!
//! A [`ProductDraft`] is what the create and update operations hand to the
//! store. Building one performs every field check up front, so the store
//! never sees a blank name, a negative price or a rating outside `[0, 5]`.

use super::price::{Price, PriceError};
use super::rating::{Rating, RatingError};

/// Errors that can occur when validating product input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProductError {
    /// Name is blank after trimming.
    #[error("name is required")]
    MissingName,
    /// Company is blank after trimming.
    #[error("company is required")]
    MissingCompany,
    /// Price failed validation.
    #[error(transparent)]
    Price(#[from] PriceError),
    /// Rating failed validation.
    #[error(transparent)]
    Rating(#[from] RatingError),
}

/// Raw product fields as submitted by a form or a seed file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductInput<'a> {
    /// Product name.
    pub name: &'a str,
    /// Decimal price, e.g. `"12.50"`.
    pub price: &'a str,
    /// Whether the product is featured.
    pub featured: bool,
    /// Rating between 0 and 5; blank or `None` means 0.
    pub rating: Option<&'a str>,
    /// Manufacturer or seller.
    pub company: &'a str,
}

/// Validated, store-ready product fields (everything except ID and timestamp).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    name: String,
    price: Price,
    featured: bool,
    rating: Rating,
    company: String,
}

impl ProductDraft {
    /// Validate raw product input.
    ///
    /// Checks run in field order (name, price, rating, company) and the
    /// first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns `ProductError` describing the first invalid field.
    pub fn parse(input: ProductInput<'_>) -> Result<Self, ProductError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ProductError::MissingName);
        }

        let price = Price::parse(input.price)?;
        let rating = input.rating.map_or(Ok(Rating::default()), Rating::parse)?;

        let company = input.company.trim();
        if company.is_empty() {
            return Err(ProductError::MissingCompany);
        }

        Ok(Self {
            name: name.to_owned(),
            price,
            featured: input.featured,
            rating,
            company: company.to_owned(),
        })
    }

    /// Product name (trimmed, non-empty).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Product price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Whether the product is featured.
    #[must_use]
    pub const fn featured(&self) -> bool {
        self.featured
    }

    /// Product rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Company name (trimmed, non-empty).
    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input<'a>(name: &'a str, price: &'a str, company: &'a str) -> ProductInput<'a> {
        ProductInput {
            name,
            price,
            company,
            ..ProductInput::default()
        }
    }

    #[test]
    fn defaults_featured_and_rating() {
        let draft = ProductDraft::parse(input("Kettle", "24.00", "Acme")).unwrap();
        assert!(!draft.featured());
        assert!((draft.rating().value() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trims_text_fields() {
        let draft = ProductDraft::parse(input("  Kettle ", "1", " Acme  ")).unwrap();
        assert_eq!(draft.name(), "Kettle");
        assert_eq!(draft.company(), "Acme");
    }

    #[test]
    fn blank_name_is_rejected_first() {
        let err = ProductDraft::parse(input("   ", "-3", "")).unwrap_err();
        assert_eq!(err, ProductError::MissingName);
    }

    #[test]
    fn blank_company_is_rejected() {
        let err = ProductDraft::parse(input("Kettle", "3", " ")).unwrap_err();
        assert_eq!(err, ProductError::MissingCompany);
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = ProductDraft::parse(input("Kettle", "-0.01", "Acme")).unwrap_err();
        assert_eq!(err, ProductError::Price(PriceError::Negative));
        assert_eq!(err.to_string(), "price cannot be negative");
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        let err = ProductDraft::parse(ProductInput {
            rating: Some("7"),
            ..input("Kettle", "3", "Acme")
        })
        .unwrap_err();
        assert!(matches!(err, ProductError::Rating(RatingError::OutOfRange { .. })));
    }

    #[test]
    fn explicit_fields_are_kept() {
        let draft = ProductDraft::parse(ProductInput {
            featured: true,
            rating: Some("4.5"),
            ..input("Kettle", "3.50", "Acme")
        })
        .unwrap();
        assert!(draft.featured());
        assert!((draft.rating().value() - 4.5).abs() < f64::EPSILON);
        assert_eq!(draft.price().to_string(), "3.50");
    }
}
