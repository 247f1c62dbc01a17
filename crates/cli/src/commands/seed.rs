//! Seed the catalog with products from a YAML file.
//!
//! The file is a list of products:
//!
//! ```yaml
//! - name: Desk Lamp
//!   price: "24.99"
//!   company: Lumen
//!   featured: true
//!   rating: 4.5
//! ```
//!
//! `featured` and `rating` are optional. Every entry is validated before the
//! database is touched; one bad entry aborts the whole seed.

use std::path::Path;

use rablo_core::{ProductDraft, ProductInput};
use rablo_storefront::db::{PgProductStore, ProductStore};
use serde::Deserialize;
use tracing::{error, info};

use super::{CommandError, connect};

/// One product entry in a seed file.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub price: String,
    pub company: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl SeedProduct {
    fn to_draft(&self) -> Result<ProductDraft, rablo_core::ProductError> {
        let rating = self.rating.map(|r| r.to_string());
        ProductDraft::parse(ProductInput {
            name: &self.name,
            price: &self.price,
            featured: self.featured,
            rating: rating.as_deref(),
            company: &self.company,
        })
    }
}

/// Parse and validate a seed file's contents.
///
/// Invalid entries are logged with their position before failing.
///
/// # Errors
///
/// Returns `CommandError::Yaml` for malformed YAML and
/// `CommandError::InvalidSeed` if any entry fails validation.
pub fn parse_seed(content: &str) -> Result<Vec<ProductDraft>, CommandError> {
    let entries: Vec<SeedProduct> = serde_yaml::from_str(content)?;

    let mut drafts = Vec::with_capacity(entries.len());
    let mut invalid = 0;
    for (index, entry) in entries.iter().enumerate() {
        match entry.to_draft() {
            Ok(draft) => drafts.push(draft),
            Err(e) => {
                error!(entry = index + 1, name = %entry.name, "Invalid product: {e}");
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        return Err(CommandError::InvalidSeed(invalid));
    }
    Ok(drafts)
}

/// Seed products from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML product list
/// * `clear_existing` - If true, delete every existing product first
///
/// # Errors
///
/// Returns an error if the file cannot be read or validated, or a store
/// operation fails.
pub async fn products(file_path: &str, clear_existing: bool) -> Result<(), CommandError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading products from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: file_path.to_owned(),
            source,
        })?;
    let drafts = parse_seed(&content)?;
    info!(products = drafts.len(), "Seed file validated");

    let store = PgProductStore::new(connect().await?);

    if clear_existing {
        let removed = store.delete_all().await?;
        info!(removed, "Cleared existing products");
    }

    for draft in &drafts {
        let product = store.create(draft).await?;
        info!(product_id = %product.id, name = %product.name, "Inserted product");
    }

    info!("Seeding complete! {} products inserted", drafts.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_products_with_defaults() {
        let yaml = r#"
- name: Desk Lamp
  price: "24.99"
  company: Lumen
  featured: true
  rating: 4.5
- name: Pencil
  price: "0.99"
  company: Graphite Co
"#;
        let drafts = parse_seed(yaml).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].name(), "Desk Lamp");
        assert!(drafts[0].featured());
        assert!((drafts[0].rating().value() - 4.5).abs() < f64::EPSILON);
        assert!(!drafts[1].featured());
        assert!((drafts[1].rating().value()).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_invalid_entries() {
        let yaml = r#"
- name: Desk Lamp
  price: "-1"
  company: Lumen
- name: ""
  price: "2"
  company: Lumen
- name: Pencil
  price: "1"
  company: Graphite Co
"#;
        assert!(matches!(
            parse_seed(yaml),
            Err(CommandError::InvalidSeed(2))
        ));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(matches!(
            parse_seed("name: [unclosed"),
            Err(CommandError::Yaml(_))
        ));
    }
}
