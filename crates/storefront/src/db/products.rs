//! `PostgreSQL` product store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use rablo_core::{Price, ProductDraft, ProductId, Rating};

use super::{ProductQuery, ProductStore, RepositoryError};
use crate::models::product::Product;

const PRODUCT_COLUMNS: &str = "product_id, name, price, featured, rating, company, created_at";

/// Product store backed by the `catalog.product` table.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a new product store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove every product. Returns the number of rows deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.product")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: Uuid,
    name: String,
    price: Decimal,
    featured: bool,
    rating: f64,
    company: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;
        let rating = Rating::new(row.rating).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid rating in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::from_uuid(row.product_id),
            name: row.name,
            price,
            featured: row.featured,
            rating,
            company: row.company,
            created_at: row.created_at,
        })
    }
}

fn into_product(row: Option<ProductRow>) -> Result<Option<Product>, RepositoryError> {
    row.map(Product::try_from).transpose()
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT ");
        builder.push(PRODUCT_COLUMNS);
        builder.push(" FROM catalog.product WHERE TRUE");

        if query.featured_only {
            builder.push(" AND featured");
        }
        if let Some(max_price) = query.max_price {
            builder.push(" AND price < ").push_bind(max_price);
        }
        if let Some(min_rating) = query.min_rating {
            builder.push(" AND rating >= ").push_bind(min_rating);
        }
        builder.push(" ORDER BY created_at ASC, product_id ASC");

        let rows: Vec<ProductRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product WHERE product_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        into_product(row)
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO catalog.product (product_id, name, price, featured, rating, company, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(ProductId::generate().as_uuid())
        .bind(draft.name())
        .bind(draft.price().amount())
        .bind(draft.featured())
        .bind(draft.rating().value())
        .bind(draft.company())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Product::try_from(row)
    }

    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r"
            UPDATE catalog.product
            SET name = $2, price = $3, featured = $4, rating = $5, company = $6
            WHERE product_id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id.as_uuid())
        .bind(draft.name())
        .bind(draft.price().amount())
        .bind(draft.featured())
        .bind(draft.rating().value())
        .bind(draft.company())
        .fetch_optional(&self.pool)
        .await?;

        into_product(row)
    }

    async fn delete(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "DELETE FROM catalog.product WHERE product_id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        into_product(row)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
