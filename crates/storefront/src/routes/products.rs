//! Product route handlers.
//!
//! Listing routes are public. Everything that shows a form or changes the
//! catalog goes through [`RequireAuth`].

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use rablo_core::{ProductDraft, ProductError, ProductId, ProductInput};

use crate::db::ProductQuery;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireAuth, flash};
use crate::models::product::Product;
use crate::state::AppState;

/// Rating bound used by `/products/rating` when none (or garbage) is given.
pub const DEFAULT_MIN_RATING: f64 = 1.0;

const PRODUCT_NOT_FOUND: &str = "Product not found";

// =============================================================================
// Form and Query Types
// =============================================================================

/// Product form data, shared by the create and edit forms.
///
/// Every field is optional at the HTTP level; validation happens in
/// [`ProductDraft::parse`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    /// Checkbox: present means featured.
    pub featured: Option<String>,
    pub rating: String,
    pub company: String,
}

impl ProductForm {
    fn to_draft(&self) -> std::result::Result<ProductDraft, ProductError> {
        ProductDraft::parse(ProductInput {
            name: &self.name,
            price: &self.price,
            featured: self.featured.is_some(),
            rating: Some(&self.rating),
            company: &self.company,
        })
    }
}

/// Filters accepted by `/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub featured: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<String>,
}

/// Query for `/products/price`.
#[derive(Debug, Default, Deserialize)]
pub struct PriceQuery {
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
}

/// Query for `/products/rating`.
#[derive(Debug, Default, Deserialize)]
pub struct RatingQuery {
    #[serde(rename = "minRating")]
    pub min_rating: Option<String>,
}

/// Filter values echoed back into the filter form.
#[derive(Debug, Clone, Default)]
pub struct FilterValues {
    pub featured: bool,
    pub max_price: String,
    pub min_rating: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub heading: String,
    pub products: Vec<Product>,
    pub filters: FilterValues,
}

/// New product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/new.html")]
pub struct NewProductTemplate {
    pub page: PageContext,
}

/// Edit product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct EditProductTemplate {
    pub page: PageContext,
    pub product: Product,
}

// =============================================================================
// Listing Routes
// =============================================================================

/// Display the product listing, optionally filtered.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<ProductsIndexTemplate> {
    let featured_only = query.featured.as_deref().is_some_and(is_truthy);
    let max_price = parse_max_price(query.max_price.as_deref())?;
    let min_rating = non_blank(query.min_rating.as_deref()).map(|raw| parse_min_rating(Some(raw)));

    let filter = ProductQuery {
        featured_only,
        max_price,
        min_rating,
    };
    let products = state.products().list(&filter).await?;

    Ok(ProductsIndexTemplate {
        page: PageContext::load(&session).await,
        heading: "All products".to_owned(),
        products,
        filters: FilterValues {
            featured: featured_only,
            max_price: max_price.map(|m| m.to_string()).unwrap_or_default(),
            min_rating: min_rating.map(|r| r.to_string()).unwrap_or_default(),
        },
    })
}

/// Display featured products.
#[instrument(skip(state, page))]
pub async fn featured(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<ProductsIndexTemplate> {
    let products = state.products().list(&ProductQuery::featured()).await?;

    Ok(ProductsIndexTemplate {
        page,
        heading: "Featured products".to_owned(),
        products,
        filters: FilterValues {
            featured: true,
            ..FilterValues::default()
        },
    })
}

/// Display products cheaper than `maxPrice`.
///
/// Without `maxPrice` every product is listed.
#[instrument(skip(state, session))]
pub async fn by_price(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PriceQuery>,
) -> Result<ProductsIndexTemplate> {
    let max_price = parse_max_price(query.max_price.as_deref())?;
    let filter = max_price.map_or_else(ProductQuery::all, ProductQuery::price_below);
    let products = state.products().list(&filter).await?;

    let heading = max_price.map_or_else(
        || "All products".to_owned(),
        |max| format!("Products under ${max}"),
    );

    Ok(ProductsIndexTemplate {
        page: PageContext::load(&session).await,
        heading,
        products,
        filters: FilterValues {
            max_price: max_price.map(|m| m.to_string()).unwrap_or_default(),
            ..FilterValues::default()
        },
    })
}

/// Display products rated at least `minRating` (default 1).
#[instrument(skip(state, page))]
pub async fn by_rating(
    State(state): State<AppState>,
    page: PageContext,
    Query(query): Query<RatingQuery>,
) -> Result<ProductsIndexTemplate> {
    let min_rating = parse_min_rating(query.min_rating.as_deref());
    let products = state
        .products()
        .list(&ProductQuery::rating_at_least(min_rating))
        .await?;

    Ok(ProductsIndexTemplate {
        page,
        heading: format!("Products rated {min_rating} and up"),
        products,
        filters: FilterValues {
            min_rating: min_rating.to_string(),
            ..FilterValues::default()
        },
    })
}

// =============================================================================
// Create Routes
// =============================================================================

/// Display the new product form.
pub async fn new_form(RequireAuth(_user): RequireAuth, page: PageContext) -> NewProductTemplate {
    NewProductTemplate { page }
}

/// Handle new product form submission.
#[instrument(skip(state, session, form), fields(user_id = %user.id))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected product form");
            flash::error(&session, e.to_string()).await?;
            return Ok(Redirect::to("/products/new").into_response());
        }
    };

    let product = state.products().create(&draft).await?;
    tracing::info!(product_id = %product.id, "Product created");
    let product_id = product.id.to_string();
    add_breadcrumb("product", "Created product", Some(&[("product_id", product_id.as_str())]));

    flash::success(&session, "New Product added").await?;
    Ok(Redirect::to("/products").into_response())
}

// =============================================================================
// Edit Routes
// =============================================================================

/// Display the edit form for an existing product.
#[instrument(skip(state, session), fields(user_id = %user.id))]
pub async fn edit_form(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<String>,
) -> Result<EditProductTemplate> {
    let id = parse_product_id(&product_id)?;
    let product = state
        .products()
        .get(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(EditProductTemplate {
        page: PageContext::load(&session).await,
        product,
    })
}

/// Handle edit form submission (PUT or PATCH).
///
/// Every editable field is replaced; an unchecked featured box means `false`.
#[instrument(skip(state, session, form), fields(user_id = %user.id))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = parse_product_id(&product_id)?;

    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(e) => {
            // Report a missing product before complaining about its form.
            if state.products().get(id).await?.is_none() {
                return Err(not_found());
            }
            tracing::debug!(error = %e, "Rejected product form");
            flash::error(&session, e.to_string()).await?;
            return Ok(Redirect::to(&format!("/products/edit/{id}")).into_response());
        }
    };

    let product = state
        .products()
        .update(id, &draft)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(product_id = %product.id, "Product updated");
    let product_id = product.id.to_string();
    add_breadcrumb("product", "Updated product", Some(&[("product_id", product_id.as_str())]));

    flash::success(&session, "Product Updated").await?;
    Ok(Redirect::to("/products").into_response())
}

/// Delete a product.
#[instrument(skip(state, session), fields(user_id = %user.id))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Response> {
    let id = parse_product_id(&product_id)?;
    let product = state.products().delete(id).await?.ok_or_else(not_found)?;
    tracing::info!(product_id = %product.id, name = %product.name, "Product deleted");
    let product_id = product.id.to_string();
    add_breadcrumb("product", "Deleted product", Some(&[("product_id", product_id.as_str())]));

    flash::success(&session, "Product deleted").await?;
    Ok(Redirect::to("/products").into_response())
}

// =============================================================================
// Helpers
// =============================================================================

fn not_found() -> AppError {
    AppError::NotFound(PRODUCT_NOT_FOUND.to_owned())
}

/// A malformed ID cannot name an existing product, so it is a 404 too.
fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|_| not_found())
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "on" | "1" | "yes")
}

/// Parse the `maxPrice` bound. Blank means no bound.
fn parse_max_price(raw: Option<&str>) -> Result<Option<Decimal>> {
    non_blank(raw)
        .map(|s| {
            Decimal::from_str(s)
                .map_err(|_| AppError::BadRequest(format!("maxPrice must be a number, got {s:?}")))
        })
        .transpose()
}

/// Parse the `minRating` bound, falling back to [`DEFAULT_MIN_RATING`] when
/// it is missing, not a number, or not finite.
fn parse_min_rating(raw: Option<&str>) -> f64 {
    non_blank(raw)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_MIN_RATING)
}
