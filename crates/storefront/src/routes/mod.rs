//! HTTP route handlers for the catalog.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Redirect to /products
//!
//! # Products
//! GET    /products                  - Product listing (featured, maxPrice, minRating)
//! POST   /products                  - Create product (auth)
//! GET    /products/new              - New product form (auth)
//! GET    /products/featured         - Featured products
//! GET    /products/price            - Products under maxPrice
//! GET    /products/rating           - Products rated minRating or more (default 1)
//! GET    /products/edit/{id}        - Edit form (auth)
//! PUT    /products/{id}             - Update product (auth, also PATCH)
//! DELETE /products/{id}             - Delete product (auth)
//!
//! # Auth
//! GET  /signup                      - Signup page
//! POST /signup                      - Signup action
//! GET  /login                       - Login page
//! POST /login                       - Login action
//! GET  /logout                      - Logout action
//! ```
//!
//! Edit and delete forms reach `PUT`/`DELETE` through the `_method` query
//! override (see [`crate::middleware::method_override`]).

pub mod auth;
pub mod products;

use axum::{
    Router,
    response::Redirect,
    routing::{get, put},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_form))
        .route("/featured", get(products::featured))
        .route("/price", get(products::by_price))
        .route("/rating", get(products::by_rating))
        .route("/edit/{product_id}", get(products::edit_form))
        .route(
            "/{product_id}",
            put(products::update)
                .patch(products::update)
                .delete(products::delete),
        )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create all routes for the catalog.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        .nest("/products", product_routes())
        .merge(auth_routes())
}
