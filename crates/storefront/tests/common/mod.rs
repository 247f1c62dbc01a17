//! Shared harness for the route tests.
//!
//! Builds the real router over in-process stores and drives it with
//! `tower::ServiceExt::oneshot`, carrying the session cookie between
//! requests like a browser would.

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use rablo_core::{ProductDraft, ProductInput};
use rablo_storefront::app::{self, CatalogService};
use rablo_storefront::config::{CatalogConfig, SentryConfig, StorageBackend};
use rablo_storefront::db::{MemoryProductStore, MemoryUserStore, ProductStore, UserStore};
use rablo_storefront::models::product::Product;
use rablo_storefront::services::auth::AuthService;
use rablo_storefront::state::AppState;

/// Password used by [`TestApp::signup`] and [`TestApp::register`].
pub const PASSWORD: &str = "correct horse battery";

pub fn test_config() -> CatalogConfig {
    CatalogConfig {
        storage: StorageBackend::Memory,
        database_url: None,
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost:8080".to_owned(),
        session_secret: SecretString::from("q7Zp2LmX9vR4tY8wK3nB6cF1hJ5dG0sA"),
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        sentry: SentryConfig::default(),
    }
}

/// A simplified HTTP response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Assert this is a 303 redirect to exactly `path`.
    pub fn assert_redirect_to(&self, path: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        let location = self.location.as_deref().unwrap_or_default();
        assert_eq!(location, path);
    }
}

/// One browser talking to one app instance.
pub struct TestApp {
    service: CatalogService,
    cookie: Option<String>,
    pub products: Arc<dyn ProductStore>,
    pub users: Arc<dyn UserStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_products(Arc::new(MemoryProductStore::new()))
    }

    pub fn with_products(products: Arc<dyn ProductStore>) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        let state = AppState::new(test_config(), Arc::clone(&products), Arc::clone(&users));
        let router = app::router(state, MemoryStore::default());

        Self {
            service: app::service(router),
            cookie: None,
            products,
            users,
        }
    }

    pub async fn request(
        &mut self,
        method: Method,
        uri: &str,
        form: Option<&[(&str, &str)]>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = match form {
            Some(fields) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields)
                    .finish();
                Body::from(encoded)
            }
            None => Body::empty(),
        };

        let response = self
            .service
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            let value = pair.split_once('=').map(|(_, v)| v).unwrap_or_default();
            self.cookie = if value.is_empty() {
                None
            } else {
                Some(pair.to_owned())
            };
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_owned());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        self.request(Method::POST, uri, Some(form)).await
    }

    /// Sign up through the form; leaves this client logged in.
    pub async fn signup(&mut self, username: &str) -> TestResponse {
        let email = format!("{username}@example.com");
        self.post(
            "/signup",
            &[
                ("username", username),
                ("email", email.as_str()),
                ("password", PASSWORD),
            ],
        )
        .await
    }

    /// Create an account directly in the store, without logging in.
    pub async fn register(&self, username: &str) {
        AuthService::new(self.users.as_ref())
            .register(username, &format!("{username}@example.com"), PASSWORD)
            .await
            .unwrap();
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post("/login", &[("username", username), ("password", password)])
            .await
    }

    /// Insert a product directly into the store.
    pub async fn seed_product(
        &self,
        name: &str,
        price: &str,
        rating: &str,
        featured: bool,
    ) -> Product {
        let draft = ProductDraft::parse(ProductInput {
            name,
            price,
            featured,
            rating: Some(rating),
            company: "Acme",
        })
        .unwrap();
        self.products.create(&draft).await.unwrap()
    }

    pub async fn product_count(&self) -> usize {
        self.products
            .list(&rablo_storefront::db::ProductQuery::all())
            .await
            .unwrap()
            .len()
    }
}
