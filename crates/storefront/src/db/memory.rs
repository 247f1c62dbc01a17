//! In-process stores.
//!
//! Used when `CATALOG_STORAGE=memory` and by the test suite. Data is lost
//! when the process exits.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use rablo_core::{Email, ProductDraft, ProductId, UserId, Username};

use super::{ProductQuery, ProductStore, RepositoryError, UserStore};
use crate::models::product::Product;
use crate::models::user::User;

/// Product store holding products in insertion order.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| query.matches(p)).cloned().collect())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let product = Product::new(ProductId::generate(), draft, Utc::now());
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            product.apply(draft);
            product.clone()
        }))
    }

    async fn delete(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let mut products = self.products.write().await;
        Ok(products
            .iter()
            .position(|p| p.id == id)
            .map(|index| products.remove(index)))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[derive(Debug)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// Account store with sequential IDs starting at 1.
#[derive(Debug)]
pub struct MemoryUserStore {
    users: RwLock<Vec<StoredUser>>,
    next_id: AtomicI32,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_with_password(
        &self,
        username: &Username,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| &u.user.username == username) {
            return Err(RepositoryError::Conflict("username already exists".to_owned()));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(self.next_id.fetch_add(1, Ordering::Relaxed)),
            username: username.clone(),
            email: email.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(user)
    }

    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| &u.user.username == username)
            .map(|u| (u.user.clone(), u.password_hash.clone())))
    }
}
