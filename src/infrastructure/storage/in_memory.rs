use crate::core::errors::StoreError;
use crate::core::models::{product::Product, user::User};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    users: Arc<RwLock<HashMap<String, User>>>,
    user_ids_by_account: Arc<RwLock<HashMap<String, String>>>,
    user_ids_by_email: Arc<RwLock<HashMap<String, String>>>,
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate(field: &str, value: &str) -> StoreError {
    StoreError::Duplicate {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// `true` when `key` is free or already belongs to `owner`.
fn is_free_for(index: &HashMap<String, String>, key: &str, owner: &str) -> bool {
    index.get(key).is_none_or(|id| id == owner)
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let mut by_account = self.user_ids_by_account.write().await;
        let mut by_email = self.user_ids_by_email.write().await;

        if users.contains_key(&user.id) {
            return Err(duplicate("id", &user.id));
        }
        if by_account.contains_key(&user.account) {
            return Err(duplicate("account", &user.account));
        }
        if by_email.contains_key(&user.email) {
            return Err(duplicate("email", &user.email));
        }

        by_account.insert(user.account.clone(), user.id.clone());
        by_email.insert(user.email.clone(), user.id.clone());
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let mut by_account = self.user_ids_by_account.write().await;
        let mut by_email = self.user_ids_by_email.write().await;

        let previous = users
            .get(&user.id)
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound(user.id.clone()))?;

        if !is_free_for(&by_account, &user.account, &user.id) {
            return Err(duplicate("account", &user.account));
        }
        if !is_free_for(&by_email, &user.email, &user.id) {
            return Err(duplicate("email", &user.email));
        }

        by_account.remove(&previous.account);
        by_email.remove(&previous.email);
        by_account.insert(user.account.clone(), user.id.clone());
        by_email.insert(user.email.clone(), user.id.clone());
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }

    async fn get_user_by_account(&self, account: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        let by_account = self.user_ids_by_account.read().await;
        Ok(by_account.get(account).and_then(|id| users.get(id).cloned()))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }

    async fn insert_product(&self, product: Product) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            return Err(duplicate("id", &product.id));
        }
        products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn update_product(&self, product: Product) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        if !products.contains_key(&product.id) {
            return Err(StoreError::ProductNotFound(product.id));
        }
        products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn get_product(&self, product_id: &str) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.get(product_id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by_key(|p| p.created_at);
        Ok(all)
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), StoreError> {
        let mut products = self.products.write().await;
        products
            .remove(product_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::ProductNotFound(product_id.to_string()))
    }
}
