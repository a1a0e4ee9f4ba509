use crate::core::errors::StoreError;
use crate::core::models::{product::Product, user::User};
use async_trait::async_trait;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Fails with `Duplicate` when `account` or `email` is taken.
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;
    async fn update_user(&self, user: User) -> Result<User, StoreError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;
    async fn get_user_by_account(&self, account: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn insert_product(&self, product: Product) -> Result<Product, StoreError>;
    async fn update_product(&self, product: Product) -> Result<Product, StoreError>;
    async fn get_product(&self, product_id: &str) -> Result<Option<Product>, StoreError>;
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn delete_product(&self, product_id: &str) -> Result<(), StoreError>;
}

pub mod in_memory;
