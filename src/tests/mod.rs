mod user_tests;

use crate::config::init_tracing;
use crate::core::models::product::{Category, NewProduct, Product};
use crate::core::models::user::{NewUser, User};
use crate::core::services::StoreService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub fn create_test_service() -> StoreService<InMemoryLogging, InMemoryStorage> {
    init_tracing();
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    StoreService::new(storage, logging, "test-secret".to_string(), 3600)
}

pub fn new_user(account: &str, password: &str) -> NewUser {
    NewUser {
        account: account.to_string(),
        email: format!("{}@example.com", account),
        password: password.to_string(),
        role: None,
    }
}

pub async fn register(service: &StoreService<InMemoryLogging, InMemoryStorage>, account: &str) -> User {
    service.register_user(new_user(account, "pass1234")).await.unwrap()
}

pub async fn create_product(service: &StoreService<InMemoryLogging, InMemoryStorage>, name: &str) -> Product {
    service
        .create_product(NewProduct {
            name: name.to_string(),
            price: 12.0,
            description: None,
            category: Category::Books,
            sell: true,
            image: format!("/uploads/{}.png", name),
        })
        .await
        .unwrap()
}
