pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::{FieldError, StoreError, ValidationErrors};
pub use crate::core::models::{CartItem, Category, NewProduct, NewUser, Product, Role, User, UserProfile, cart_total};
pub use crate::core::services::StoreService;
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests; // Include integration tests
