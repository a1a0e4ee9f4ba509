pub mod changes;
pub mod credentials;
pub mod errors;
pub mod models;
pub mod services;
