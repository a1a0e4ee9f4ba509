pub mod audit;
pub mod product;
pub mod user;

pub use audit::AppLog;
pub use product::{Category, NewProduct, Product};
pub use user::{CartItem, NewUser, Role, User, UserProfile, cart_total};
