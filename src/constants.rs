// Audit actions
pub const USER_SAVED: &str = "USER_SAVED";
pub const USER_REGISTERED: &str = "USER_REGISTERED";
pub const TOKEN_ISSUED: &str = "TOKEN_ISSUED";
pub const TOKEN_REVOKED: &str = "TOKEN_REVOKED";
pub const PRODUCT_CREATED: &str = "PRODUCT_CREATED";
pub const PRODUCT_UPDATED: &str = "PRODUCT_UPDATED";
pub const PRODUCT_DELETED: &str = "PRODUCT_DELETED";

// User document
pub const ACCOUNT_MIN_LEN: usize = 4;
pub const ACCOUNT_MAX_LEN: usize = 20;
pub const PASSWORD_MIN_LEN: usize = 4;
pub const PASSWORD_MAX_LEN: usize = 20;
pub const BCRYPT_COST: u32 = 10;
pub const MAX_TOKENS: usize = 3;
pub const CART_QUANTITY_MIN: u32 = 1;
pub const CART_QUANTITY_MAX: u32 = 100;

// Product document
pub const PRODUCT_NAME_MIN_LEN: usize = 1;
pub const PRODUCT_NAME_MAX_LEN: usize = 100;
pub const PRODUCT_DESCRIPTION_MAX_LEN: usize = 500;
