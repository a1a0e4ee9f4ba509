use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{ACCOUNT_MAX_LEN, ACCOUNT_MIN_LEN, CART_QUANTITY_MAX, CART_QUANTITY_MIN};
use crate::core::errors::{FieldError, ValidationErrors};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

/// Cart entry. `product` is a product id; the product itself is not owned.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub product: String,
    pub quantity: u32,
}

/// Registration input. `password` is plaintext here.
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub account: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub account: String,
    pub email: String,
    /// Plaintext while a write is in flight, a bcrypt hash once committed.
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub cart: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("account", &self.account)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("tokens", &self.tokens.len())
            .field("cart", &self.cart)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Sum of quantities across the line items.
pub fn cart_total(items: &[CartItem]) -> u32 {
    items.iter().map(|item| item.quantity).sum()
}

impl User {
    pub fn cart_total(&self) -> u32 {
        cart_total(&self.cart)
    }

    pub fn normalize(&mut self) {
        self.account = self.account.trim().to_string();
        self.email = self.email.trim().to_string();
    }

    /// Schema rules for every field except the password length, which only
    /// applies to plaintext and is checked when credentials are prepared.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let account_len = self.account.chars().count();
        if account_len == 0 {
            errors.add_error(FieldError::new("account", "Missing account", "Account is required"));
        } else if !(ACCOUNT_MIN_LEN..=ACCOUNT_MAX_LEN).contains(&account_len) {
            errors.add_error(FieldError::new(
                "account",
                "Invalid account",
                format!(
                    "Account must be between {} and {} characters",
                    ACCOUNT_MIN_LEN, ACCOUNT_MAX_LEN
                ),
            ));
        } else if !self.account.chars().all(|c| c.is_ascii_alphanumeric()) {
            errors.add_error(FieldError::new(
                "account",
                "Invalid account",
                "Account may only contain letters and digits",
            ));
        }

        if self.email.is_empty() {
            errors.add_error(FieldError::new("email", "Missing email", "Email is required"));
        } else if !EMAIL_RE.is_match(&self.email) {
            errors.add_error(FieldError::new(
                "email",
                "Invalid email",
                "Please enter a valid email address",
            ));
        }

        if self.password.is_empty() {
            errors.add_error(FieldError::new("password", "Missing password", "Password is required"));
        }

        for (index, item) in self.cart.iter().enumerate() {
            let field = format!("cart.{}", index);
            if item.product.trim().is_empty() {
                errors.add_error(FieldError::new(
                    &format!("{}.product", field),
                    "Missing product",
                    "Product is required",
                ));
            }
            if !(CART_QUANTITY_MIN..=CART_QUANTITY_MAX).contains(&item.quantity) {
                errors.add_error(FieldError::new(
                    &format!("{}.quantity", field),
                    "Invalid quantity",
                    format!(
                        "Quantity must be between {} and {}",
                        CART_QUANTITY_MIN, CART_QUANTITY_MAX
                    ),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Outward view of a user: no password, `cart_total` derived at read time.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub account: String,
    pub email: String,
    pub role: Role,
    pub cart: Vec<CartItem>,
    pub cart_total: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id.clone(),
            account: user.account.clone(),
            email: user.email.clone(),
            role: user.role,
            cart: user.cart.clone(),
            cart_total: user.cart_total(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
