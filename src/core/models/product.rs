use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{PRODUCT_DESCRIPTION_MAX_LEN, PRODUCT_NAME_MAX_LEN, PRODUCT_NAME_MIN_LEN};
use crate::core::errors::{FieldError, ValidationErrors};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Books,
    Clothing,
    Home,
    Beauty,
    Food,
    Electronics,
    Toys,
    Appliances,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Books,
        Category::Clothing,
        Category::Home,
        Category::Beauty,
        Category::Food,
        Category::Electronics,
        Category::Toys,
        Category::Appliances,
        Category::Other,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Books => "books",
            Category::Clothing => "clothing",
            Category::Home => "home",
            Category::Beauty => "beauty",
            Category::Food => "food",
            Category::Electronics => "electronics",
            Category::Toys => "toys",
            Category::Appliances => "appliances",
            Category::Other => "other",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Category {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.to_string() == s)
            .ok_or_else(|| FieldError::new("category", "Invalid category", "Please choose a valid product category"))
    }
}

fn default_sell() -> bool {
    true
}

/// Catalog input before an id and timestamps are assigned.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
    #[serde(default = "default_sell")]
    pub sell: bool,
    pub image: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub category: Category,
    pub sell: bool,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewProduct {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.description = trim_description(self.description.take());
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_fields(&self.name, self.price, self.description.as_deref(), &self.image)
    }
}

impl Product {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.description = trim_description(self.description.take());
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_fields(&self.name, self.price, self.description.as_deref(), &self.image)
    }
}

fn trim_description(description: Option<String>) -> Option<String> {
    description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty())
}

fn validate_fields(name: &str, price: f64, description: Option<&str>, image: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name_len = name.encode_utf16().count();
    if name_len < PRODUCT_NAME_MIN_LEN {
        errors.add_error(FieldError::new("name", "Missing name", "Product name is required"));
    } else if name_len > PRODUCT_NAME_MAX_LEN {
        errors.add_error(FieldError::new(
            "name",
            "Name Too Long",
            format!("Product name cannot exceed {} characters", PRODUCT_NAME_MAX_LEN),
        ));
    }

    if !price.is_finite() {
        errors.add_error(FieldError::new("price", "Invalid price", "Price must be a finite number"));
    } else if price < 0.0 {
        errors.add_error(FieldError::new("price", "Invalid price", "Price cannot be negative"));
    }

    if let Some(description) = description {
        if description.encode_utf16().count() > PRODUCT_DESCRIPTION_MAX_LEN {
            errors.add_error(FieldError::new(
                "description",
                "Description Too Long",
                format!("Description cannot exceed {} characters", PRODUCT_DESCRIPTION_MAX_LEN),
            ));
        }
    }

    if image.trim().is_empty() {
        errors.add_error(FieldError::new("image", "Missing image", "Product image is required"));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
