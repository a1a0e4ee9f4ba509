use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: &str, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.to_string(),
            description: description.into(),
        }
    }
}

/// All field failures collected from a single write attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// `Ok(())` when nothing was collected, otherwise the whole set as a `StoreError`.
    pub fn into_result(self) -> Result<(), StoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation(self))
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        ValidationErrors { errors: vec![error] }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.description))
            .collect::<Vec<_>>();
        write!(f, "{}", fields.join("; "))
    }
}

#[derive(Error, Debug, Serialize)]
pub enum StoreError {
    /// One or more document fields failed validation
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A unique field already holds this value in another document
    #[error("Duplicate value for `{field}`: {value}")]
    Duplicate { field: String, value: String },

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Product {0} not found")]
    ProductNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Password hashing error: {0}")]
    HashError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl StoreError {
    /// The collected field errors, when this is a validation failure.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            StoreError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors)
    }
}
