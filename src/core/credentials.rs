use tracing::debug;

use crate::constants::{BCRYPT_COST, MAX_TOKENS, PASSWORD_MAX_LEN, PASSWORD_MIN_LEN};
use crate::core::changes::{ChangeSet, UserField};
use crate::core::errors::{FieldError, StoreError};
use crate::core::models::user::User;

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, StoreError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, StoreError>;
}

/// Salted bcrypt hashing at a fixed cost.
#[derive(Clone, Debug)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        BcryptHasher { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        BcryptHasher::new(BCRYPT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, StoreError> {
        bcrypt::hash(password, self.cost).map_err(|e| StoreError::HashError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, StoreError> {
        bcrypt::verify(password, hash).map_err(|e| StoreError::HashError(e.to_string()))
    }
}

/// Length is counted in UTF-16 code units, so the upper bound keeps every
/// accepted password within bcrypt's 72-byte input.
pub fn check_password_length(password: &str) -> Result<(), FieldError> {
    let len = password.encode_utf16().count();
    if (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(FieldError::new(
            "password",
            "Invalid password",
            format!(
                "Password must be between {} and {} characters",
                PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
            ),
        ))
    }
}

/// Keeps the `MAX_TOKENS` most recently appended tokens, oldest dropped first.
pub fn bound_tokens(tokens: &mut Vec<String>) {
    if tokens.len() > MAX_TOKENS {
        let excess = tokens.len() - MAX_TOKENS;
        tokens.drain(..excess);
    }
}

/// Pre-write step for user records: hashes a modified password and bounds
/// a modified token list. Leaves every other field alone.
#[derive(Clone, Debug, Default)]
pub struct CredentialPreparer<H: PasswordHasher = BcryptHasher> {
    hasher: H,
}

impl<H: PasswordHasher> CredentialPreparer<H> {
    pub fn new(hasher: H) -> Self {
        CredentialPreparer { hasher }
    }

    pub fn prepare(&self, mut user: User, changes: &ChangeSet) -> Result<User, StoreError> {
        if changes.is_modified(UserField::Password) {
            check_password_length(&user.password).map_err(|e| StoreError::Validation(e.into()))?;
            user.password = self.hasher.hash(&user.password)?;
            debug!(user_id = %user.id, "password hashed");
        }

        if changes.is_modified(UserField::Tokens) && user.tokens.len() > MAX_TOKENS {
            let dropped = user.tokens.len() - MAX_TOKENS;
            bound_tokens(&mut user.tokens);
            debug!(user_id = %user.id, dropped, "evicted oldest tokens");
        }

        Ok(user)
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, StoreError> {
        self.hasher.verify(password, hash)
    }
}
