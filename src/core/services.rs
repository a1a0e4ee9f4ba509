use crate::auth::jwt::TokenIssuer;
use crate::config::CONFIG;
use crate::constants::{
    PRODUCT_CREATED, PRODUCT_DELETED, PRODUCT_UPDATED, TOKEN_ISSUED, TOKEN_REVOKED, USER_REGISTERED, USER_SAVED,
};
use crate::core::changes::{ChangeSet, UserField};
use crate::core::credentials::{CredentialPreparer, check_password_length};
use crate::core::errors::StoreError;
use crate::core::models::{
    audit::AppLog,
    product::{NewProduct, Product},
    user::{CartItem, NewUser, Role, User, UserProfile},
};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct StoreService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
    preparer: CredentialPreparer,
    tokens: TokenIssuer,
}

impl<L: LoggingService, S: Storage> StoreService<L, S> {
    pub fn new(storage: S, logging: L, jwt_secret: String, token_ttl_secs: u64) -> Self {
        StoreService {
            storage,
            logging,
            preparer: CredentialPreparer::default(),
            tokens: TokenIssuer::new(jwt_secret, token_ttl_secs),
        }
    }

    pub fn from_config(storage: S, logging: L) -> Self {
        Self::new(storage, logging, CONFIG.jwt_secret.clone(), CONFIG.token_ttl_secs)
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, StoreError> {
        self.preparer.verify(password, hash)
    }

    // USERS

    pub async fn register_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            account: new_user.account,
            email: new_user.email,
            password: new_user.password,
            role: new_user.role.unwrap_or_default(),
            tokens: Vec::new(),
            cart: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.write_user(user, USER_REGISTERED).await
    }

    /// The user write path. Validates the candidate, diffs it against the
    /// committed record, prepares credentials and commits. Nothing is
    /// committed when any step fails.
    pub async fn save_user(&self, candidate: User) -> Result<User, StoreError> {
        self.write_user(candidate, USER_SAVED).await
    }

    async fn write_user(&self, mut candidate: User, action: &str) -> Result<User, StoreError> {
        candidate.normalize();

        let previous = self.storage.get_user(&candidate.id).await?;
        let changes = ChangeSet::between(previous.as_ref(), &candidate);

        if let Some(previous) = previous.as_ref() {
            if changes.is_empty() {
                debug!(user_id = %previous.id, "no fields modified, skipping write");
                return Ok(previous.clone());
            }
        }

        let mut errors = candidate.validate().err().unwrap_or_default();
        if changes.is_modified(UserField::Password) && !candidate.password.is_empty() {
            if let Err(e) = check_password_length(&candidate.password) {
                errors.add_error(e);
            }
        }
        if !errors.is_empty() {
            warn!(user_id = %candidate.id, errors = %errors, "user write rejected");
            return Err(StoreError::Validation(errors));
        }

        let mut prepared = self.preparer.prepare(candidate, &changes)?;
        prepared.updated_at = Utc::now();

        let committed = match previous {
            Some(previous) => {
                prepared.created_at = previous.created_at;
                self.storage.update_user(prepared).await?
            }
            None => self.storage.insert_user(prepared).await?,
        };

        info!(user_id = %committed.id, modified = ?changes.field_names(), "user saved");
        self.logging
            .log_action(
                action,
                json!({
                    "user_id": committed.id,
                    "account": committed.account,
                    "modified": changes.field_names(),
                }),
                Some(committed.id.as_str()),
            )
            .await?;

        Ok(committed)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        self.storage.get_user(user_id).await
    }

    async fn require_user(&self, user_id: &str) -> Result<User, StoreError> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.storage.list_users().await
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        let user = self.require_user(user_id).await?;
        Ok(UserProfile::from(&user))
    }

    pub async fn cart_total(&self, user_id: &str) -> Result<u32, StoreError> {
        Ok(self.require_user(user_id).await?.cart_total())
    }

    pub async fn change_password(&self, user_id: &str, password: &str) -> Result<User, StoreError> {
        let mut user = self.require_user(user_id).await?;
        user.password = password.to_string();
        self.save_user(user).await
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<User, StoreError> {
        let mut user = self.require_user(user_id).await?;
        user.role = role;
        self.save_user(user).await
    }

    /// Appends a token; the write path evicts the oldest beyond the bound.
    pub async fn push_token(&self, user_id: &str, token: String) -> Result<User, StoreError> {
        let mut user = self.require_user(user_id).await?;
        user.tokens.push(token);
        self.save_user(user).await
    }

    pub async fn sign_in(&self, account: &str, password: &str) -> Result<String, StoreError> {
        let user = self
            .storage
            .get_user_by_account(account.trim())
            .await?
            .ok_or(StoreError::InvalidCredentials)?;

        if !self.preparer.verify(password, &user.password)? {
            warn!(user_id = %user.id, "sign-in rejected");
            return Err(StoreError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id, &user.role.to_string())?;
        let user = self.push_token(&user.id, token.clone()).await?;

        self.logging
            .log_action(
                TOKEN_ISSUED,
                json!({ "user_id": user.id, "active_tokens": user.tokens.len() }),
                Some(user.id.as_str()),
            )
            .await?;
        Ok(token)
    }

    pub async fn sign_out(&self, user_id: &str, token: &str) -> Result<User, StoreError> {
        let mut user = self.require_user(user_id).await?;
        let before = user.tokens.len();
        user.tokens.retain(|t| t != token);
        if user.tokens.len() == before {
            debug!(user_id = %user.id, "token not held, nothing to revoke");
            return Ok(user);
        }

        let user = self.save_user(user).await?;
        self.logging
            .log_action(
                TOKEN_REVOKED,
                json!({ "user_id": user.id, "active_tokens": user.tokens.len() }),
                Some(user.id.as_str()),
            )
            .await?;
        Ok(user)
    }

    /// Adds `quantity` of a product, merging with an existing line for it.
    pub async fn add_to_cart(&self, user_id: &str, product_id: &str, quantity: u32) -> Result<User, StoreError> {
        let product = self
            .storage
            .get_product(product_id)
            .await?
            .ok_or_else(|| StoreError::ProductNotFound(product_id.to_string()))?;

        let mut user = self.require_user(user_id).await?;
        match user.cart.iter_mut().find(|item| item.product == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => user.cart.push(CartItem {
                product: product.id.clone(),
                quantity,
            }),
        }
        self.save_user(user).await
    }

    pub async fn remove_from_cart(&self, user_id: &str, product_id: &str) -> Result<User, StoreError> {
        let mut user = self.require_user(user_id).await?;
        user.cart.retain(|item| item.product != product_id);
        self.save_user(user).await
    }

    // PRODUCTS

    pub async fn create_product(&self, mut new_product: NewProduct) -> Result<Product, StoreError> {
        new_product.normalize();
        new_product.validate()?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new_product.name,
            price: new_product.price,
            description: new_product.description,
            category: new_product.category,
            sell: new_product.sell,
            image: new_product.image,
            created_at: now,
            updated_at: now,
        };
        let product = self.storage.insert_product(product).await?;

        info!(product_id = %product.id, category = %product.category, "product created");
        self.logging
            .log_action(
                PRODUCT_CREATED,
                json!({ "product_id": product.id, "name": product.name }),
                None,
            )
            .await?;
        Ok(product)
    }

    pub async fn update_product(&self, mut product: Product) -> Result<Product, StoreError> {
        let existing = self
            .storage
            .get_product(&product.id)
            .await?
            .ok_or_else(|| StoreError::ProductNotFound(product.id.clone()))?;

        product.normalize();
        product.validate()?;
        product.created_at = existing.created_at;
        product.updated_at = Utc::now();

        let product = self.storage.update_product(product).await?;
        info!(product_id = %product.id, "product updated");
        self.logging
            .log_action(
                PRODUCT_UPDATED,
                json!({ "product_id": product.id, "name": product.name }),
                None,
            )
            .await?;
        Ok(product)
    }

    pub async fn get_product(&self, product_id: &str) -> Result<Option<Product>, StoreError> {
        self.storage.get_product(product_id).await
    }

    pub async fn list_products(&self, on_sale_only: bool) -> Result<Vec<Product>, StoreError> {
        let products = self.storage.list_products().await?;
        Ok(products.into_iter().filter(|p| !on_sale_only || p.sell).collect())
    }

    /// Cart lines pointing at the product are left in place.
    pub async fn delete_product(&self, product_id: &str) -> Result<(), StoreError> {
        self.storage.delete_product(product_id).await?;
        info!(product_id, "product deleted");
        self.logging
            .log_action(PRODUCT_DELETED, json!({ "product_id": product_id }), None)
            .await
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, StoreError> {
        self.logging.get_logs().await
    }

    pub async fn get_user_logs(&self, user_id: &str) -> Result<Vec<AppLog>, StoreError> {
        self.logging.get_user_logs(user_id).await
    }
}
