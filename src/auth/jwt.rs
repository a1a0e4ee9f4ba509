use crate::core::errors::StoreError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // User ID
    pub role: String, // "user" or "admin"
    pub jti: String,  // Unique per issued token
    pub iat: usize,
    pub exp: usize,
}

/// Signs the opaque strings stored in a user's token list.
pub struct TokenIssuer {
    secret: String,
    ttl_secs: u64,
}

impl TokenIssuer {
    pub fn new(secret: String, ttl_secs: u64) -> Self {
        TokenIssuer { secret, ttl_secs }
    }

    pub fn issue(&self, user_id: &str, role: &str) -> Result<String, StoreError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| StoreError::TokenError(format!("Time error: {}", e)))?;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now as usize,
            exp: (now + self.ttl_secs) as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| StoreError::TokenError(format!("JWT encoding error: {}", e)))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, StoreError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| StoreError::TokenError(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_are_unique_and_decode() {
        let issuer = TokenIssuer::new("test-secret".to_string(), 60);
        let first = issuer.issue("u1", "user").unwrap();
        let second = issuer.issue("u1", "user").unwrap();
        assert_ne!(first, second);

        let claims = issuer.decode(&first).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let token = TokenIssuer::new("one".to_string(), 60).issue("u1", "admin").unwrap();
        let result = TokenIssuer::new("two".to_string(), 60).decode(&token);
        assert!(matches!(result, Err(StoreError::TokenError(_))));
    }
}
