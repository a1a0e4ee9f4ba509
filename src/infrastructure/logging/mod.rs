pub mod in_memory;

use crate::core::errors::StoreError;
use crate::core::models::audit::AppLog;
use async_trait::async_trait;

#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), StoreError>;
    async fn get_logs(&self) -> Result<Vec<AppLog>, StoreError>;
    /// Entries whose actor is `user_id`, oldest first.
    async fn get_user_logs(&self, user_id: &str) -> Result<Vec<AppLog>, StoreError>;
}
