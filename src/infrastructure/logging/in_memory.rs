use crate::core::errors::StoreError;
use crate::core::models::audit::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryLogging {
    logs: Arc<RwLock<Vec<AppLog>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Audit entries never carry credential material, at any nesting depth.
fn holds_password(details: &serde_json::Value) -> bool {
    match details {
        serde_json::Value::Object(map) => map
            .iter()
            .any(|(key, value)| key.eq_ignore_ascii_case("password") || holds_password(value)),
        serde_json::Value::Array(items) => items.iter().any(holds_password),
        _ => false,
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), StoreError> {
        if !details.is_object() && !details.is_null() {
            return Err(StoreError::LoggingError(format!(
                "Log details for {} must be a JSON object",
                action
            )));
        }
        if holds_password(&details) {
            return Err(StoreError::LoggingError(format!(
                "Log details for {} must not contain a password",
                action
            )));
        }

        let entry = AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id: user_id.map(String::from),
            details,
            timestamp: chrono::Utc::now(),
        };
        self.logs.write().await.push(entry);
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, StoreError> {
        Ok(self.logs.read().await.clone())
    }

    async fn get_user_logs(&self, user_id: &str) -> Result<Vec<AppLog>, StoreError> {
        let logs = self.logs.read().await;
        Ok(logs
            .iter()
            .filter(|log| log.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}
