//! Database models for the gateway settings singleton.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Messaging gateway credentials for this deployment. A single row; stored
/// in plain columns and edited through the dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InstanceSettings {
    pub id: Uuid,
    pub instance_name: String,
    pub api_key: String,
    pub notification_number: String,
    pub updated_at: DateTime<Utc>,
}

impl InstanceSettings {
    /// True when every credential needed to dispatch a message is present.
    pub fn is_complete(&self) -> bool {
        !self.instance_name.trim().is_empty()
            && !self.api_key.trim().is_empty()
            && !self.notification_number.trim().is_empty()
    }
}

/// Database request for replacing the settings row
#[derive(Debug, Clone, Default)]
pub struct SettingsUpsertDBRequest {
    pub instance_name: String,
    pub api_key: String,
    pub notification_number: String,
}
