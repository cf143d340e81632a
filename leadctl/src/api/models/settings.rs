//! API models for the gateway settings singleton.

use crate::db::models::settings::{InstanceSettings, SettingsUpsertDBRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SettingsResponse {
    pub instance_name: String,
    pub api_key: String,
    pub notification_number: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SettingsResponse {
    /// Response for a deployment that has never saved settings.
    pub fn empty() -> Self {
        Self {
            instance_name: String::new(),
            api_key: String::new(),
            notification_number: String::new(),
            updated_at: None,
        }
    }
}

impl From<InstanceSettings> for SettingsResponse {
    fn from(settings: InstanceSettings) -> Self {
        Self {
            instance_name: settings.instance_name,
            api_key: settings.api_key,
            notification_number: settings.notification_number,
            updated_at: Some(settings.updated_at),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SettingsUpdate {
    pub instance_name: String,
    pub api_key: String,
    pub notification_number: String,
}

impl From<SettingsUpdate> for SettingsUpsertDBRequest {
    fn from(api: SettingsUpdate) -> Self {
        Self {
            instance_name: api.instance_name,
            api_key: api.api_key,
            notification_number: api.notification_number,
        }
    }
}
