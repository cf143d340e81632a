//! Settings repository for the single gateway credential row.

use crate::db::errors::Result;
use crate::db::models::settings::{InstanceSettings, SettingsUpsertDBRequest};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Settings<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> Settings<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// The current settings row, if one has been saved.
    #[instrument(skip(self), err)]
    pub async fn get(&mut self) -> Result<Option<InstanceSettings>> {
        let settings = sqlx::query_as::<_, InstanceSettings>(
            "SELECT id, instance_name, api_key, notification_number, updated_at \
             FROM instance_settings ORDER BY updated_at DESC LIMIT 1",
        )
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(settings)
    }

    /// Replace the settings row, creating it on first save.
    #[instrument(skip(self, request), err)]
    pub async fn upsert(&mut self, request: &SettingsUpsertDBRequest) -> Result<InstanceSettings> {
        let existing = self.get().await?;

        let settings = match existing {
            Some(current) => {
                sqlx::query_as::<_, InstanceSettings>(
                    "UPDATE instance_settings \
                     SET instance_name = $2, api_key = $3, notification_number = $4, updated_at = NOW() \
                     WHERE id = $1 \
                     RETURNING id, instance_name, api_key, notification_number, updated_at",
                )
                .bind(current.id)
                .bind(&request.instance_name)
                .bind(&request.api_key)
                .bind(&request.notification_number)
                .fetch_one(&mut *self.conn)
                .await?
            }
            None => {
                sqlx::query_as::<_, InstanceSettings>(
                    "INSERT INTO instance_settings (instance_name, api_key, notification_number) \
                     VALUES ($1, $2, $3) \
                     RETURNING id, instance_name, api_key, notification_number, updated_at",
                )
                .bind(&request.instance_name)
                .bind(&request.api_key)
                .bind(&request.notification_number)
                .fetch_one(&mut *self.conn)
                .await?
            }
        };

        Ok(settings)
    }
}
