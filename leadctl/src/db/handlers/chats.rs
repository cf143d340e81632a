//! Chat history repository. Sessions are keyed by phone number; messages are
//! append-only and read back in creation order.

use crate::db::errors::Result;
use crate::db::models::chats::{ChatHistoryEntry, ChatMessage};
use sqlx::PgConnection;
use sqlx::types::Json;
use tracing::instrument;

pub struct Chats<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> Chats<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Full history of a session, oldest message first.
    #[instrument(skip(self), err)]
    pub async fn list_for_session(&mut self, session_id: &str) -> Result<Vec<ChatHistoryEntry>> {
        let entries = sqlx::query_as::<_, ChatHistoryEntry>(
            "SELECT id, session_id, message, created_at FROM chat_histories \
             WHERE session_id = $1 ORDER BY created_at ASC",
        )
        .bind(session_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(entries)
    }

    #[instrument(skip(self, message), err)]
    pub async fn append(&mut self, session_id: &str, message: &ChatMessage) -> Result<ChatHistoryEntry> {
        let entry = sqlx::query_as::<_, ChatHistoryEntry>(
            "INSERT INTO chat_histories (session_id, message) VALUES ($1, $2) \
             RETURNING id, session_id, message, created_at",
        )
        .bind(session_id)
        .bind(Json(message))
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(entry)
    }
}
