//! Database models for chat histories.
//!
//! A session is keyed by the lead's phone number; messages are JSONB blobs
//! with a `type` discriminator written by the conversation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

/// Who authored a message within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The patient/lead
    Human,
    /// The automated attendant
    Ai,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub role: MessageRole,
    pub content: String,
}

/// A chat history row as stored in Postgres.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatHistoryEntry {
    pub id: i64,
    pub session_id: String,
    pub message: Json<ChatMessage>,
    pub created_at: DateTime<Utc>,
}
