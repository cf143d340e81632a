//! API models for chat histories and AI summaries.

use crate::db::models::chats::{ChatHistoryEntry, ChatMessage, MessageRole};
use crate::markdown::Block;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatMessageCreate {
    pub role: MessageRole,
    pub content: String,
}

impl From<ChatMessageCreate> for ChatMessage {
    fn from(api: ChatMessageCreate) -> Self {
        Self {
            role: api.role,
            content: api.content,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatEntryResponse {
    pub id: i64,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChatHistoryEntry> for ChatEntryResponse {
    fn from(entry: ChatHistoryEntry) -> Self {
        Self {
            id: entry.id,
            session_id: entry.session_id,
            role: entry.message.role,
            content: entry.message.0.content,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryResponse {
    /// Raw model output
    pub summary: String,
    /// The same output parsed into renderable blocks
    pub blocks: Vec<Block>,
}
