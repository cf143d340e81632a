//! Chat history and AI summary handlers.

use crate::AppState;
use crate::ai::transcript;
use crate::api::models::chats::{ChatEntryResponse, ChatMessageCreate, SummaryResponse};
use crate::db::errors::DbError;
use crate::db::handlers::Chats;
use crate::errors::{Error, Result};
use crate::markdown;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// Full message history for a session (phone number), oldest first.
#[utoipa::path(
    get,
    path = "/chats/{session_id}",
    params(("session_id" = String, Path, description = "Session ID (phone number)")),
    responses((status = 200, description = "Messages in order", body = Vec<ChatEntryResponse>)),
    tag = "chats"
)]
#[tracing::instrument(skip_all)]
pub async fn get_chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatEntryResponse>>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let entries = Chats::new(&mut conn).list_for_session(&session_id).await?;

    Ok(Json(entries.into_iter().map(ChatEntryResponse::from).collect()))
}

/// Append a message to a session.
#[utoipa::path(
    post,
    path = "/chats/{session_id}",
    params(("session_id" = String, Path, description = "Session ID (phone number)")),
    request_body = ChatMessageCreate,
    responses((status = 201, description = "Stored message", body = ChatEntryResponse)),
    tag = "chats"
)]
#[tracing::instrument(skip_all)]
pub async fn post_chat_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ChatMessageCreate>,
) -> Result<(StatusCode, Json<ChatEntryResponse>)> {
    if request.content.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Message content must not be empty".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let entry = Chats::new(&mut conn).append(&session_id, &request.into()).await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// Generate an AI summary of a session's conversation.
#[utoipa::path(
    post,
    path = "/chats/{session_id}/summary",
    params(("session_id" = String, Path, description = "Session ID (phone number)")),
    responses(
        (status = 200, description = "Summary text with parsed blocks", body = SummaryResponse),
        (status = 400, description = "Session has no messages"),
        (status = 502, description = "AI endpoint failure")
    ),
    tag = "chats"
)]
#[tracing::instrument(skip_all)]
pub async fn summarize_chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SummaryResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let entries = Chats::new(&mut conn).list_for_session(&session_id).await?;
    drop(conn);

    if entries.is_empty() {
        return Err(Error::BadRequest {
            message: "Session has no messages to summarize".to_string(),
        });
    }

    let summary = state.summarizer.summarize(&transcript(&entries)).await?;
    let blocks = markdown::parse(&summary);

    Ok(Json(SummaryResponse { summary, blocks }))
}
