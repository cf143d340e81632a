//! On-demand report dispatch handler.

use crate::AppState;
use crate::api::models::reports::ReportSendResponse;
use crate::db::errors::DbError;
use crate::db::handlers::Settings;
use crate::errors::{Error, Result};
use crate::reports::{ReportKind, compose_and_send};
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

/// Compose and send a daily or weekly report to the configured number.
#[utoipa::path(
    post,
    path = "/reports/{kind}",
    params(("kind" = ReportKind, Path, description = "Report kind")),
    responses(
        (status = 200, description = "Report sent", body = ReportSendResponse),
        (status = 412, description = "Gateway credentials not configured"),
        (status = 502, description = "Gateway rejected the message")
    ),
    tag = "reports"
)]
#[tracing::instrument(skip_all, fields(kind = ?kind))]
pub async fn send_report(
    State(state): State<AppState>,
    Path(kind): Path<ReportKind>,
) -> Result<Json<ReportSendResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let settings = Settings::new(&mut conn).get().await?.ok_or(Error::Configuration {
        message: "Gateway settings have not been saved yet".to_string(),
    })?;
    drop(conn);

    let message = compose_and_send(&state.db, &state.gateway, &settings, kind, Utc::now()).await?;

    Ok(Json(ReportSendResponse { kind, message }))
}
