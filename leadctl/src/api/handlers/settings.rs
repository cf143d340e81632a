//! Gateway settings handlers.

use crate::AppState;
use crate::api::models::settings::{SettingsResponse, SettingsUpdate};
use crate::db::errors::DbError;
use crate::db::handlers::Settings;
use crate::errors::Result;
use axum::{
    Json,
    extract::State,
};

/// Current gateway settings, or empty fields when never saved.
#[utoipa::path(
    get,
    path = "/settings",
    responses((status = 200, description = "Current settings", body = SettingsResponse)),
    tag = "settings"
)]
#[tracing::instrument(skip_all)]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let settings = Settings::new(&mut conn).get().await?;

    Ok(Json(settings.map(SettingsResponse::from).unwrap_or_else(SettingsResponse::empty)))
}

/// Replace the gateway settings.
#[utoipa::path(
    put,
    path = "/settings",
    request_body = SettingsUpdate,
    responses((status = 200, description = "Saved settings", body = SettingsResponse)),
    tag = "settings"
)]
#[tracing::instrument(skip_all)]
pub async fn put_settings(
    State(state): State<AppState>,
    Json(request): Json<SettingsUpdate>,
) -> Result<Json<SettingsResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let settings = Settings::new(&mut conn).upsert(&request.into()).await?;

    Ok(Json(settings.into()))
}
