//! Lead CRUD and CSV export handlers.

use crate::AppState;
use crate::api::models::leads::{ExportQuery, LeadCreate, LeadResponse, LeadUpdate, ListLeadsQuery};
use crate::db::errors::DbError;
use crate::db::handlers::{Leads, Repository};
use crate::db::models::leads::LeadFilter;
use crate::errors::{Error, Result};
use crate::export::leads_to_csv;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc)
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    let end = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
    DateTime::from_naive_utc_and_offset(end, Utc)
}

/// List leads, newest first.
#[utoipa::path(
    get,
    path = "/leads",
    params(ListLeadsQuery),
    responses((status = 200, description = "Leads matching the filter", body = Vec<LeadResponse>)),
    tag = "leads"
)]
#[tracing::instrument(skip_all)]
pub async fn list_leads(
    State(state): State<AppState>,
    Query(query): Query<ListLeadsQuery>,
) -> Result<Json<Vec<LeadResponse>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let filter = LeadFilter {
        status: query.status,
        created_after: query.start.map(day_start),
        created_before: query.end.map(day_end),
        limit: Some(limit),
        offset: query.skip,
    };

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let leads = Leads::new(&mut conn).list(&filter).await?;

    Ok(Json(leads.into_iter().map(LeadResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/leads",
    request_body = LeadCreate,
    responses((status = 201, description = "Created lead", body = LeadResponse)),
    tag = "leads"
)]
#[tracing::instrument(skip_all)]
pub async fn create_lead(
    State(state): State<AppState>,
    Json(request): Json<LeadCreate>,
) -> Result<(StatusCode, Json<LeadResponse>)> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let lead = Leads::new(&mut conn).create(&request.into()).await?;

    Ok((StatusCode::CREATED, Json(lead.into())))
}

#[utoipa::path(
    get,
    path = "/leads/{id}",
    params(("id" = String, Path, description = "Lead ID")),
    responses(
        (status = 200, description = "The lead", body = LeadResponse),
        (status = 404, description = "No lead with this ID")
    ),
    tag = "leads"
)]
#[tracing::instrument(skip_all)]
pub async fn get_lead(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<LeadResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let lead = Leads::new(&mut conn)
        .get_by_id(id.clone())
        .await?
        .ok_or(Error::NotFound {
            resource: "Lead".to_string(),
            id,
        })?;

    Ok(Json(lead.into()))
}

#[utoipa::path(
    patch,
    path = "/leads/{id}",
    params(("id" = String, Path, description = "Lead ID")),
    request_body = LeadUpdate,
    responses(
        (status = 200, description = "Updated lead", body = LeadResponse),
        (status = 404, description = "No lead with this ID")
    ),
    tag = "leads"
)]
#[tracing::instrument(skip_all)]
pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<LeadUpdate>,
) -> Result<Json<LeadResponse>> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let lead = match Leads::new(&mut conn).update(id.clone(), &request.into()).await {
        Ok(lead) => lead,
        Err(DbError::NotFound) => {
            return Err(Error::NotFound {
                resource: "Lead".to_string(),
                id,
            });
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(lead.into()))
}

#[utoipa::path(
    delete,
    path = "/leads/{id}",
    params(("id" = String, Path, description = "Lead ID")),
    responses(
        (status = 204, description = "Lead deleted"),
        (status = 404, description = "No lead with this ID")
    ),
    tag = "leads"
)]
#[tracing::instrument(skip_all)]
pub async fn delete_lead(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let deleted = Leads::new(&mut conn).delete(id.clone()).await?;

    if !deleted {
        return Err(Error::NotFound {
            resource: "Lead".to_string(),
            id,
        });
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Download the leads of a window as CSV.
#[utoipa::path(
    get,
    path = "/leads/export",
    params(ExportQuery),
    responses((status = 200, description = "CSV file", body = String, content_type = "text/csv")),
    tag = "leads"
)]
#[tracing::instrument(skip_all)]
pub async fn export_leads(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse> {
    let filter = LeadFilter {
        created_after: query.start.map(day_start),
        created_before: query.end.map(day_end),
        ..Default::default()
    };

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let leads = Leads::new(&mut conn).list(&filter).await?;
    let csv = leads_to_csv(&leads);

    let filename = format!("leads_{}.csv", Utc::now().format("%Y-%m-%d"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}
