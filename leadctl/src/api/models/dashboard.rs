//! API models for the dashboard aggregate endpoint.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for the dashboard window. Defaults to the last 30 days
/// ending today when omitted.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}
