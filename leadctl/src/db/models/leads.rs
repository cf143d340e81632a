//! Database models for leads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

/// Status value that marks a lead as handed over to the clinic team.
pub const STATUS_REPASSADO: &str = "repassado";

/// Status assigned to freshly captured leads.
pub const STATUS_NOVO: &str = "novo";

/// Acquisition metadata captured with a lead. Stored as JSONB; keys follow
/// the capture pipeline's camelCase convention. Unknown keys are preserved
/// on round-trips.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadMetadata {
    /// `ad` for paid traffic, anything else is treated as organic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,

    /// Messaging app the lead arrived through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_app: Option<String>,

    /// Creative media URL for paid leads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A lead row as stored in Postgres.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Lead {
    pub id: String,
    pub lead_name: Option<String>,
    pub telefone: Option<String>,
    pub status_lead: Option<String>,
    pub tipo_caso: Option<String>,
    pub urgencia_caso: Option<String>,
    pub turno_preferencia: Option<String>,
    pub observacoes_clinicas: Option<String>,
    pub dia_cadencia: Option<String>,
    pub metadata: Option<Json<LeadMetadata>>,
    pub created_at: Option<DateTime<Utc>>,
    pub data_ultima_interacao: Option<DateTime<Utc>>,
}

impl Lead {
    pub fn is_repassado(&self) -> bool {
        self.status_lead.as_deref() == Some(STATUS_REPASSADO)
    }

    pub fn metadata(&self) -> Option<&LeadMetadata> {
        self.metadata.as_ref().map(|json| &json.0)
    }
}

/// Database request for creating a new lead
#[derive(Debug, Clone)]
pub struct LeadCreateDBRequest {
    pub id: String,
    pub lead_name: Option<String>,
    pub telefone: Option<String>,
    pub status_lead: Option<String>,
    pub tipo_caso: Option<String>,
    pub urgencia_caso: Option<String>,
    pub turno_preferencia: Option<String>,
    pub observacoes_clinicas: Option<String>,
    pub dia_cadencia: Option<String>,
    pub metadata: Option<LeadMetadata>,
}

/// Database request for updating a lead. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct LeadUpdateDBRequest {
    pub lead_name: Option<String>,
    pub telefone: Option<String>,
    pub status_lead: Option<String>,
    pub tipo_caso: Option<String>,
    pub urgencia_caso: Option<String>,
    pub turno_preferencia: Option<String>,
    pub observacoes_clinicas: Option<String>,
    pub dia_cadencia: Option<String>,
    pub metadata: Option<LeadMetadata>,
    pub data_ultima_interacao: Option<DateTime<Utc>>,
}

/// Filter for lead listing
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub status: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
