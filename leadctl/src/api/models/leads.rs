//! API request/response models for leads.

use crate::db::models::leads::{Lead, LeadCreateDBRequest, LeadMetadata, LeadUpdateDBRequest, STATUS_NOVO};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeadResponse {
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
    pub created_at: Option<DateTime<Utc>>,
    pub data_ultima_interacao: Option<DateTime<Utc>>,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id,
            lead_name: lead.lead_name,
            telefone: lead.telefone,
            status_lead: lead.status_lead,
            tipo_caso: lead.tipo_caso,
            urgencia_caso: lead.urgencia_caso,
            turno_preferencia: lead.turno_preferencia,
            observacoes_clinicas: lead.observacoes_clinicas,
            dia_cadencia: lead.dia_cadencia,
            metadata: lead.metadata.map(|json| json.0),
            created_at: lead.created_at,
            data_ultima_interacao: lead.data_ultima_interacao,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeadCreate {
    pub lead_name: Option<String>,
    pub telefone: Option<String>,
    /// Defaults to `novo` when omitted
    pub status_lead: Option<String>,
    pub tipo_caso: Option<String>,
    pub urgencia_caso: Option<String>,
    pub turno_preferencia: Option<String>,
    pub observacoes_clinicas: Option<String>,
    pub dia_cadencia: Option<String>,
    pub metadata: Option<LeadMetadata>,
}

impl From<LeadCreate> for LeadCreateDBRequest {
    fn from(api: LeadCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            lead_name: api.lead_name,
            telefone: api.telefone,
            status_lead: api.status_lead.or_else(|| Some(STATUS_NOVO.to_string())),
            tipo_caso: api.tipo_caso,
            urgencia_caso: api.urgencia_caso,
            turno_preferencia: api.turno_preferencia,
            observacoes_clinicas: api.observacoes_clinicas,
            dia_cadencia: api.dia_cadencia,
            metadata: api.metadata,
        }
    }
}

/// Partial update; omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LeadUpdate {
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

impl From<LeadUpdate> for LeadUpdateDBRequest {
    fn from(api: LeadUpdate) -> Self {
        Self {
            lead_name: api.lead_name,
            telefone: api.telefone,
            status_lead: api.status_lead,
            tipo_caso: api.tipo_caso,
            urgencia_caso: api.urgencia_caso,
            turno_preferencia: api.turno_preferencia,
            observacoes_clinicas: api.observacoes_clinicas,
            dia_cadencia: api.dia_cadencia,
            metadata: api.metadata,
            data_ultima_interacao: api.data_ultima_interacao,
        }
    }
}

/// Query parameters for lead listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListLeadsQuery {
    /// Filter by status value
    pub status: Option<String>,

    /// Only leads created on or after this date
    pub start: Option<NaiveDate>,

    /// Only leads created on or before this date
    pub end: Option<NaiveDate>,

    /// Maximum number of leads to return (default 100, capped at 1000)
    pub limit: Option<i64>,

    /// Number of leads to skip
    pub skip: Option<i64>,
}

/// Query parameters for the CSV export
#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// Only leads created on or after this date
    pub start: Option<NaiveDate>,

    /// Only leads created on or before this date
    pub end: Option<NaiveDate>,
}
