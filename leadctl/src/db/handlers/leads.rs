//! Lead repository: CRUD, filtered listing, and the window counters used by
//! scheduled reports.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::Repository;
use crate::db::models::leads::{Lead, LeadCreateDBRequest, LeadFilter, LeadUpdateDBRequest, STATUS_REPASSADO};
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use sqlx::types::Json;
use tracing::instrument;

const LEAD_COLUMNS: &str = "id, lead_name, telefone, status_lead, tipo_caso, urgencia_caso, \
     turno_preferencia, observacoes_clinicas, dia_cadencia, metadata, created_at, data_ultima_interacao";

pub struct Leads<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> Leads<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// All leads, newest first. The dashboard aggregates over the full set
    /// and applies its date window in memory.
    #[instrument(skip(self), err)]
    pub async fn list_all(&mut self) -> Result<Vec<Lead>> {
        let leads = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC NULLS LAST"
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(leads)
    }

    /// Leads created inside the given bounds (inclusive).
    #[instrument(skip(self), err)]
    pub async fn count_created_between(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM leads WHERE created_at >= $1 AND created_at <= $2")
                .bind(start)
                .bind(end)
                .fetch_one(&mut *self.conn)
                .await?;

        Ok(count)
    }

    /// Leads whose last interaction falls inside the given bounds.
    #[instrument(skip(self), err)]
    pub async fn count_interacted_between(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leads WHERE data_ultima_interacao >= $1 AND data_ultima_interacao <= $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(count)
    }

    /// Handed-over leads whose last interaction falls inside the given bounds.
    #[instrument(skip(self), err)]
    pub async fn count_repassed_between(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leads \
             WHERE data_ultima_interacao >= $1 AND data_ultima_interacao <= $2 AND status_lead = $3",
        )
        .bind(start)
        .bind(end)
        .bind(STATUS_REPASSADO)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(count)
    }

    /// Cadence-day values of leads interacted with inside the bounds. The
    /// caller tallies these; nulls are kept so missing values can be labeled.
    #[instrument(skip(self), err)]
    pub async fn cadence_days_between(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Option<String>>> {
        let days: Vec<Option<String>> = sqlx::query_scalar(
            "SELECT dia_cadencia FROM leads \
             WHERE data_ultima_interacao >= $1 AND data_ultima_interacao <= $2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(days)
    }
}

#[async_trait::async_trait]
impl Repository for Leads<'_> {
    type CreateRequest = LeadCreateDBRequest;
    type UpdateRequest = LeadUpdateDBRequest;
    type Response = Lead;
    type Id = String;
    type Filter = LeadFilter;

    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            "INSERT INTO leads (id, lead_name, telefone, status_lead, tipo_caso, urgencia_caso, \
                 turno_preferencia, observacoes_clinicas, dia_cadencia, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {LEAD_COLUMNS}"
        ))
        .bind(&request.id)
        .bind(&request.lead_name)
        .bind(&request.telefone)
        .bind(&request.status_lead)
        .bind(&request.tipo_caso)
        .bind(&request.urgencia_caso)
        .bind(&request.turno_preferencia)
        .bind(&request.observacoes_clinicas)
        .bind(&request.dia_cadencia)
        .bind(request.metadata.clone().map(Json))
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(lead)
    }

    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let lead = sqlx::query_as::<_, Lead>(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(lead)
    }

    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let leads = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads \
             WHERE ($1::text IS NULL OR status_lead = $1) \
               AND ($2::timestamptz IS NULL OR created_at >= $2) \
               AND ($3::timestamptz IS NULL OR created_at <= $3) \
             ORDER BY created_at DESC NULLS LAST \
             LIMIT $4 OFFSET $5"
        ))
        .bind(&filter.status)
        .bind(filter.created_after)
        .bind(filter.created_before)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(leads)
    }

    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            "UPDATE leads SET \
                 lead_name = COALESCE($2, lead_name), \
                 telefone = COALESCE($3, telefone), \
                 status_lead = COALESCE($4, status_lead), \
                 tipo_caso = COALESCE($5, tipo_caso), \
                 urgencia_caso = COALESCE($6, urgencia_caso), \
                 turno_preferencia = COALESCE($7, turno_preferencia), \
                 observacoes_clinicas = COALESCE($8, observacoes_clinicas), \
                 dia_cadencia = COALESCE($9, dia_cadencia), \
                 metadata = COALESCE($10, metadata), \
                 data_ultima_interacao = COALESCE($11, data_ultima_interacao) \
             WHERE id = $1 \
             RETURNING {LEAD_COLUMNS}"
        ))
        .bind(id)
        .bind(&request.lead_name)
        .bind(&request.telefone)
        .bind(&request.status_lead)
        .bind(&request.tipo_caso)
        .bind(&request.urgencia_caso)
        .bind(&request.turno_preferencia)
        .bind(&request.observacoes_clinicas)
        .bind(&request.dia_cadencia)
        .bind(request.metadata.clone().map(Json))
        .bind(request.data_ultima_interacao)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(lead)
    }
}
