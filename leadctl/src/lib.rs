//! leadctl: lead management and reporting backend for clinic intake
//! dashboards.
//!
//! The service fronts a Postgres lead store and exposes:
//!
//! - dashboard aggregates (KPIs, trend deltas, categorical breakdowns) over
//!   a date window,
//! - lead CRUD and CSV export,
//! - chat history browsing with AI-generated conversation summaries,
//! - WhatsApp report dispatch (daily/weekly) through a messaging gateway.
//!
//! Outbound integrations (the messaging gateway and the AI endpoint) are
//! plain HTTP clients owned by [`AppState`]; credentials for the gateway
//! live in the database and are edited through the settings endpoints.

pub mod ai;
pub mod analytics;
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod export;
pub mod gateway;
pub mod markdown;
pub mod reports;
pub mod telemetry;

pub use config::Config;
pub use errors::{Error, Result};

use crate::ai::SummaryClient;
use crate::api::ApiDoc;
use crate::api::handlers::{chats, dashboard, leads, reports as report_handlers, settings};
use crate::gateway::GatewayClient;
use axum::{
    Json, Router,
    routing::{get, post},
};
use bon::Builder;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::future::Future;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Shared state for all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub gateway: GatewayClient,
    pub summarizer: SummaryClient,
}

/// Embedded database migrations.
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

async fn healthz() -> &'static str {
    "ok"
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/leads", get(leads::list_leads).post(leads::create_lead))
        .route("/leads/export", get(leads::export_leads))
        .route(
            "/leads/{id}",
            get(leads::get_lead).patch(leads::update_lead).delete(leads::delete_lead),
        )
        .route(
            "/chats/{session_id}",
            get(chats::get_chat_history).post(chats::post_chat_message),
        )
        .route("/chats/{session_id}/summary", post(chats::summarize_chat))
        .route("/settings", get(settings::get_settings).put(settings::put_settings))
        .route("/reports/{kind}", post(report_handlers::send_report));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Construct the outbound clients from configuration.
fn build_clients(config: &Config) -> Result<(GatewayClient, SummaryClient)> {
    let gateway = GatewayClient::new(
        config.gateway.domain.clone(),
        Duration::from_secs(config.gateway.timeout_secs),
    )?;
    let summarizer = SummaryClient::new(
        config.ai.endpoint.clone(),
        config.ai.api_key.clone(),
        config.ai.model.clone(),
        Duration::from_secs(config.ai.timeout_secs),
    )?;
    Ok((gateway, summarizer))
}

pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Connect to the database, run migrations, and build the router.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        migrator().run(&db).await?;

        let (gateway, summarizer) = build_clients(&config)?;

        let state = AppState::builder()
            .db(db)
            .config(config.clone())
            .gateway(gateway)
            .summarizer(summarizer)
            .build();

        Ok(Self {
            router: build_router(state),
            config,
        })
    }

    /// Serve until the shutdown future resolves.
    pub async fn serve(self, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("listening on {addr}");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    fn test_state() -> AppState {
        let config = Config::default();
        // Lazy pool: no connection is made until a handler touches the db
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .expect("lazy pool");
        let (gateway, summarizer) = build_clients(&config).expect("clients");

        AppState::builder()
            .db(db)
            .config(config)
            .gateway(gateway)
            .summarizer(summarizer)
            .build()
    }

    #[tokio::test]
    async fn healthz_responds_ok() {
        let server = TestServer::new(build_router(test_state())).unwrap();
        let response = server.get("/healthz").await;
        response.assert_status_ok();
        response.assert_text("ok");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let server = TestServer::new(build_router(test_state())).unwrap();
        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        let doc: serde_json::Value = response.json();
        assert_eq!(doc["info"]["title"], "leadctl");
    }

    #[tokio::test]
    async fn unknown_report_kind_is_rejected() {
        let server = TestServer::new(build_router(test_state())).unwrap();
        let response = server.post("/api/v1/reports/monthly").await;
        response.assert_status_bad_request();
    }
}
