//! HTTP API: handlers, request/response models, and the OpenAPI document.

pub mod handlers;
pub mod models;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "leadctl",
        description = "Lead management and reporting backend for clinic intake dashboards"
    ),
    paths(
        handlers::dashboard::get_dashboard,
        handlers::leads::list_leads,
        handlers::leads::create_lead,
        handlers::leads::get_lead,
        handlers::leads::update_lead,
        handlers::leads::delete_lead,
        handlers::leads::export_leads,
        handlers::chats::get_chat_history,
        handlers::chats::post_chat_message,
        handlers::chats::summarize_chat,
        handlers::settings::get_settings,
        handlers::settings::put_settings,
        handlers::reports::send_report,
    ),
    components(schemas(
        crate::analytics::AggregateReport,
        crate::analytics::CategoryCount,
        crate::analytics::CreativeCount,
        crate::analytics::Trend,
        crate::analytics::DateWindow,
        crate::markdown::Block,
        crate::markdown::Span,
        crate::reports::ReportKind,
        crate::db::models::leads::LeadMetadata,
        crate::db::models::chats::MessageRole,
        models::leads::LeadCreate,
        models::leads::LeadUpdate,
        models::leads::LeadResponse,
        models::chats::ChatEntryResponse,
        models::chats::ChatMessageCreate,
        models::chats::SummaryResponse,
        models::settings::SettingsResponse,
        models::settings::SettingsUpdate,
        models::reports::ReportSendResponse,
    ))
)]
pub struct ApiDoc;
