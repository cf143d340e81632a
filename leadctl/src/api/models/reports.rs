//! API models for report dispatch.

use crate::reports::ReportKind;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportSendResponse {
    pub kind: ReportKind,
    /// The message body that was sent
    pub message: String,
}
