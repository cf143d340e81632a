//! WhatsApp messaging gateway client.
//!
//! Instances are addressed either by a bare name (resolved against the
//! configured gateway domain) or by a full URL, which is used as-is.

use crate::errors::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    number: &'a str,
    text: &'a str,
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    domain: String,
}

impl GatewayClient {
    pub fn new(domain: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal {
                operation: format!("build gateway HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            domain: domain.into(),
        })
    }

    /// Resolve the base URL for an instance. The value is trimmed and
    /// trailing slashes are stripped; bare names (anything not starting
    /// with `http`) are wrapped as `https://{name}.{domain}`.
    pub fn resolve_base_url(&self, instance: &str) -> String {
        let trimmed = instance.trim().trim_end_matches('/');
        if trimmed.starts_with("http") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}.{}", self.domain)
        }
    }

    /// Send a text message through the instance's `/send/text` endpoint.
    ///
    /// Fails on non-2xx responses, on bodies that are not JSON objects, and
    /// on response objects carrying an `error` field.
    #[instrument(skip(self, api_key, text), err)]
    pub async fn send_text(&self, instance: &str, api_key: &str, number: &str, text: &str) -> Result<()> {
        let url = format!("{}/send/text", self.resolve_base_url(instance));
        debug!(%url, "dispatching gateway message");

        let response = self
            .http
            .post(&url)
            .header("token", api_key)
            .json(&SendTextRequest { number, text })
            .send()
            .await
            .map_err(|e| Error::Gateway {
                message: format!("request to messaging gateway failed: {e}"),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| Error::Gateway {
            message: format!("failed to read gateway response: {e}"),
        })?;

        if !status.is_success() {
            return Err(Error::Gateway {
                message: format!("gateway returned {status}: {body}"),
            });
        }

        let payload: Value = serde_json::from_str(&body).map_err(|_| Error::Gateway {
            message: format!("gateway returned an unparsable body: {body}"),
        })?;

        if let Some(error) = payload.get("error").filter(|v| !v.is_null()) {
            return Err(Error::Gateway {
                message: format!("gateway rejected the message: {error}"),
            });
        }

        Ok(())
    }
}
