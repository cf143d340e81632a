//! Conversation summarization via an OpenAI-compatible chat-completion
//! endpoint.

use crate::db::models::chats::{ChatHistoryEntry, MessageRole};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// Instructions given to the model for every summary request.
const SYSTEM_PROMPT: &str = "Você é um assistente útil. Analise a seguinte conversa de atendimento.\n\n\
Sua resposta DEVE seguir estritamente este formato com Markdown:\n\n\
### Resumo conversa\n\
(Resumo curto de MÁXIMO 2 linhas sobre o que foi tratado)\n\n\
### Análise\n\
(Pontue o que foi positivo e o que foi negativo/erro no atendimento usando **negrito** para os tópicos. \
IMPORTANTE: Se a conversa NÃO for relacionada a vendas/leads (ex: candidato a vaga, engano, spam, teste), \
responda apenas:\n**Status:** Não Cliente\n**Motivo:** (Explicação breve))";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Render a chat history as the plain-text transcript sent to the model,
/// one `Cliente:`/`Atendente:` line per message.
pub fn transcript(entries: &[ChatHistoryEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let speaker = match entry.message.role {
                MessageRole::Human => "Cliente",
                MessageRole::Ai => "Atendente",
            };
            format!("{speaker}: {}", entry.message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone)]
pub struct SummaryClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    model: String,
}

impl SummaryClient {
    pub fn new(endpoint: Url, api_key: Option<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal {
                operation: format!("build AI HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            model: model.into(),
        })
    }

    /// Summarize a transcript. The summary is the first choice's message
    /// content; an empty choice list or a malformed body is surfaced as a
    /// gateway error.
    #[instrument(skip(self, transcript), err)]
    pub async fn summarize(&self, transcript: &str) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                RequestMessage {
                    role: "user",
                    content: transcript,
                },
            ],
        };

        let mut builder = self.http.post(self.endpoint.clone()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| Error::Gateway {
            message: format!("request to AI endpoint failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway {
                message: format!("AI endpoint returned {status}: {body}"),
            });
        }

        let payload: CompletionResponse = response.json().await.map_err(|e| Error::Gateway {
            message: format!("AI endpoint returned an unparsable body: {e}"),
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Gateway {
                message: "AI endpoint returned no choices".to_string(),
            })
    }
}
