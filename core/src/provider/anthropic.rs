//! Anthropic Messages API provider

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    CompletionProvider, CompletionRequest, CompletionResponse, ContentSegment, ProviderError,
    Usage,
};
use crate::conversation::Message;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl AnthropicProvider {
    /// Create provider with a client bounded by `timeout`
    pub fn new(
        base_url: String,
        model: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url, model, api_key))
    }

    /// Create provider around an existing client
    pub fn with_client(client: Client, base_url: String, model: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            model,
            api_key,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }

    /// Map a non-2xx response onto the error taxonomy
    async fn status_error(response: Response) -> ProviderError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(|v| format!(" (retry after {}s)", v))
            .unwrap_or_default();

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::Authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
                message,
                retry_after,
            },
            _ => ProviderError::Http {
                status: status.as_u16(),
                message,
            },
        }
    }

    fn parse_response(body: &str) -> Result<CompletionResponse, ProviderError> {
        let parsed: MessagesResponse = serde_json::from_str(body)?;

        let segments = parsed
            .content
            .into_iter()
            .map(|block| match (block.kind.as_str(), block.text) {
                ("text", Some(text)) => ContentSegment::Text(text),
                _ => ContentSegment::Other(block.kind),
            })
            .collect();

        Ok(CompletionResponse {
            segments,
            model: parsed.model,
            usage: parsed.usage,
        })
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: request.messages.messages(),
        };

        debug!(
            "Sending request to anthropic: model={}, messages={}, max_tokens={}",
            self.model,
            request.messages.len(),
            request.max_tokens
        );

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::status_error(response).await;
            warn!("Anthropic API error: {}", err);
            return Err(err);
        }

        let text = response.text().await?;
        let parsed = Self::parse_response(&text)?;

        if let Some(usage) = parsed.usage {
            debug!(
                "Anthropic usage: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        Ok(parsed)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}
