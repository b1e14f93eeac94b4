//! Model provider boundary
//!
//! Provider-agnostic request/response types and the trait the relay calls.
//! Concrete providers: Anthropic Messages API and an in-process stub.

pub mod anthropic;
pub mod error;
pub mod factory;
pub mod stub;

pub use anthropic::AnthropicProvider;
pub use error::ProviderError;
pub use factory::create_provider;
pub use stub::StubProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::Conversation;

/// One completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System prompt, sent outside the message list
    pub system: String,
    /// Output budget in tokens
    pub max_tokens: u32,
    /// Ordered user/assistant turns
    pub messages: Conversation,
}

/// One segment of a provider reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSegment {
    Text(String),
    /// Any non-text segment (tool use, thinking, ...), identified by kind
    Other(String),
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Provider reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub segments: Vec<ContentSegment>,
    pub model: Option<String>,
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// Reply consisting of a single text segment
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            segments: vec![ContentSegment::Text(text.into())],
            model: None,
            usage: None,
        }
    }

    /// First text segment, skipping any leading non-text segments
    pub fn first_text(&self) -> Option<&str> {
        self.segments.iter().find_map(|segment| match segment {
            ContentSegment::Text(text) => Some(text.as_str()),
            ContentSegment::Other(_) => None,
        })
    }
}

/// Completion provider
///
/// Implementations hold no per-request state and are shared across
/// concurrent requests.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one request and wait for the full reply
    async fn complete(&self, request: &CompletionRequest)
        -> Result<CompletionResponse, ProviderError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_skips_non_text_segments() {
        let response = CompletionResponse {
            segments: vec![
                ContentSegment::Other("thinking".to_string()),
                ContentSegment::Text("first".to_string()),
                ContentSegment::Text("second".to_string()),
            ],
            model: None,
            usage: None,
        };
        assert_eq!(response.first_text(), Some("first"));
    }

    #[test]
    fn test_first_text_none_without_text() {
        let response = CompletionResponse {
            segments: vec![ContentSegment::Other("tool_use".to_string())],
            model: None,
            usage: None,
        };
        assert_eq!(response.first_text(), None);
    }
}
