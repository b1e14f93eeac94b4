//! Stub provider
//!
//! Answers without network access. Selected with `kind = "stub"` for local
//! frontend work, and used by tests as the substitutable provider.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{CompletionProvider, CompletionRequest, CompletionResponse, ContentSegment, ProviderError};

/// Reply returned when no script is given
pub const STUB_REPLY: &str = "**Question Type**: stub\n\nThis is a canned review from the stub provider. Configure the anthropic provider for real analysis.";

/// In-process provider with a scripted outcome
#[derive(Debug)]
pub struct StubProvider {
    outcome: Result<CompletionResponse, ProviderError>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubProvider {
    /// Stub that answers every request with [`STUB_REPLY`]
    pub fn new() -> Self {
        Self::with_reply(STUB_REPLY)
    }

    /// Stub that answers with a single text segment
    pub fn with_reply(reply: &str) -> Self {
        Self::with_response(CompletionResponse::text(reply))
    }

    /// Stub that answers with the given segments
    pub fn with_segments(segments: Vec<ContentSegment>) -> Self {
        Self::with_response(CompletionResponse {
            segments,
            model: None,
            usage: None,
        })
    }

    /// Stub that fails every request
    pub fn with_error(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn with_response(response: CompletionResponse) -> Self {
        Self {
            outcome: Ok(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request.clone());
        }
        self.outcome.clone()
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Message;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "system".to_string(),
            max_tokens: 16,
            messages: vec![Message::user("hello")].into(),
        }
    }

    #[tokio::test]
    async fn test_stub_default_reply() {
        let stub = StubProvider::new();
        let response = stub.complete(&request()).await.unwrap();
        assert_eq!(response.first_text(), Some(STUB_REPLY));
    }

    #[tokio::test]
    async fn test_stub_records_requests() {
        let stub = StubProvider::with_reply("ok");
        stub.complete(&request()).await.unwrap();
        stub.complete(&request()).await.unwrap();

        assert_eq!(stub.call_count(), 2);
        assert_eq!(stub.requests()[0], request());
    }

    #[tokio::test]
    async fn test_stub_with_error() {
        let stub = StubProvider::with_error(ProviderError::Network("down".to_string()));
        let result = stub.complete(&request()).await;
        assert_eq!(result, Err(ProviderError::Network("down".to_string())));
        assert_eq!(stub.call_count(), 1);
    }
}
