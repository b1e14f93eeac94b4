//! Provider factory
//!
//! Builds the process-wide provider from configuration.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::{AnthropicProvider, CompletionProvider, ProviderError, StubProvider};
use crate::config::{ProviderConfig, ProviderKind};

/// Create the provider selected by `config.kind`
pub fn create_provider(
    config: &ProviderConfig,
) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    match config.kind {
        ProviderKind::Anthropic => {
            let api_key = config
                .api_key
                .as_deref()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    ProviderError::Configuration("Missing API key for anthropic".to_string())
                })?;

            info!(
                "Using anthropic provider: model={}, base_url={}",
                config.model, config.base_url
            );

            Ok(Arc::new(AnthropicProvider::new(
                config.base_url.clone(),
                config.model.clone(),
                api_key.to_string(),
                Duration::from_secs(config.timeout_seconds),
            )?))
        }
        ProviderKind::Stub => {
            info!("Using stub provider; replies are canned");
            Ok(Arc::new(StubProvider::new()))
        }
    }
}
