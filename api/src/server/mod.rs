//! API Server Module
//!
//! This module contains the server setup functionality for the API system.

use anyhow::{anyhow, Result};
use axum::{
    http::{HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use socratic_core::ConversationRelay;

use crate::error::ApiError;
use crate::handlers::{analyze, health_check, list_test_types, ApiState};
use crate::models::ApiConfig;

/// Main API server
pub struct ApiServer {
    /// Server configuration
    config: ApiConfig,
    /// Shared state
    state: Arc<ApiState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiConfig, relay: ConversationRelay) -> Self {
        let state = Arc::new(ApiState { relay });
        Self { config, state }
    }

    /// Router with all routes and layers attached
    pub fn router(&self) -> Result<Router> {
        build_router(self.state.clone(), &self.config)
    }

    /// Start the API server and run until ctrl-c
    pub async fn start(&self) -> Result<()> {
        let app = self.router()?;

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| anyhow!("Failed to bind {}: {}", addr, e))?;
        info!(
            "Socratic API server listening on {} (provider: {}, max_tokens: {})",
            listener.local_addr()?,
            self.state.relay.provider_name(),
            self.state.relay.max_tokens()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow!("Failed to start API server: {}", e))?;

        info!("Socratic API server stopped");
        Ok(())
    }
}

/// Build the application router with the shared state
pub fn build_router(state: Arc<ApiState>, config: &ApiConfig) -> Result<Router> {
    let router = Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/test-types", get(list_test_types))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&config.allowed_origins)?)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

/// Any origin when `allowed_origins` is empty, otherwise exactly those
fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if allowed_origins.is_empty() {
        AllowOrigin::from(AnyOrigin)
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|e| anyhow!("Invalid CORS origin {:?}: {}", origin, e))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AnyOrigin))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!("Handler panicked: {}", detail);

    ApiError::Internal("internal server error".to_string()).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
