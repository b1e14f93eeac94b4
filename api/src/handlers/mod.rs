//! API Handlers Module
//!
//! This module contains the request handlers for the API system.

use axum::{debug_handler, extract::rejection::JsonRejection, extract::State, response::Json};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use socratic_core::{ConversationRelay, TestType};

use crate::error::ApiError;
use crate::models::{AnalyzeRequest, AnalyzeResponse, TestTypeInfo};

/// Represents the state of the API server
pub struct ApiState {
    /// Relay to the model provider
    pub relay: ConversationRelay,
}

/// Health check endpoint
#[debug_handler]
pub async fn health_check() -> Json<HashMap<String, String>> {
    let mut response = HashMap::new();
    response.insert("status".to_string(), "healthy".to_string());
    response.insert("service".to_string(), "socratic-api".to_string());
    Json(response)
}

/// List supported test types and their form fields
#[debug_handler]
pub async fn list_test_types() -> Json<Vec<TestTypeInfo>> {
    Json(
        TestType::all()
            .iter()
            .copied()
            .map(TestTypeInfo::from)
            .collect(),
    )
}

/// Run one review turn
///
/// The test type is validated before the provider is contacted.
#[debug_handler]
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn analyze(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload?;
    let test_type: TestType = request.test_type.parse()?;

    let form_data = request.form_data.unwrap_or_default();
    let history = request.conversation_history.unwrap_or_default();

    tracing::debug!(
        "Analyze request: test_type={}, fields={}, history={}",
        test_type,
        form_data.len(),
        history.len()
    );

    let outcome = state
        .relay
        .handle_analysis_request(test_type, &form_data, history)
        .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: outcome.reply,
        conversation_history: outcome.conversation,
    }))
}
