//! API request and response bodies

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use socratic_core::{Conversation, FormFields, TestType};

/// Body of `POST /api/analyze`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Raw test type; parsed by the handler so unknown values get a clear error
    pub test_type: String,
    /// Fields sent as `null` are dropped and resolve like missing ones
    #[serde(default, deserialize_with = "form_fields_without_nulls")]
    pub form_data: Option<FormFields>,
    #[serde(default)]
    pub conversation_history: Option<Conversation>,
}

fn form_fields_without_nulls<'de, D>(deserializer: D) -> Result<Option<FormFields>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|fields| {
        fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|value| (name, value)))
            .collect()
    }))
}

/// Successful analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: String,
    pub conversation_history: Conversation,
}

/// Uniform failure body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Entry of `GET /api/test-types`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestTypeInfo {
    pub test_type: TestType,
    pub name: &'static str,
    pub required_fields: &'static [&'static str],
}

impl From<TestType> for TestTypeInfo {
    fn from(test_type: TestType) -> Self {
        Self {
            test_type,
            name: test_type.display_name(),
            required_fields: test_type.required_fields(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl From<&socratic_core::config::ServerSettings> for ApiConfig {
    fn from(settings: &socratic_core::config::ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            allowed_origins: settings.allowed_origins.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_request_defaults() {
        let request: AnalyzeRequest = serde_json::from_str(r#"{"testType":"sat"}"#).unwrap();
        assert_eq!(request.test_type, "sat");
        assert!(request.form_data.is_none());
        assert!(request.conversation_history.is_none());
    }

    #[test]
    fn test_analyze_request_accepts_nulls() {
        let request: AnalyzeRequest = serde_json::from_str(
            r#"{"testType":"lsat","formData":null,"conversationHistory":null}"#,
        )
        .unwrap();
        assert!(request.form_data.is_none());
        assert!(request.conversation_history.is_none());
    }

    #[test]
    fn test_null_form_field_is_dropped() {
        let request: AnalyzeRequest = serde_json::from_str(
            r#"{"testType":"sat","formData":{"problem":"2x=4","stuck":null}}"#,
        )
        .unwrap();
        let fields = request.form_data.unwrap();
        assert_eq!(fields.get("problem").map(String::as_str), Some("2x=4"));
        assert!(!fields.contains_key("stuck"));
    }

    #[test]
    fn test_analyze_response_shape() {
        let response = AnalyzeResponse {
            success: true,
            analysis: "reply".to_string(),
            conversation_history: Conversation::new(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "analysis": "reply", "conversationHistory": []})
        );
    }

    #[test]
    fn test_test_type_info_shape() {
        let json = serde_json::to_value(TestTypeInfo::from(TestType::Sat)).unwrap();
        assert_eq!(json["testType"], "sat");
        assert_eq!(json["requiredFields"][5], "stuck");
    }
}
