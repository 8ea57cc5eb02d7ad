//! Wire types for the Cloudflare Workers AI model-run API

use serde::{Deserialize, Serialize};

use crate::llm::core::types::ChatMessage;

/// Request body for `POST /accounts/{account}/ai/run/{model}`
#[derive(Debug, Clone, Serialize)]
pub struct CloudflareRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Response envelope for a model run
#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareResponse {
    #[serde(default)]
    pub result: Option<RunResult>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<CloudflareError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunResult {
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareError {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::types::ChatMessage;

    #[test]
    fn test_request_serialization() {
        let request = CloudflareRequest {
            messages: vec![ChatMessage::user("What is 2+2?")],
            max_tokens: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"messages\""));
        assert!(json.contains("\"content\":\"What is 2+2?\""));
        assert!(!json.contains("max_tokens"));
    }

    #[test]
    fn test_success_envelope() {
        let json = r#"{"result":{"response":"4"},"success":true,"errors":[],"messages":[]}"#;
        let response: CloudflareResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.result.unwrap().response.as_deref(), Some("4"));
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"result":null,"success":false,"errors":[{"code":10000,"message":"Authentication error"}]}"#;
        let response: CloudflareResponse = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert_eq!(response.errors[0].code, 10000);
        assert_eq!(response.errors[0].message, "Authentication error");
    }
}
