//! Gemini transport for generation calls.
//!
//! Uses reqwest against the `generateContent` REST endpoint so the request can
//! ask for JSON output and a fixed sampling temperature.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("bookcard/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("the API key was rejected")]
    Unauthorized,
    #[error("rate limit reached, try again in a moment")]
    RateLimited,
    #[error("model returned HTTP {code}: {message}")]
    Status { code: u16, message: String },
    #[error("prompt was blocked: {0}")]
    Blocked(String),
    #[error("model returned no text")]
    EmptyResponse,
    #[error("could not decode model response: {0}")]
    Decode(String),
}

/// A hosted text model that answers a single prompt.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Result<Self, ModelError> {
        // No explicit timeout; the transport default applies.
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let body = request_body(prompt, self.temperature);

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "sending generateContent");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// Build the request body asking for JSON output at the given temperature
pub fn request_body(prompt: &str, temperature: f32) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "temperature": temperature
        }
    })
}

/// Map a non-success HTTP status to a model error
fn status_error(status: StatusCode, body: &str) -> ModelError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ModelError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimited,
        _ => {
            // Gemini errors look like {"error": {"code": 400, "message": "..."}}
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| body.trim().to_string());
            ModelError::Status {
                code: status.as_u16(),
                message,
            }
        }
    }
}

/// Decode a successful `generateContent` body and extract its text
pub fn parse_response(body: &str) -> Result<String, ModelError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| ModelError::Decode(e.to_string()))?;
    extract_text(&json)
}

/// Pull the generated text out of a `generateContent` response
pub fn extract_text(response: &Value) -> Result<String, ModelError> {
    if let Some(reason) = response["promptFeedback"]["blockReason"].as_str() {
        return Err(ModelError::Blocked(reason.to_string()));
    }

    let text: String = response["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ModelError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_asks_for_json() {
        let body = request_body("hello", 0.5);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] }
            }]
        });
        assert_eq!(extract_text(&response).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_text_without_candidates_is_empty() {
        let response = json!({ "candidates": [] });
        assert!(matches!(
            extract_text(&response),
            Err(ModelError::EmptyResponse)
        ));
    }

    #[test]
    fn test_extract_text_reports_block_reason() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(matches!(
            extract_text(&response),
            Err(ModelError::Blocked(reason)) if reason == "SAFETY"
        ));
    }

    #[test]
    fn test_undecodable_success_body_is_a_decode_error() {
        assert!(matches!(
            parse_response("<html>gateway</html>"),
            Err(ModelError::Decode(_))
        ));

        let body = r#"{"candidates": [{"content": {"parts": [{"text": "{}"}]}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "{}");
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            ModelError::Unauthorized
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            ModelError::RateLimited
        ));

        let body = r#"{"error": {"code": 400, "message": "model not found"}}"#;
        match status_error(StatusCode::BAD_REQUEST, body) {
            ModelError::Status { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "model not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(
            "key",
            "https://example.test/v1beta/",
            "gemini-2.5-flash",
            0.5,
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
