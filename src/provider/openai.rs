//! OpenAI Responses API client
//!
//! `POST {base}/responses` with bearer auth. Bodies in the chat-completions
//! shape are also understood so OpenAI-compatible gateways work unchanged.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::{GenerationRequest, ProviderError, ProviderResponse, ResponseFormat, TextGenerator};
use crate::config::Config;

/// OpenAI API client
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    timeout_seconds: u64,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
    text: TextOptions,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct TextOptions {
    format: ResponseFormat,
}

impl OpenAIClient {
    /// Create new client from service configuration
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            timeout_seconds: config.request_timeout_secs,
            http_client,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout_seconds)
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

fn build_body(request: &GenerationRequest) -> ResponsesRequest<'_> {
    ResponsesRequest {
        model: &request.model,
        input: vec![
            InputMessage { role: "system", content: &request.system_instruction },
            InputMessage { role: "user", content: &request.user_prompt },
        ],
        text: TextOptions { format: request.response_format },
    }
}

/// Map a non-success status to a provider error
fn status_error(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized(body),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(body),
        _ => ProviderError::Server { status: status.as_u16(), body },
    }
}

/// Join every `output_text` item of every `message` output
///
/// Reasoning models put a `reasoning` item ahead of the message, so the
/// answer is not always at `output[0]`.
fn joined_output_text(body: &Value) -> Option<String> {
    let text: String = body
        .get("output")?
        .as_array()?
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("message"))
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    (!text.is_empty()).then_some(text)
}

/// Classify a provider body into one of the two response shapes
pub fn extract_response(body: &Value) -> ProviderResponse {
    let first_is_message = body
        .pointer("/output/0/type")
        .and_then(Value::as_str)
        .map_or(true, |kind| kind == "message");

    if first_is_message {
        if let Some(text) = body.pointer("/output/0/content/0/text").and_then(Value::as_str) {
            return ProviderResponse::Structured(text.to_string());
        }
    }

    if let Some(text) = joined_output_text(body) {
        return ProviderResponse::FlatText(text);
    }

    let flat = body
        .get("output_text")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/choices/0/message/content").and_then(Value::as_str))
        .unwrap_or_default();

    ProviderResponse::FlatText(flat.to_string())
}

#[async_trait]
impl TextGenerator for OpenAIClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderResponse, ProviderError> {
        let url = format!("{}/responses", self.base_url);

        tracing::debug!(model = %request.model, prompt_len = request.user_prompt.len(), "Calling model provider");

        let response = self.http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&build_body(request))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!("Provider request failed ({}): {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        let body: Value = response.json().await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(extract_response(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::json;

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "gpt-4o-mini".to_string(),
            system_instruction: "system".to_string(),
            user_prompt: "prompt".to_string(),
            response_format: ResponseFormat::JsonObject,
        }
    }

    fn client_for(base_url: String) -> OpenAIClient {
        let config = Config::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "OPENAI_BASE_URL" => Some(base_url.clone()),
            "OPENAI_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        });
        OpenAIClient::new(&config).unwrap()
    }

    async fn spawn_upstream(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    #[test]
    fn test_request_body_shape() {
        let req = request();
        let body = serde_json::to_value(build_body(&req)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["input"][0], json!({ "role": "system", "content": "system" }));
        assert_eq!(body["input"][1], json!({ "role": "user", "content": "prompt" }));
        assert_eq!(body["text"]["format"]["type"], "json_object");
    }

    #[test]
    fn test_extract_structured_content() {
        let body = json!({
            "output": [{
                "type": "message",
                "role": "assistant",
                "content": [{ "type": "output_text", "text": "{\"items\":[]}" }]
            }],
            "output_text": "ignored"
        });

        assert_eq!(
            extract_response(&body),
            ProviderResponse::Structured("{\"items\":[]}".to_string())
        );
    }

    #[test]
    fn test_extract_flat_text_variants() {
        let flat = json!({ "output": [], "output_text": "{}" });
        assert_eq!(extract_response(&flat), ProviderResponse::FlatText("{}".to_string()));

        let chat = json!({ "choices": [{ "message": { "role": "assistant", "content": "{\"a\":1}" } }] });
        assert_eq!(extract_response(&chat), ProviderResponse::FlatText("{\"a\":1}".to_string()));

        let empty = json!({ "id": "resp_1" });
        assert_eq!(extract_response(&empty), ProviderResponse::FlatText(String::new()));
    }

    #[test]
    fn test_extract_after_reasoning_item() {
        let body = json!({
            "output": [
                {
                    "type": "reasoning",
                    "id": "rs_1",
                    "summary": [],
                    "content": [{ "type": "reasoning_text", "text": "thinking..." }]
                },
                {
                    "type": "message",
                    "role": "assistant",
                    "content": [
                        { "type": "output_text", "text": "{\"items\":" },
                        { "type": "refusal", "refusal": "n/a" },
                        { "type": "output_text", "text": "[]}" }
                    ]
                }
            ]
        });

        assert_eq!(extract_response(&body), ProviderResponse::FlatText("{\"items\":[]}".to_string()));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "bad key".into()),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "slow down".into()),
            ProviderError::RateLimited(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, String::new()),
            ProviderError::Server { status: 502, .. }
        ));
    }

    #[tokio::test]
    async fn test_generate_against_local_upstream() {
        let app = Router::new().route(
            "/v1/responses",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer sk-test");
                assert_eq!(body["text"]["format"]["type"], "json_object");
                Json(json!({
                    "output": [{ "content": [{ "text": "{\"run_label\":\"r\",\"items\":[]}" }] }]
                }))
            }),
        );
        let client = client_for(spawn_upstream(app).await);

        let response = client.generate(&request()).await.unwrap();

        assert_eq!(
            response,
            ProviderResponse::Structured("{\"run_label\":\"r\",\"items\":[]}".to_string())
        );
    }

    #[tokio::test]
    async fn test_generate_maps_auth_failure() {
        let app = Router::new().route(
            "/v1/responses",
            post(|| async { (axum::http::StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let client = client_for(spawn_upstream(app).await);

        let err = client.generate(&request()).await.unwrap_err();

        assert!(matches!(err, ProviderError::Unauthorized(ref body) if body == "invalid api key"));
    }

    #[tokio::test]
    async fn test_generate_rejects_non_json_body() {
        let app = Router::new().route("/v1/responses", post(|| async { "not json" }));
        let client = client_for(spawn_upstream(app).await);

        let err = client.generate(&request()).await.unwrap_err();

        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
