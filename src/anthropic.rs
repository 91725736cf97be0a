//! Minimal Anthropic Messages API client.
//!
//! Mirrors `openai.rs`: one user message in, the concatenated text blocks out.
//! The Messages API has no JSON response mode, so `json_response` is ignored
//! and the prompt alone asks for JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::error::GenError;
use crate::model::{timeout_from_env, GenerationOptions, TextModel};

const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 2500;

#[derive(Clone)]
pub struct Anthropic {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl Anthropic {
  /// Construct the client if we find ANTHROPIC_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.is_empty())?;
    let base_url =
      std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| "https://api.anthropic.com/v1".into());
    let model =
      std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| "claude-sonnet-4-20250514".into());

    match Self::new(api_key, base_url, model, timeout_from_env()) {
      Ok(client) => Some(client),
      Err(e) => {
        error!(target: "spacey_science", error = %e, "ANTHROPIC_API_KEY is set but the HTTP client could not be built");
        None
      }
    }
  }

  pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client, api_key, base_url, model })
  }
}

#[async_trait]
impl TextModel for Anthropic {
  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn complete(&self, prompt: &str, opts: &GenerationOptions) -> Result<String, GenError> {
    let url = format!("{}/messages", self.base_url);
    let req = MessagesRequest {
      model: self.model.clone(),
      max_tokens: opts.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
      temperature: opts.temperature,
      messages: vec![MessageReq { role: "user".into(), content: prompt.into() }],
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "spacey-science-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", API_VERSION)
      .json(&req).send().await.map_err(|e| GenError::Generation(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_anthropic_error(&body).unwrap_or(body);
      return Err(GenError::Generation(format!("Anthropic HTTP {}: {}", status, msg)));
    }

    let body: MessagesResponse = res.json().await.map_err(|e| GenError::Generation(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(elapsed = ?start.elapsed(), input_tokens = ?usage.input_tokens, output_tokens = ?usage.output_tokens, "Anthropic usage");
    }
    let text = collect_text(&body.content);
    if text.is_empty() {
      return Err(GenError::Generation("Anthropic returned no text content".into()));
    }
    Ok(text)
  }

  fn name(&self) -> &str {
    "anthropic"
  }
}

fn collect_text(blocks: &[ContentBlock]) -> String {
  blocks
    .iter()
    .filter(|b| b.kind == "text")
    .filter_map(|b| b.text.as_deref())
    .collect::<Vec<_>>()
    .join("")
    .trim()
    .to_string()
}

// --- Messages DTOs ---

#[derive(Serialize)]
struct MessagesRequest {
  model: String,
  max_tokens: u32,
  temperature: f32,
  messages: Vec<MessageReq>,
}
#[derive(Serialize)]
struct MessageReq { role: String, content: String }

#[derive(Deserialize)]
struct MessagesResponse {
  content: Vec<ContentBlock>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ContentBlock {
  #[serde(rename = "type")] kind: String,
  #[serde(default)] text: Option<String>,
}
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] input_tokens: Option<u32>,
  #[serde(default)] output_tokens: Option<u32>,
}

fn extract_anthropic_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use wiremock::matchers::{body_partial_json, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn client_for(server: &MockServer) -> Anthropic {
    Anthropic::new("sk-ant-test".into(), server.uri(), "claude-test".into(), Duration::from_secs(5)).unwrap()
  }

  #[tokio::test]
  async fn text_blocks_are_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/messages"))
      .and(header("x-api-key", "sk-ant-test"))
      .and(header("anthropic-version", API_VERSION))
      .and(body_partial_json(json!({"model": "claude-test", "max_tokens": DEFAULT_MAX_TOKENS})))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "content": [{"type": "text", "text": "Mars has two moons."}],
        "usage": {"input_tokens": 10, "output_tokens": 5}
      })))
      .expect(1)
      .mount(&server)
      .await;

    let opts = GenerationOptions { max_tokens: None, temperature: 0.7, json_response: true };
    let text = client_for(&server).complete("Expand this", &opts).await.unwrap();
    assert_eq!(text, "Mars has two moons.");
  }

  #[tokio::test]
  async fn http_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/messages"))
      .respond_with(ResponseTemplate::new(401).set_body_json(json!({
        "type": "error",
        "error": {"type": "authentication_error", "message": "invalid x-api-key"}
      })))
      .mount(&server)
      .await;

    let opts = GenerationOptions { max_tokens: Some(400), temperature: 0.7, json_response: false };
    let err = client_for(&server).complete("hi", &opts).await.unwrap_err();
    match err {
      GenError::Generation(msg) => {
        assert!(msg.starts_with("Anthropic HTTP 401"), "{msg}");
        assert!(msg.ends_with("invalid x-api-key"), "{msg}");
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[tokio::test]
  async fn empty_content_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/messages"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
      .mount(&server)
      .await;

    let opts = GenerationOptions { max_tokens: Some(400), temperature: 0.7, json_response: false };
    let err = client_for(&server).complete("hi", &opts).await.unwrap_err();
    assert_eq!(err, GenError::Generation("Anthropic returned no text content".into()));
  }

  #[test]
  fn only_text_blocks_are_collected() {
    let body: MessagesResponse = serde_json::from_str(
      r#"{"content": [
        {"type": "text", "text": "{\"title\": "},
        {"type": "tool_use", "id": "x"},
        {"type": "text", "text": "\"Stars\"}  "}
      ]}"#,
    )
    .unwrap();
    assert_eq!(collect_text(&body.content), r#"{"title": "Stars"}"#);
  }

  #[test]
  fn error_body_is_unwrapped() {
    let body = r#"{"type": "error", "error": {"type": "rate_limit_error", "message": "Too many requests"}}"#;
    assert_eq!(extract_anthropic_error(body).as_deref(), Some("Too many requests"));
  }
}
