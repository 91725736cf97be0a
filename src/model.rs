//! Generative text model capability.
//!
//! The pipeline only needs "prompt in, text out". Providers implement
//! `TextModel` and are injected into `ContentGenerator`, so tests can swap in
//! scripted fakes and deployments can pick a provider from the environment.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::anthropic::Anthropic;
use crate::error::GenError;
use crate::openai::OpenAI;

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationOptions {
  pub max_tokens: Option<u32>,
  pub temperature: f32,
  /// Ask the provider for a JSON-encoded completion when it supports it.
  pub json_response: bool,
}

#[async_trait]
pub trait TextModel: Send + Sync {
  async fn complete(&self, prompt: &str, opts: &GenerationOptions) -> Result<String, GenError>;

  /// Provider name for logging.
  fn name(&self) -> &str;
}

pub type SharedModel = Arc<dyn TextModel>;

/// Stand-in used when no provider is configured. Every call fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineModel;

#[async_trait]
impl TextModel for OfflineModel {
  async fn complete(&self, _prompt: &str, _opts: &GenerationOptions) -> Result<String, GenError> {
    Err(GenError::Generation("no generative model configured".into()))
  }

  fn name(&self) -> &str {
    "offline"
  }
}

/// Pick a provider: MODEL_PROVIDER if set, else whichever API key is present.
pub fn model_from_env() -> SharedModel {
  let wanted = std::env::var("MODEL_PROVIDER").ok().map(|p| p.to_ascii_lowercase());
  let model: Option<SharedModel> = match wanted.as_deref() {
    Some("openai") => OpenAI::from_env().map(|m| Arc::new(m) as SharedModel),
    Some("anthropic") => Anthropic::from_env().map(|m| Arc::new(m) as SharedModel),
    Some(other) => {
      warn!(target: "spacey_science", provider = %other, "Unknown MODEL_PROVIDER; trying any configured key");
      None
    }
    None => None,
  };

  let model = model
    .or_else(|| OpenAI::from_env().map(|m| Arc::new(m) as SharedModel))
    .or_else(|| Anthropic::from_env().map(|m| Arc::new(m) as SharedModel));

  match model {
    Some(m) => {
      info!(target: "spacey_science", provider = %m.name(), "Generative model enabled.");
      m
    }
    None => {
      warn!(target: "spacey_science", "No model API key set. Quizzes and lessons will use fallback content.");
      Arc::new(OfflineModel)
    }
  }
}

/// Client timeout shared by the HTTP-backed providers (MODEL_TIMEOUT_SECS, default 30).
pub(crate) fn timeout_from_env() -> std::time::Duration {
  let secs = std::env::var("MODEL_TIMEOUT_SECS").ok().and_then(|s| s.parse::<u64>().ok()).unwrap_or(30);
  std::time::Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn offline_model_always_fails() {
    let opts = GenerationOptions { max_tokens: None, temperature: 0.7, json_response: false };
    let err = OfflineModel.complete("hello", &opts).await.unwrap_err();
    assert!(matches!(err, GenError::Generation(_)));
  }
}
